use std::{borrow::Cow, sync::Arc};

use async_trait::async_trait;
use reqwest::Url;

use crate::libs::{address::Address, error::Error, transport::EchoTransport};

use super::LookupStrategy;

pub const AWS_ENDPOINT: &str = "https://checkip.amazonaws.com";
pub const IPIFY_ENDPOINT: &str = "https://api.ipify.org";
pub const WTFISMYIP_ENDPOINT: &str = "https://wtfismyip.com/text";

/// 从公共 IP 回显服务获取 IP 地址
///
/// 服务以纯文本形式返回调用方的公网地址，响应内容去除首尾空白后必须是一个完整的 IP 地址。
#[derive(Debug, Clone)]
pub struct PublicEcho {
    name: Cow<'static, str>,
    url: Url,
    transport: Arc<dyn EchoTransport>,
}

impl PublicEcho {
    pub fn new(url: Url, transport: Arc<dyn EchoTransport>) -> Self {
        Self {
            name: Cow::Borrowed("Public Echo"),
            url,
            transport,
        }
    }

    pub fn aws(transport: Arc<dyn EchoTransport>) -> Self {
        Self::well_known("AWS", AWS_ENDPOINT, transport)
    }

    pub fn ipify(transport: Arc<dyn EchoTransport>) -> Self {
        Self::well_known("ipify", IPIFY_ENDPOINT, transport)
    }

    pub fn wtfismyip(transport: Arc<dyn EchoTransport>) -> Self {
        Self::well_known("wtfismyip", WTFISMYIP_ENDPOINT, transport)
    }

    fn well_known(
        name: &'static str,
        endpoint: &'static str,
        transport: Arc<dyn EchoTransport>,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            // 常量地址，解析不会失败
            url: Url::parse(endpoint).unwrap(),
            transport,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LookupStrategy for PublicEcho {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.url.as_str()))
    }

    async fn resolve(&self) -> Result<Address, Error> {
        let text = self.transport.get(&self.url).await?;
        Address::parse(&text)
    }
}
