use std::{fmt::Debug, net::IpAddr, time::Duration};

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::error::Error;

/// 访问 IP 回显服务所使用的 HTTP 传输层
#[async_trait]
pub trait EchoTransport: Debug + Send + Sync {
    /// 对 `url` 发起一次 GET 请求并返回完整的响应文本
    async fn get(&self, url: &Url) -> Result<String, Error>;
}

/// 访问回显服务的代理设置
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    /// http、https 或 socks5 代理地址
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxySettings {
    /// 用户名与密码必须同时指定
    fn to_proxy(&self) -> Result<reqwest::Proxy, Error> {
        let proxy = reqwest::Proxy::all(self.url.as_str()).map_err(|err| {
            Error::new_configuration(format!("无效代理地址 {}：{}", self.url, err))
        })?;

        match (self.username.as_deref(), self.password.as_deref()) {
            (None, None) => Ok(proxy),
            (Some(username), Some(password)) => Ok(proxy.basic_auth(username, password)),
            (None, Some(_)) => Err(Error::new_configuration("代理缺少用户名 proxy.username")),
            (Some(_), None) => Err(Error::new_configuration("代理缺少密码 proxy.password")),
        }
    }
}

/// 基于 reqwest 的默认传输层
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// 创建传输层
    ///
    /// - `bind_address`：绑定的本地 IP 地址，可选
    /// - `timeout`：单次请求超时时间，可选，未指定时不设置超时
    /// - `proxy`：访问代理，可选，未指定时使用系统代理
    pub fn new(
        bind_address: Option<IpAddr>,
        timeout: Option<Duration>,
        proxy: Option<&ProxySettings>,
    ) -> Result<Self, Error> {
        let mut builder = reqwest::ClientBuilder::new().local_address(bind_address);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = proxy {
            builder = builder.proxy(proxy.to_proxy()?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// 使用已创建好的 reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::from_client(Client::new())
    }
}

#[async_trait]
impl EchoTransport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, Error> {
        let response = self.client.get(url.as_ref()).send().await?;

        // 状态码不作判断，由响应内容决定能否解析出 IP 地址
        let status = response.status();
        if !status.is_success() {
            debug!("回显服务 {} 响应状态码 {}", url, status);
        }

        Ok(response.text().await?)
    }
}
