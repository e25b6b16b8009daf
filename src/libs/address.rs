use std::{fmt::Display, net::IpAddr, str::FromStr};

use super::error::Error;

/// 经过校验的 IP 地址（IPv4 或 IPv6）
///
/// 只能通过解析查询策略的原始输出得到，创建后不可修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(IpAddr);

impl Address {
    /// 去除首尾空白后，按标准 IP 文本格式解析
    pub fn parse(text: &str) -> Result<Self, Error> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::new_parse("响应内容为空"));
        }

        trimmed
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| {
                Error::new_parse(format!("响应内容并非合法 IP 地址：{}", abbreviate(trimmed)))
            })
    }

    pub fn ip(&self) -> IpAddr {
        self.0
    }

    pub fn is_ipv4(&self) -> bool {
        self.0.is_ipv4()
    }

    pub fn is_ipv6(&self) -> bool {
        self.0.is_ipv6()
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl From<Address> for IpAddr {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// 错误信息中只保留响应的前 64 个字符
fn abbreviate(text: &str) -> String {
    const LIMIT: usize = 64;
    match text.char_indices().nth(LIMIT) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}
