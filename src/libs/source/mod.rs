pub mod local;
pub mod public_echo;

use std::{borrow::Cow, fmt::Debug};

use async_trait::async_trait;

use super::{address::Address, error::Error};

/// IP 地址查询策略
#[async_trait]
pub trait LookupStrategy: Debug + Send + Sync {
    /// 返回查询策略名称
    fn name(&self) -> &str;

    /// 返回用于日志输出的消息提示内容
    fn info(&self) -> Option<Cow<'_, str>>;

    /// 获取当前运行机器所处于的 IP 地址
    async fn resolve(&self) -> Result<Address, Error>;
}
