use std::{
    borrow::Cow,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use async_trait::async_trait;
use tokio::net::UdpSocket;

use crate::libs::{address::Address, error::Error};

use super::LookupStrategy;

/// 探测目标：公共 DNS 服务
const PROBE_TARGET: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(8, 8, 8, 8), 80));

/// 通过本地 UDP 套接字获取出口网卡的 IP 地址
///
/// UDP 的 `connect` 不会发送任何数据，仅让操作系统为套接字选择路由及本地地址，
/// 读取套接字的本地地址即可得到访问外网时所使用的网卡地址。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSocket;

impl LocalSocket {
    pub fn new() -> Self {
        Self
    }
}

/// 套接字在离开作用域时释放
async fn probe(target: SocketAddr) -> Result<Address, Error> {
    let local = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));
    let socket = UdpSocket::bind(local).await?;
    socket.connect(target).await?;

    let local = socket.local_addr()?.ip();
    if local.is_unspecified() {
        return Err(Error::new_network(format!("未能选出访问 {} 的本地网卡", target)));
    }

    Ok(Address::from(local))
}

#[async_trait]
impl LookupStrategy for LocalSocket {
    fn name(&self) -> &str {
        "Local Socket"
    }

    fn info(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(format!("探测目标 {}", PROBE_TARGET)))
    }

    async fn resolve(&self) -> Result<Address, Error> {
        probe(PROBE_TARGET).await
    }
}
