//! 按优先级依次尝试多个查询策略，获取当前运行机器的 IP 地址。
//!
//! ```no_run
//! # async fn run() -> Result<(), iplookup::Error> {
//! let address = iplookup::Resolver::new()
//!     .with_aws()
//!     .with_ipify()
//!     .with_local()
//!     .resolve()
//!     .await?;
//! println!("{}", address);
//! # Ok(())
//! # }
//! ```

mod libs;

pub use libs::{
    address::Address,
    config::{configuration, parse_configuration, read_configuration, Configuration, StrategyType},
    error::{Cause, Error},
    resolver::Resolver,
    source::{
        local::LocalSocket,
        public_echo::{PublicEcho, AWS_ENDPOINT, IPIFY_ENDPOINT, WTFISMYIP_ENDPOINT},
        LookupStrategy,
    },
    transport::{EchoTransport, HttpTransport, ProxySettings},
};
