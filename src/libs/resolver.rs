use std::{borrow::Cow, sync::Arc};

use log::{debug, info, warn};
use reqwest::Url;
use smallvec::SmallVec;

use super::{
    address::Address,
    error::Error,
    source::{local::LocalSocket, public_echo::PublicEcho, LookupStrategy},
    transport::{EchoTransport, HttpTransport},
};

/// 按优先级依次尝试查询策略，返回首个成功的结果。
///
/// 策略的添加顺序即为优先级顺序，允许重复添加。
/// 查询过程不会修改策略列表，同一个 Resolver 可以反复查询。
#[derive(Debug)]
pub struct Resolver {
    strategies: SmallVec<[Box<dyn LookupStrategy>; 4]>,
    transport: Arc<dyn EchoTransport>,
}

impl Resolver {
    /// 创建空的 Resolver，回显服务使用默认的 [`HttpTransport`]
    pub fn new() -> Self {
        Self::from_transport(Arc::new(HttpTransport::default()))
    }

    /// 创建空的 Resolver，回显服务使用指定的传输层
    pub fn from_transport(transport: Arc<dyn EchoTransport>) -> Self {
        Self {
            strategies: SmallVec::new(),
            transport,
        }
    }

    /// 替换传输层，只影响之后追加的回显服务
    pub fn with_transport(mut self, transport: Arc<dyn EchoTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// 追加一个查询策略
    pub fn add_strategy<S>(mut self, strategy: S) -> Self
    where
        S: LookupStrategy + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// 追加一个已装箱的查询策略
    pub fn add_boxed_strategy(mut self, strategy: Box<dyn LookupStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn with_aws(self) -> Self {
        let strategy = PublicEcho::aws(self.transport.clone());
        self.add_strategy(strategy)
    }

    pub fn with_ipify(self) -> Self {
        let strategy = PublicEcho::ipify(self.transport.clone());
        self.add_strategy(strategy)
    }

    pub fn with_wtfismyip(self) -> Self {
        let strategy = PublicEcho::wtfismyip(self.transport.clone());
        self.add_strategy(strategy)
    }

    /// 追加自定义的回显服务
    pub fn with_echo(self, url: Url) -> Self {
        let strategy = PublicEcho::new(url, self.transport.clone());
        self.add_strategy(strategy)
    }

    pub fn with_local(self) -> Self {
        self.add_strategy(LocalSocket::new())
    }

    /// 按优先级排列的查询策略
    pub fn strategies(&self) -> impl Iterator<Item = &dyn LookupStrategy> {
        self.strategies.iter().map(|strategy| strategy.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// 依次尝试每个查询策略
    ///
    /// 单个策略的失败只会记录日志，随后尝试下一个策略；
    /// 全部失败时返回 [`Error::AllStrategiesFailed`]，不保留各策略的失败原因。
    pub async fn resolve(&self) -> Result<Address, Error> {
        if self.strategies.is_empty() {
            return Err(Error::no_strategy());
        }

        for strategy in self.strategies.iter() {
            let info = strategy.info().unwrap_or(Cow::Borrowed(""));
            debug!("正在使用 IP 地址来源 {} {}", strategy.name(), info);

            match strategy.resolve().await {
                Ok(address) => {
                    info!("通过 {} 获取到 IP 地址：{}", strategy.name(), address);
                    return Ok(address);
                }
                Err(err) => {
                    warn!("IP 地址来源 {} {} 查询失败：{}", strategy.name(), info, err);
                }
            }
        }

        Err(Error::AllStrategiesFailed)
    }

    /// 阻塞当前线程直至查询完成
    ///
    /// 内部创建单线程运行时驱动 [`Resolver::resolve`]，
    /// 不可在异步运行时内调用。
    pub fn resolve_blocking(&self) -> Result<Address, Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        runtime.block_on(self.resolve())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        borrow::Cow,
        net::IpAddr,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use reqwest::Url;

    use crate::libs::{
        address::Address,
        error::Error,
        source::LookupStrategy,
        transport::EchoTransport,
    };

    use super::Resolver;

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    /// 记录调用顺序的测试策略，`address` 为空时查询失败
    #[derive(Debug)]
    struct Spy {
        name: &'static str,
        address: Option<&'static str>,
        calls: Calls,
    }

    impl Spy {
        fn ok(name: &'static str, address: &'static str, calls: &Calls) -> Self {
            Self {
                name,
                address: Some(address),
                calls: calls.clone(),
            }
        }

        fn failing(name: &'static str, calls: &Calls) -> Self {
            Self {
                name,
                address: None,
                calls: calls.clone(),
            }
        }
    }

    #[async_trait]
    impl LookupStrategy for Spy {
        fn name(&self) -> &str {
            self.name
        }

        fn info(&self) -> Option<Cow<'_, str>> {
            None
        }

        async fn resolve(&self) -> Result<Address, Error> {
            self.calls.lock().unwrap().push(self.name);
            match self.address {
                Some(address) => Address::parse(address),
                None => Err(Error::new_network("unreachable")),
            }
        }
    }

    #[derive(Debug)]
    struct NoTransport;

    #[async_trait]
    impl EchoTransport for NoTransport {
        async fn get(&self, _: &Url) -> Result<String, Error> {
            Err(Error::new_network("no transport"))
        }
    }

    /// 记录被请求的地址，始终返回失败
    #[derive(Debug, Default)]
    struct RecordingTransport {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EchoTransport for RecordingTransport {
        async fn get(&self, url: &Url) -> Result<String, Error> {
            self.urls.lock().unwrap().push(url.to_string());
            Err(Error::new_network("recorded"))
        }
    }

    fn empty() -> Resolver {
        Resolver::from_transport(Arc::new(NoTransport))
    }

    fn calls() -> Calls {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_empty_resolver_is_configuration_error() {
        let resolver = empty();

        let err = resolver.resolve().await.unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("at least one endpoint must be configured"));
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let calls = calls();
        let resolver = empty()
            .add_strategy(Spy::ok("first", "192.0.2.1", &calls))
            .add_strategy(Spy::ok("second", "192.0.2.2", &calls))
            .add_strategy(Spy::failing("third", &calls));

        let address = resolver.resolve().await.unwrap();
        assert_eq!(address.to_string(), "192.0.2.1");
        assert_eq!(*calls.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_succeeding_strategy() {
        let calls = calls();
        let resolver = empty()
            .add_strategy(Spy::failing("a", &calls))
            .add_strategy(Spy::failing("b", &calls))
            .add_strategy(Spy::ok("c", "198.51.100.7", &calls));

        let address = resolver.resolve().await.unwrap();
        assert_eq!(address.ip(), "198.51.100.7".parse::<IpAddr>().unwrap());
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_all_failing_tries_each_once_in_order() {
        let calls = calls();
        let resolver = empty()
            .add_strategy(Spy::failing("a", &calls))
            .add_strategy(Spy::failing("b", &calls))
            .add_strategy(Spy::failing("a", &calls));

        let err = resolver.resolve().await.unwrap_err();
        assert!(err.is_all_strategies_failed());
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "a"]);
    }

    #[tokio::test]
    async fn test_repeated_resolution_is_stable() {
        let calls = calls();
        let resolver = empty()
            .add_strategy(Spy::failing("a", &calls))
            .add_strategy(Spy::ok("b", "2001:db8::7", &calls));

        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(resolver.len(), 2);
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_builder_keeps_order_and_duplicates() {
        let resolver = empty()
            .with_aws()
            .with_local()
            .with_ipify()
            .with_wtfismyip()
            .with_aws()
            .with_echo(Url::parse("http://echo.test/ip").unwrap());

        let names = resolver
            .strategies()
            .map(|strategy| strategy.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["AWS", "Local Socket", "ipify", "wtfismyip", "AWS", "Public Echo"]
        );
    }

    #[test]
    fn test_resolve_blocking() {
        let calls = calls();
        let resolver = empty()
            .add_strategy(Spy::failing("a", &calls))
            .add_strategy(Spy::ok("b", "203.0.113.9", &calls));

        assert_eq!(resolver.resolve_blocking().unwrap().to_string(), "203.0.113.9");
        assert!(empty().resolve_blocking().unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn test_with_transport_applies_to_later_strategies() {
        let first = Arc::new(RecordingTransport::default());
        let second = Arc::new(RecordingTransport::default());

        let resolver = Resolver::from_transport(first.clone())
            .with_echo(Url::parse("http://first.test/").unwrap())
            .with_transport(second.clone())
            .with_echo(Url::parse("http://second.test/").unwrap())
            .with_aws();

        let err = resolver.resolve().await.unwrap_err();
        assert!(err.is_all_strategies_failed());
        assert_eq!(*first.urls.lock().unwrap(), vec!["http://first.test/"]);
        assert_eq!(
            *second.urls.lock().unwrap(),
            vec!["http://second.test/", "https://checkip.amazonaws.com/"]
        );
    }
}
