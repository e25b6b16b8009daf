use std::{borrow::Cow, fmt::Display};

/// 错误来源，保留传输层的原始错误。
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// IP 地址查询错误
///
/// 只有 [`Error::Configuration`] 与 [`Error::AllStrategiesFailed`] 会由
/// [`Resolver::resolve`](crate::Resolver::resolve) 返回给调用方，
/// 其余错误均在单个查询策略内部产生，并由 Resolver 吞掉后尝试下一个策略。
#[derive(Debug)]
pub enum Error {
    /// 未配置任何查询策略，或配置文件读取失败
    Configuration(Cow<'static, str>),
    /// 网络传输失败（DNS、连接、TLS、超时、非成功状态码或套接字错误）
    Network(Cause),
    /// 响应内容并非合法的 IP 地址
    Parse(Cow<'static, str>),
    /// 所有查询策略均失败
    AllStrategiesFailed,
    /// 无法创建阻塞查询所需的运行时
    Runtime(std::io::Error),
}

impl Error {
    pub fn new_configuration<T: Into<Cow<'static, str>>>(reason: T) -> Self {
        Self::Configuration(reason.into())
    }

    pub fn new_parse<T: Into<Cow<'static, str>>>(reason: T) -> Self {
        Self::Parse(reason.into())
    }

    pub fn new_network<E>(cause: E) -> Self
    where
        E: Into<Cause>,
    {
        Self::Network(cause.into())
    }

    pub fn no_strategy() -> Self {
        Self::Configuration(Cow::Borrowed("at least one endpoint must be configured"))
    }

    pub fn read_configuration_failure<E: std::error::Error>(err: E) -> Self {
        Self::Configuration(Cow::Owned(format!("配置文件读取失败：{}", err)))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    pub fn is_all_strategies_failed(&self) -> bool {
        matches!(self, Self::AllStrategiesFailed)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Configuration(reason) => write!(f, "配置错误：{}", reason),
            Error::Network(cause) => write!(f, "网络错误：{}", cause),
            Error::Parse(reason) => write!(f, "解析错误：{}", reason),
            Error::AllStrategiesFailed => f.write_str("所有 IP 地址查询策略均失败"),
            Error::Runtime(err) => write!(f, "创建运行时失败：{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Network(cause) => Some(cause.as_ref()),
            Error::Runtime(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(Box::new(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Network(Box::new(err))
    }
}
