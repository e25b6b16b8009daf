use std::{
    borrow::Cow,
    env,
    fmt::Display,
    fs,
    net::IpAddr,
    path::Path,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use reqwest::Url;
use serde::{de, Deserialize};

use super::{
    error::Error,
    resolver::Resolver,
    transport::{HttpTransport, ProxySettings},
};

/// 默认配置文件名称，位于程序所在文件夹
pub const DEFAULT_CONFIGURATION_NAME: &str = "config.json5";

/// 未配置查询策略时使用的默认优先级
static DEFAULT_STRATEGIES: [StrategyType; 4] = [
    StrategyType::Aws,
    StrategyType::Ipify,
    StrategyType::WtfIsMyIp,
    StrategyType::Local,
];

/// 配置内容数据结构
#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct Configuration {
    /// 访问回显服务时绑定的本地 IP 地址，可选
    bind_address: Option<IpAddr>,
    /// 访问回显服务的超时时间，单位秒。默认不设置超时。
    timeout: Option<u64>,
    /// 访问回显服务的代理，可选。默认使用当前系统配置的全局代理
    proxy: Option<ProxySettings>,
    /// 按优先级排列的查询策略。
    ///
    /// - `"aws"`：checkip.amazonaws.com
    /// - `"ipify"`：api.ipify.org
    /// - `"wtfismyip"`：wtfismyip.com
    /// - `"local"`：本地 UDP 套接字探测
    /// - `"http(s)://..."` 或 `{ type: "echo", url: "..." }`：自定义回显服务
    ///
    /// 未配置该项时依次使用 aws、ipify、wtfismyip 与 local。
    strategies: Option<Vec<StrategyType>>,
}

impl Configuration {
    /// 获取绑定的本地 IP 地址
    pub fn bind_address(&self) -> Option<IpAddr> {
        self.bind_address
    }

    /// 获取请求超时时间
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// 获取访问代理配置
    pub fn proxy(&self) -> Option<&ProxySettings> {
        self.proxy.as_ref()
    }

    /// 获取查询策略列表
    pub fn strategies(&self) -> &[StrategyType] {
        match self.strategies.as_ref() {
            Some(strategies) => strategies.as_slice(),
            None => &DEFAULT_STRATEGIES,
        }
    }

    /// 替换查询策略列表
    pub fn set_strategies(&mut self, strategies: Vec<StrategyType>) {
        self.strategies = Some(strategies);
    }

    /// 创建访问回显服务的传输层
    pub fn create_transport(&self) -> Result<HttpTransport, Error> {
        HttpTransport::new(self.bind_address(), self.timeout(), self.proxy())
    }

    /// 通过当前配置内容创建 [`Resolver`]
    pub fn create_resolver(&self) -> Result<Resolver, Error> {
        let transport = self.create_transport()?;

        let resolver = self
            .strategies()
            .iter()
            .fold(Resolver::from_transport(Arc::new(transport)), |resolver, strategy| {
                strategy.append_to(resolver)
            });

        Ok(resolver)
    }
}

/// 可用的查询策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyType {
    Aws,
    Ipify,
    WtfIsMyIp,
    Local,
    Echo(Url),
}

impl StrategyType {
    fn append_to(&self, resolver: Resolver) -> Resolver {
        match self {
            StrategyType::Aws => resolver.with_aws(),
            StrategyType::Ipify => resolver.with_ipify(),
            StrategyType::WtfIsMyIp => resolver.with_wtfismyip(),
            StrategyType::Local => resolver.with_local(),
            StrategyType::Echo(url) => resolver.with_echo(url.clone()),
        }
    }

    fn from_echo_url(server: &str) -> Result<Self, String> {
        let url = server
            .parse::<Url>()
            .map_err(|_| format!("无效回显服务地址：{}", server))?;
        match url.scheme() {
            "http" | "https" => Ok(StrategyType::Echo(url)),
            _ => Err(format!("回显服务地址仅支持 http 或 https：{}", server)),
        }
    }
}

impl FromStr for StrategyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(StrategyType::Aws),
            "ipify" => Ok(StrategyType::Ipify),
            "wtfismyip" => Ok(StrategyType::WtfIsMyIp),
            "local" => Ok(StrategyType::Local),
            value if value.starts_with("http://") || value.starts_with("https://") => {
                Self::from_echo_url(s.trim())
            }
            _ => Err(format!("不支持的查询策略：{}", s)),
        }
    }
}

impl Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyType::Aws => f.write_str("aws"),
            StrategyType::Ipify => f.write_str("ipify"),
            StrategyType::WtfIsMyIp => f.write_str("wtfismyip"),
            StrategyType::Local => f.write_str("local"),
            StrategyType::Echo(url) => f.write_str(url.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for StrategyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StrategyTypeVisitor;
        impl<'de> de::Visitor<'de> for StrategyTypeVisitor {
            type Value = StrategyType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str(
                    "可用的查询策略为：aws、ipify、wtfismyip、local 或 http(s) 回显服务地址",
                )
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse::<StrategyType>().map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut r#type = None;
                let mut url = None;

                while let Some(key) = map.next_key::<Cow<'_, str>>()? {
                    match &*key {
                        "type" => r#type = Some(map.next_value::<String>()?),
                        "url" => url = Some(map.next_value::<String>()?),
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }

                let Some(r#type) = r#type else {
                    return Err(de::Error::missing_field("type"));
                };

                match r#type.as_str() {
                    "echo" => match url {
                        Some(url) => {
                            StrategyType::from_echo_url(&url).map_err(de::Error::custom)
                        }
                        None => Err(de::Error::custom(
                            "查询策略 echo 必须指定回显服务地址 url",
                        )),
                    },
                    other => other.parse::<StrategyType>().map_err(de::Error::custom),
                }
            }
        }

        deserializer.deserialize_any(StrategyTypeVisitor)
    }
}

/// 获取配置数据
///
/// 指定了配置文件路径时必须能够读取；未指定时读取程序所在文件夹下的
/// [`DEFAULT_CONFIGURATION_NAME`]，该文件不存在则使用默认配置。
pub fn configuration<P>(path: Option<P>) -> Result<Configuration, Error>
where
    P: AsRef<Path>,
{
    match path {
        Some(path) => read_configuration(path),
        None => {
            let default_path = env::current_exe()
                .map_err(|_| Error::new_configuration("无法获取当前程序所在文件夹"))?
                .with_file_name(DEFAULT_CONFIGURATION_NAME);
            if default_path.is_file() {
                read_configuration(default_path)
            } else {
                Ok(Configuration::default())
            }
        }
    }
}

/// 从文件路径读取配置，并通过 `json5` 解析。
pub fn read_configuration<P>(path: P) -> Result<Configuration, Error>
where
    P: AsRef<Path>,
{
    let text = fs::read_to_string(path).map_err(Error::read_configuration_failure)?;
    parse_configuration(&text)
}

pub fn parse_configuration(text: &str) -> Result<Configuration, Error> {
    json5::from_str(text).map_err(Error::read_configuration_failure)
}
