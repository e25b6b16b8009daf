/// 获取运行时环境变量及输入参数
///
/// - `-c | --config`: 配置文件路径
/// - `-s | --strategy`: 查询策略，可多次指定，将覆盖配置文件中的查询策略
/// - `-v | --verbose`: 输出调试日志
pub fn arguments() -> clap::ArgMatches<'static> {
    clap::App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            clap::Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("配置文件路径")
                .takes_value(true)
                .required(false),
        )
        .arg(
            clap::Arg::with_name("strategy")
                .short("s")
                .long("strategy")
                .value_name("STRATEGY")
                .help("查询策略：aws、ipify、wtfismyip、local 或 http(s) 回显服务地址")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .required(false),
        )
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("输出调试日志"),
        )
        .get_matches()
}
