use iplookup::{configuration, Error, StrategyType};
use log::error;

mod args;
extern crate clap;

#[tokio::main]
async fn main() {
    let matches = args::arguments();
    setup_logger(matches.is_present("verbose"));

    match start(&matches).await {
        Ok(_) => {}
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}

fn setup_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{:5}]{}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Warn)
        .level_for(env!("CARGO_PKG_NAME"), level)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}

async fn start(matches: &clap::ArgMatches<'static>) -> Result<(), Error> {
    let mut configuration = configuration(matches.value_of("config"))?;

    if let Some(values) = matches.values_of("strategy") {
        let strategies = values
            .map(|value| value.parse::<StrategyType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::new_configuration)?;
        configuration.set_strategies(strategies);
    }

    let resolver = configuration.create_resolver()?;
    let address = resolver.resolve().await?;
    println!("{}", address);

    Ok(())
}
