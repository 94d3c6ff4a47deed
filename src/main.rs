use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{
    bail,
    Context,
    Result
};
use log::{
    error,
    info,
    warn,
    LevelFilter
};
use tokio::io::BufReader;

use timeworkday::configuration::Configuration;
use timeworkday::logging;
use timeworkday::server::dispatcher::Dispatcher;
use timeworkday::server::transport::{
    Server,
    SERVER_NAME
};
use timeworkday::time::calendar::holidaydata::HolidayData;
use timeworkday::time::calendar::registryerror::RegistryError;

enum Command {
    Serve,
    FetchHolidays,
    Help,
    Version
}

struct CliArgs {
    command: Command,
    config_path: Option<PathBuf>,
    log_level: Option<String>
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs {
        command: Command::Serve,
        config_path: None,
        log_level: None
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => cli.command = Command::Help,
            "--version" | "-V" => cli.command = Command::Version,
            "fetch-holidays" => cli.command = Command::FetchHolidays,
            "--config" | "-c" => {
                let path = iter.next().context("--config needs a file path")?;
                cli.config_path = Some(PathBuf::from(path));
            },
            "--log-level" => {
                let level = iter.next().context("--log-level needs a level")?;
                cli.log_level = Some(level.clone());
            },
            other => bail!("unknown argument '{other}', see --help")
        }
    }
    Ok(cli)
}

fn print_help() {
    println!("timeworkday v{} - date, timezone and workday tools over stdio", env!("CARGO_PKG_VERSION"));
    println!();
    println!("USAGE:");
    println!("    timeworkday [--config <path>] [--log-level <level>]   Serve JSON-RPC requests on stdin/stdout");
    println!("    timeworkday fetch-holidays [--config <path>]          Download the holiday cache if it is missing");
    println!("    timeworkday --help                                    Show this help message");
    println!("    timeworkday --version                                 Show the version");
    println!();
    println!("ENVIRONMENT:");
    println!("    TIMEWORKDAY_LOG    Log level (off, error, warn, info, debug, trace)");
}

fn load_configuration(cli: &CliArgs) -> Result<Configuration> {
    let mut configuration = match &cli.config_path {
        Some(path) => Configuration::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Configuration::default()
    };
    if let Some(level) = &cli.log_level {
        configuration.log_level = level.clone();
    }
    configuration.with_env_overrides().context("applying environment overrides")
}

/// Downloads the dataset unless a cache file already exists. Failures are
/// reported but never fail the process.
async fn fetch_holidays(configuration: &Configuration) {
    let settings = &configuration.holidays;
    if settings.cache_file.exists() {
        info!("holiday cache {} already exists, skipping download", settings.cache_file.display());
        return;
    }
    let outcome = async {
        let data = settings.fetcher()?.fetch().await?;
        data.save(&settings.cache_file)?;
        Ok::<HolidayData, RegistryError>(data)
    }
    .await;
    match outcome {
        Ok(data) => info!("saved {} holiday entries to {}", data.len(), settings.cache_file.display()),
        Err(e) => warn!("holiday download failed, the server will retry at startup: {e}")
    }
}

async fn serve(configuration: Configuration) -> Result<()> {
    info!("starting {SERVER_NAME} v{}", env!("CARGO_PKG_VERSION"));
    let registry = configuration.holidays.build_registry();
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&registry), configuration.default_timezone.clone()));
    let server = Arc::new(Server::new(dispatcher));

    let outcome = server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("stdio transport failed");
    registry.stop();
    outcome
}

async fn run(cli: CliArgs) -> Result<()> {
    let configuration = load_configuration(&cli)?;
    logging::init(configuration.log_level_filter().unwrap_or(LevelFilter::Info));

    match cli.command {
        Command::FetchHolidays => {
            fetch_holidays(&configuration).await;
            Ok(())
        },
        _ => serve(configuration).await
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Help => {
            print_help();
            return ExitCode::SUCCESS;
        },
        Command::Version => {
            println!("timeworkday {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        },
        _ => {}
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error starting {SERVER_NAME} server: {e:#}");
            ExitCode::FAILURE
        }
    }
}
