use cinebook_cli::cli::Cli;
use cinebook_cli::error::AppError;
use cinebook_store::app_config::Config;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: failed to load config: {}", err);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cinebook_cli::run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => AppError::report(err),
    }
}
