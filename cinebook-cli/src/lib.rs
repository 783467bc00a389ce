pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use cli::Cli;
use error::AppError;
use state::AppState;

/// Build the application from configuration and execute one command
pub async fn run(cli: Cli, mut config: cinebook_store::app_config::Config) -> Result<(), AppError> {
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }
    tracing::debug!(data_dir = %config.data.dir.display(), "Opening data files");

    let state = AppState::init(&config.data).await?;
    commands::run(&state, cli.command).await
}
