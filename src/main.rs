#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<std::process::ExitCode> {
    use cache_fetcher::cli::{self, Cli};
    use clap::Parser;
    use std::process::ExitCode;

    let cli = Cli::parse();

    let settings = cli::load_config(&cli)?;
    cli::init_logger_from_settings(&settings)?;

    tracing::debug!(
        name = %settings.application.name,
        version = %settings.application.version,
        "Configuration loaded"
    );

    if cli::execute_command(&cli, &settings).await? {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

// The command-line client needs a native transport
#[cfg(target_arch = "wasm32")]
fn main() {}
