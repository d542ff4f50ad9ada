mod cli;
mod commands;
mod prompt;
mod render;
mod repl;
mod ui;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use repl::Repl;
use std::env;
use summit::error::{Result, SummitError};
use summit::{HttpTransport, SessionController, SummitConfig};
use ui::UI;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let workspace = env::current_dir()
        .map_err(|e| SummitError::Config(format!("Failed to get current directory: {}", e)))?;

    let config = match load_config(&cli, &workspace) {
        Ok(config) => config,
        Err(e) => {
            UI::print_error_with_hint(&e);
            std::process::exit(1);
        }
    };

    let transport = match HttpTransport::new(config.base_url.clone(), config.request_timeout()) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), e);
            eprintln!();
            eprintln!("Set the backend address with:");
            eprintln!("  export SUMMIT_BASE_URL='http://localhost:8000/api/v1'");
            eprintln!("Or use the --base-url flag.");
            std::process::exit(1);
        }
    };

    let session = SessionController::new(transport, config.session_config())?;
    let mut repl = Repl::new(session)?;
    repl.check_backend();

    if let Some(prompt) = cli.prompt {
        if let Err(e) = repl.process_single_prompt(&prompt) {
            UI::print_error_with_hint(&e);
            std::process::exit(1);
        }
    } else {
        repl.run()?;
    }

    Ok(())
}

fn load_config(cli: &Cli, workspace: &std::path::Path) -> Result<SummitConfig> {
    let mut config = SummitConfig::load(workspace, cli.config.as_deref())?;
    config.merge(cli.overrides());
    config.validate()?;
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}
