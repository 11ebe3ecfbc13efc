mod commands;
use commands::Commands;

mod parsers;
use parsers::*;

use crate::{
    gemini::{GeminiConfig, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL},
    server::{self, EvaluateRequest},
    simulation::{History, Scenario},
    SimulatorConfig,
};
use clap::Parser;
use color_eyre::Section;
use eyre::{eyre, Context, Result};
use reqwest::Url;
use std::{net::SocketAddr, path::Path, time::Duration};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Gemini model name.
    #[arg(short, long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    /// Root URL of the Gemini API.
    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_API_URL, value_parser = parse_url)]
    api_url: Url,

    /// Timeout of each upstream request in seconds, none by default.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", value_parser = parse_duration_secs)]
    timeout: Option<Duration>,
}

impl Cli {
    /// Creates the configuration, failing if the API key is missing.
    fn config(&self) -> Result<SimulatorConfig> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| eyre!("GEMINI_API_KEY is not set"))
            .suggestion("Pass --api-key or set GEMINI_API_KEY within .env.")?;

        let gemini = GeminiConfig::new(api_key, self.model.clone(), self.api_url.clone());
        Ok(SimulatorConfig::new(gemini).with_timeout(self.timeout))
    }
}

/// Main CLI entry point.
pub async fn cli() -> Result<()> {
    // default commands such as version and help exit at this point
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve {
            host,
            port,
            max_output_tokens,
        } => {
            let simulator = cli
                .config()?
                .with_chat_max_output_tokens(*max_output_tokens)
                .build_simulator()?;
            let token = CancellationToken::new();

            // create a signal handler
            let termination_token = token.clone();
            let termination_handle = tokio::spawn(async move {
                if let Err(e) = wait_for_termination(termination_token).await {
                    log::error!("Error in termination handler: {}", e);
                }
            });

            // launch server
            let result = server::serve(simulator, SocketAddr::new(*host, *port), token.clone()).await;

            // stop the signal handler if the server exited on its own
            token.cancel();
            if let Err(e) = termination_handle.await {
                log::error!("Error in termination handler: {}", e);
            }

            result?
        }
        Commands::Opening { scenario } => {
            println!("{}", Scenario::from_selector(scenario.as_deref()).opening());
        }
        Commands::Evaluate { path } => {
            let history = read_history(path)?;
            let simulator = cli.config()?.build_simulator()?;
            let evaluation = simulator.evaluate(&history).await?;
            println!("{}", evaluation);
        }
    };

    Ok(())
}

/// Reads a history file, either a bare list of turns or an `/evaluate` request body.
fn read_history(path: &Path) -> Result<History> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read {}", path.display()))?;
    parse_history(&content)
}

fn parse_history(content: &str) -> Result<History> {
    if let Ok(history) = serde_json::from_str::<History>(content) {
        Ok(history)
    } else {
        serde_json::from_str::<EvaluateRequest>(content)
            .map(|body| body.history)
            .wrap_err("could not parse history")
    }
}

/// Waits for various termination signals, and cancels the given token when the signal is received.
async fn wait_for_termination(cancellation: CancellationToken) -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => log::warn!("Received SIGTERM"),
            _ = sigint.recv() => log::warn!("Received SIGINT"),
            _ = cancellation.cancelled() => {
                // no need to wait if cancelled anyways
                return Ok(());
            }
        };

        cancellation.cancel();
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = cancellation.cancelled() => return Ok(()),
        };
        cancellation.cancel();
    }

    log::info!("Terminating the application...");

    Ok(())
}
