use clap::Subcommand;
use std::{net::IpAddr, path::PathBuf};

use crate::simulation::DEFAULT_CHAT_MAX_OUTPUT_TOKENS;

// https://docs.rs/clap/latest/clap/_derive/index.html#arg-attributes
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        #[arg(long, env = "HOST", help = "Address to bind to.", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(short, long, env = "PORT", help = "Port to listen on.", default_value_t = 5001)]
        port: u16,
        #[arg(
            long,
            env = "CHAT_MAX_OUTPUT_TOKENS",
            help = "Output token cap of game master replies.",
            default_value_t = DEFAULT_CHAT_MAX_OUTPUT_TOKENS
        )]
        max_output_tokens: u32,
    },
    /// Print the opening narrative of a scenario.
    Opening {
        #[arg(help = "Scenario to open, 'discoverer' or 'responder'.")]
        scenario: Option<String>,
    },
    /// Evaluate a saved conversation history.
    Evaluate {
        #[arg(help = "JSON file with the history, or an `/evaluate` request body.")]
        path: PathBuf,
    },
}
