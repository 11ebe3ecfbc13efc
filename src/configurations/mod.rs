use color_eyre::Section;
use eyre::{Context, Result};
use reqwest::Url;
use std::{env, sync::Arc, time::Duration};

use crate::{
    gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL},
    simulation::{Simulator, DEFAULT_CHAT_MAX_OUTPUT_TOKENS},
};

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Upstream model configuration.
    pub gemini: GeminiConfig,
    /// Output cap of game master replies.
    pub chat_max_output_tokens: u32,
}

impl SimulatorConfig {
    pub fn new(gemini: GeminiConfig) -> Self {
        Self {
            gemini,
            chat_max_output_tokens: DEFAULT_CHAT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Creates the config from the environment variables.
    ///
    /// Required environment variables:
    /// - `GEMINI_API_KEY`
    ///
    /// Optional ones are `GEMINI_MODEL`, `GEMINI_API_URL` and `CHAT_MAX_OUTPUT_TOKENS`.
    ///
    /// The binary is configured through the CLI instead, which reads the same variables.
    /// This is for callers without a command line, such as the manual live test in
    /// `tests/gemini_test.rs`, which is currently its only user.
    pub fn new_from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .wrap_err("GEMINI_API_KEY is not set")
            .suggestion("GEMINI_API_KEY must be within .env or the environment.")?;

        let model = env::var("GEMINI_MODEL").unwrap_or(DEFAULT_GEMINI_MODEL.to_string());

        let api_url_env = env::var("GEMINI_API_URL").unwrap_or(DEFAULT_GEMINI_API_URL.to_string());
        let api_url = Url::parse(&api_url_env).wrap_err("Could not parse GEMINI_API_URL.")?;

        let mut config = Self::new(GeminiConfig::new(api_key, model, api_url));
        if let Ok(tokens) = env::var("CHAT_MAX_OUTPUT_TOKENS") {
            config.chat_max_output_tokens = tokens
                .parse()
                .wrap_err("Could not parse CHAT_MAX_OUTPUT_TOKENS.")?;
        }

        Ok(config)
    }

    /// Change the output cap of game master replies.
    pub fn with_chat_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.chat_max_output_tokens = max_output_tokens;
        self
    }

    /// Change the upstream request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.gemini = self.gemini.with_timeout(timeout);
        self
    }

    /// Builds the model client and the simulator on top of it.
    pub fn build_simulator(&self) -> Result<Simulator> {
        let client = GeminiClient::new(self.gemini.clone())
            .wrap_err("could not create Gemini client")?;

        Ok(Simulator::new(Arc::new(client))
            .with_chat_max_output_tokens(self.chat_max_output_tokens))
    }
}
