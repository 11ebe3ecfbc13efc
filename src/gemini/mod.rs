use async_trait::async_trait;
use eyre::Result;

mod client;
pub use client::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};

mod types;
pub use types::*;

/// A generative model that turns a request into a single text completion.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Sends the request and returns the completion text.
    ///
    /// Fails on transport, quota or API errors, and when the model returns no text.
    async fn generate(&self, request: GenerateContentRequest) -> Result<String>;

    /// Describes the implementation.
    fn describe(&self) -> String;
}
