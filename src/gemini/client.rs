use async_trait::async_trait;
use eyre::{eyre, Context, Result};
use reqwest::Url;
use std::time::Duration;

use super::{GenerateContentRequest, GenerateContentResponse, GenerativeModel};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini-specific configurations.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, sent with every request.
    pub api_key: String,
    /// Model name, such as `gemini-2.5-flash`.
    pub model: String,
    /// Root URL of the API, overridable for tests and proxies.
    pub api_url: Url,
    /// Optional timeout for each request, transport defaults apply otherwise.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: String, model: String, api_url: Url) -> Self {
        Self {
            api_key,
            model,
            api_url,
            timeout: None,
        }
    }

    /// Change the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the `generateContent` endpoint.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().wrap_err("could not build HTTP client")?;

        // without a trailing slash, `join` would replace the last path segment
        let mut api_url = config.api_url;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let endpoint = api_url
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .wrap_err("could not build generateContent endpoint")?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
            model: config.model,
        })
    }

    /// Full URL that requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Extracts the completion text out of a response.
    fn completion_text(response: GenerateContentResponse) -> Result<String> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(eyre!("prompt was blocked: {}", reason));
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("response has no candidates"))?;

        match candidate.content {
            Some(content) if !content.parts.is_empty() => Ok(content.text()),
            _ => Err(eyre!(
                "candidate has no content (finish reason: {})",
                candidate.finish_reason.unwrap_or_else(|| "unknown".to_string())
            )),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerateContentRequest) -> Result<String> {
        log::debug!(
            "Sending {} content(s) to {}",
            request.contents.len(),
            self.model
        );

        let res = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .wrap_err("could not reach Gemini API")?;

        let status = res.status();
        let body = res.text().await.wrap_err("could not read Gemini response")?;
        if !status.is_success() {
            return Err(eyre!("Gemini API error {}: {}", status, body));
        }

        let response = serde_json::from_str::<GenerateContentResponse>(&body)
            .wrap_err_with(|| format!("could not parse Gemini response: {}", body))?;

        Self::completion_text(response)
    }

    fn describe(&self) -> String {
        format!("Gemini with model {}", self.model)
    }
}
