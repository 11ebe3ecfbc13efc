use eyre::{Context, Result};
use std::sync::Arc;

mod history;
pub use history::{null_as_default, History, Role, Turn};

mod normalize;
pub use normalize::{normalize, NormalizedMessage, RoleClass, MERGE_SEPARATOR};

mod scenario;
pub use scenario::Scenario;

pub mod prompts;

use crate::gemini::{permit_all_safety_settings, GenerateContentRequest, GenerativeModel};

/// Default cap on the length of a game master reply.
pub const DEFAULT_CHAT_MAX_OUTPUT_TOKENS: u32 = 300;

/// The simulation itself: openings, game master turns and the final evaluation.
///
/// Holds no conversation state, the client sends the whole history each time.
#[derive(Clone)]
pub struct Simulator {
    model: Arc<dyn GenerativeModel>,
    chat_max_output_tokens: u32,
}

impl Simulator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            chat_max_output_tokens: DEFAULT_CHAT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Change the output cap of game master replies.
    pub fn with_chat_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.chat_max_output_tokens = max_output_tokens;
        self
    }

    /// Describes the underlying model.
    pub fn describe(&self) -> String {
        self.model.describe()
    }

    /// Returns the opening narrative of the selected scenario.
    pub fn start(&self, selector: Option<&str>) -> &'static str {
        let scenario = Scenario::from_selector(selector);
        log::debug!("Starting {} scenario", scenario);
        scenario.opening()
    }

    /// Request for the next game master turn.
    pub fn chat_request(&self, history: &[Turn], message: &str) -> GenerateContentRequest {
        GenerateContentRequest::chat(normalize(prompts::GAME_MASTER_RULES, history, message))
            .with_safety_settings(permit_all_safety_settings())
            .with_max_output_tokens(self.chat_max_output_tokens)
    }

    /// Request for the evaluation of a finished drill.
    pub fn evaluation_request(&self, history: &[Turn]) -> GenerateContentRequest {
        GenerateContentRequest::prompt(prompts::evaluation_prompt(history))
            .with_safety_settings(permit_all_safety_settings())
    }

    /// Plays the next game master turn.
    pub async fn chat(&self, history: &[Turn], message: &str) -> Result<String> {
        log::debug!("Chat turn with {} prior turn(s)", history.len());
        self.model
            .generate(self.chat_request(history, message))
            .await
            .wrap_err("could not generate game master reply")
    }

    /// Scores the drill and returns the evaluation in markdown.
    pub async fn evaluate(&self, history: &[Turn]) -> Result<String> {
        log::debug!("Evaluating {} turn(s)", history.len());
        self.model
            .generate(self.evaluation_request(history))
            .await
            .wrap_err("could not generate evaluation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use eyre::eyre;
    use std::sync::Mutex;

    /// Records requests and echoes the last content's text back.
    #[derive(Default)]
    struct EchoModel {
        requests: Mutex<Vec<GenerateContentRequest>>,
    }

    #[async_trait]
    impl GenerativeModel for EchoModel {
        async fn generate(&self, request: GenerateContentRequest) -> Result<String> {
            let text = request
                .contents
                .last()
                .map(|c| c.text())
                .ok_or_else(|| eyre!("no contents"))?;
            self.requests.lock().unwrap().push(request);
            Ok(text)
        }

        fn describe(&self) -> String {
            "echo".to_string()
        }
    }

    #[tokio::test]
    async fn test_chat_request() {
        let model = Arc::new(EchoModel::default());
        let simulator = Simulator::new(model.clone()).with_chat_max_output_tokens(42);

        let history = vec![Turn::assistant("opening")];
        let reply = simulator.chat(&history, "call for help").await.unwrap();
        assert_eq!(reply, "call for help");

        let requests = model.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].text(), prompts::GAME_MASTER_RULES);
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(request.safety_settings, permit_all_safety_settings());
        assert_eq!(
            request.generation_config.as_ref().unwrap().max_output_tokens,
            Some(42)
        );
    }

    #[tokio::test]
    async fn test_evaluation_request() {
        let model = Arc::new(EchoModel::default());
        let simulator = Simulator::new(model.clone());

        let history = vec![Turn::assistant("opening"), Turn::user("はい")];
        let evaluation = simulator.evaluate(&history).await.unwrap();
        assert!(evaluation.ends_with("ゲームマスター: opening\nあなた: はい\n"));

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests[0].contents.len(), 1);
        assert_eq!(requests[0].contents[0].role.as_deref(), Some("user"));
        assert!(requests[0].generation_config.is_none());
    }

    #[test]
    fn test_start() {
        let simulator = Simulator::new(Arc::new(EchoModel::default()));
        assert_eq!(
            simulator.start(Some("responder")),
            Scenario::Responder.opening()
        );
        assert_eq!(simulator.start(None), Scenario::Discoverer.opening());
    }
}
