use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error::ApiError, AppState};
use crate::simulation::{null_as_default, Turn};

const CHAT_ERROR: &str = "Failed to communicate with AI";
const EVALUATE_ERROR: &str = "評価の生成に失敗しました。";

/// Query of `GET /start-simulation`.
#[derive(Debug, Default, Deserialize)]
pub struct StartQuery {
    pub scenario: Option<String>,
}

/// Body of `POST /chat`, absent and `null` fields are read as empty.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<Turn>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Body of `POST /evaluate`, an absent or `null` history is read as empty.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<Turn>,
}

/// Response of `/start-simulation` and `/chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

/// Response of `/evaluate`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub evaluation: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
}

/// Turns a body rejection into our error shape.
fn reject(rejection: JsonRejection) -> ApiError {
    log::warn!("Rejected request body: {}", rejection.body_text());
    ApiError::bad_request(rejection.body_text())
}

pub async fn start_simulation(
    State(state): State<AppState>,
    query: Result<Query<StartQuery>, QueryRejection>,
) -> Json<TextResponse> {
    // a malformed query string selects the default scenario
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let text = state.simulator.start(query.scenario.as_deref());
    Json(TextResponse {
        text: text.to_string(),
    })
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TextResponse>, ApiError> {
    let Json(body) = body.map_err(reject)?;
    let text = state
        .simulator
        .chat(&body.history, &body.message)
        .await
        .map_err(|e| ApiError::upstream("/chat", e, CHAT_ERROR))?;

    Ok(Json(TextResponse { text }))
}

pub async fn evaluate(
    State(state): State<AppState>,
    body: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let Json(body) = body.map_err(reject)?;
    let evaluation = state
        .simulator
        .evaluate(&body.history)
        .await
        .map_err(|e| ApiError::upstream("/evaluate", e, EVALUATE_ERROR))?;

    Ok(Json(EvaluationResponse { evaluation }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model: state.simulator.describe(),
    })
}
