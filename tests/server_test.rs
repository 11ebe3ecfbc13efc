//! Tests the HTTP surface against a fake model, no network access is needed.
//!
//! The fake fails whenever the newest message contains `fail`, so a single router
//! can serve both failing and succeeding requests.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use eyre::{eyre, Result};
use rapid_response_sim::{
    gemini::{GenerateContentRequest, GenerativeModel},
    server::router,
    simulation::{Scenario, Simulator},
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct FakeModel {
    requests: Mutex<Vec<GenerateContentRequest>>,
}

#[async_trait]
impl GenerativeModel for FakeModel {
    async fn generate(&self, request: GenerateContentRequest) -> Result<String> {
        let last = request.contents.last().map(|c| c.text()).unwrap_or_default();
        let count = request.contents.len();
        self.requests.lock().unwrap().push(request);

        if last.ends_with("fail") || last.ends_with("fail\n") {
            Err(eyre!("quota exceeded"))
        } else {
            Ok(format!("reply to {} content(s)", count))
        }
    }

    fn describe(&self) -> String {
        "fake".to_string()
    }
}

fn app() -> (Router, Arc<FakeModel>) {
    let model = Arc::new(FakeModel::default());
    let app = router(Simulator::new(model.clone()));
    (app, model)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_start_simulation() {
    let (app, model) = app();

    let (status, body) = send(
        &app,
        Request::get("/start-simulation?scenario=responder")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": Scenario::Responder.opening() }));

    for uri in ["/start-simulation?scenario=unknown", "/start-simulation"] {
        let (status, body) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": Scenario::Discoverer.opening() }));
    }

    // openings never reach the model
    assert!(model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat() {
    let (app, model) = app();

    let (status, body) = send(
        &app,
        post_json(
            "/chat",
            json!({
                "history": [
                    { "role": "user", "text": "A" },
                    { "role": "ai", "text": "B" },
                    { "role": "ai", "text": "C" }
                ],
                "message": "D"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "reply to 3 content(s)" }));

    let requests = model.requests.lock().unwrap();
    let contents = &requests[0].contents;
    assert!(contents[0].text().ends_with("\n\n---\nA"));
    assert_eq!(contents[1].text(), "B\n\n---\nC");
    assert_eq!(contents[2].text(), "D");
}

#[tokio::test]
async fn test_chat_without_history() {
    let (app, _) = app();

    let (status, body) = send(&app, post_json("/chat", json!({ "message": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "reply to 1 content(s)" }));
}

#[tokio::test]
async fn test_null_fields_are_defaulted() {
    let (app, model) = app();

    let (status, body) = send(
        &app,
        post_json("/chat", json!({ "history": null, "message": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "text": "reply to 1 content(s)" }));

    let (status, _) = send(
        &app,
        post_json("/chat", json!({ "history": null, "message": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_json("/evaluate", json!({ "history": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "evaluation": "reply to 1 content(s)" }));

    // odd role tags and null text inside the history are tolerated too
    let (status, _) = send(
        &app,
        post_json(
            "/chat",
            json!({
                "history": [
                    { "role": null, "text": "x" },
                    { "role": 1, "text": null }
                ],
                "message": "y"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 4);
    assert!(requests[1].contents[0].text().ends_with("\n\n---\n"));
    assert!(requests[3].contents[0]
        .text()
        .ends_with("\n\n---\nx\n\n---\n\n\n---\ny"));
}

#[tokio::test]
async fn test_evaluate() {
    let (app, model) = app();

    let (status, body) = send(
        &app,
        post_json(
            "/evaluate",
            json!({ "history": [{ "role": "ai", "text": "opening" }, { "role": "user", "text": "はい" }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "evaluation": "reply to 1 content(s)" }));

    let requests = model.requests.lock().unwrap();
    assert!(requests[0].contents[0]
        .text()
        .contains("ゲームマスター: opening\nあなた: はい"));
}

#[tokio::test]
async fn test_upstream_failure_is_isolated() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        post_json("/chat", json!({ "history": [], "message": "fail" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to communicate with AI" }));

    let (status, body) = send(
        &app,
        post_json(
            "/evaluate",
            json!({ "history": [{ "role": "user", "text": "fail" }] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "評価の生成に失敗しました。" }));

    // the same router keeps serving
    let (status, _) = send(
        &app,
        post_json("/chat", json!({ "history": [], "message": "ok" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body() {
    let (app, model) = app();

    let request = Request::post("/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert!(model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();

    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "model": "fake" }));
}
