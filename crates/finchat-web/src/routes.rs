//! HTTP surface
//!
//! Mirrors the original web app's routes: a chat UI at `/`, tool and prompt
//! enumeration, prompt-driven workflow execution, and a chat endpoint that
//! takes its history from the client. Success responses carry
//! `success: true` and a payload; failures return a non-2xx status with
//! `success: false` and an error string. Malformed JSON is a 400 and unknown
//! routes are a 404, neither of which touches the core.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use finchat_core::{
    ChatMessage, ChatSession, ConversationTurn, RegistryError, ToolDescriptor, WorkflowError,
};

use crate::state::AppState;

type HandlerError = (StatusCode, Json<Value>);
type HandlerResult = Result<Json<Value>, HandlerError>;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/tools", get(get_tools))
        .route("/api/prompts", get(get_prompts))
        .route("/api/execute-prompt", post(execute_prompt))
        .route("/api/chat", post(chat))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

async fn not_found() -> HandlerError {
    failure(StatusCode::NOT_FOUND, "not found")
}

// ============================================================================
// Tool and prompt enumeration
// ============================================================================

#[derive(Serialize)]
struct ParamView {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    required: bool,
    description: String,
}

#[derive(Serialize)]
struct ToolView {
    name: String,
    description: String,
    parameters: Vec<ParamView>,
}

impl From<&ToolDescriptor> for ToolView {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            parameters: descriptor
                .params
                .iter()
                .map(|(name, spec)| ParamView {
                    name: name.clone(),
                    ty: spec.ty.to_string(),
                    required: spec.required,
                    description: spec.description.clone(),
                })
                .collect(),
        }
    }
}

async fn get_tools(State(state): State<AppState>) -> HandlerResult {
    let tools: Vec<ToolView> = state.adapter.descriptors().iter().map(Into::into).collect();
    Ok(Json(json!({ "success": true, "tools": tools })))
}

async fn get_prompts(State(state): State<AppState>) -> HandlerResult {
    Ok(Json(
        json!({ "success": true, "prompts": state.prompts.prompts() }),
    ))
}

// ============================================================================
// Prompt-driven workflows
// ============================================================================

#[derive(Deserialize)]
struct ExecutePromptRequest {
    prompt_name: String,
    #[serde(default)]
    arguments: Value,
}

async fn execute_prompt(
    State(state): State<AppState>,
    payload: Result<Json<ExecutePromptRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = payload.map_err(bad_json)?;

    let outcome = state
        .prompts
        .run_workflow(
            &request.prompt_name,
            &request.arguments,
            &state.engine,
            state.settings.max_rounds,
        )
        .await
        .map_err(|err| failure(workflow_status(&err), err.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "answer": outcome.answer,
        "rounds": outcome.rounds_used,
        "partial": outcome.limit_hit,
        "turns": outcome.transcript.turns(),
    })))
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<HistoryMessage>,
}

#[derive(Deserialize)]
struct HistoryMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ToolCallView {
    name: String,
    args: Value,
    result: String,
    is_error: bool,
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = payload.map_err(bad_json)?;

    let history: Vec<ChatMessage> = request
        .history
        .iter()
        .map(|msg| match msg.role.as_str() {
            "assistant" => ChatMessage::assistant(&msg.content),
            _ => ChatMessage::user(&msg.content),
        })
        .collect();

    let mut session = ChatSession::with_history(state.engine.clone(), &history);
    let seeded = session.transcript().len();

    let outcome = session
        .send(&request.message)
        .await
        .map_err(|err| failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    let tool_calls = collect_tool_calls(&session.transcript().turns()[seeded..]);

    Ok(Json(json!({
        "success": true,
        "data": {
            "response": outcome.answer,
            "tool_calls": tool_calls,
            "rounds": outcome.rounds_used,
            "partial": outcome.limit_hit,
        }
    })))
}

/// Pair tool-call turns with their results, preserving invocation order.
fn collect_tool_calls(turns: &[ConversationTurn]) -> Vec<ToolCallView> {
    let mut views: Vec<(String, ToolCallView)> = Vec::new();
    for turn in turns {
        match turn {
            ConversationTurn::ToolCall { call } => {
                views.push((
                    call.id.clone(),
                    ToolCallView {
                        name: call.name.clone(),
                        args: call.arguments.clone(),
                        result: String::new(),
                        is_error: false,
                    },
                ));
            }
            ConversationTurn::ToolResult { result } => {
                if let Some((_, view)) = views.iter_mut().find(|(id, _)| *id == result.call_id) {
                    view.result = result.content.clone();
                    view.is_error = result.is_error;
                }
            }
            _ => {}
        }
    }
    views.into_iter().map(|(_, view)| view).collect()
}

// ============================================================================
// Error mapping
// ============================================================================

fn failure(status: StatusCode, error: impl Into<String>) -> HandlerError {
    (
        status,
        Json(json!({ "success": false, "error": error.into() })),
    )
}

fn bad_json(rejection: JsonRejection) -> HandlerError {
    failure(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn workflow_status(err: &WorkflowError) -> StatusCode {
    match err {
        WorkflowError::Registry(registry_err) => match registry_err {
            RegistryError::MissingArgument { .. } | RegistryError::InvalidArgument { .. } => {
                StatusCode::BAD_REQUEST
            }
            RegistryError::UnknownTool(_) | RegistryError::UnknownPrompt(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
        WorkflowError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    use finchat_core::{
        registry::{PromptArgSpec, PromptSpec, RawToolOutput, RegistryTransport, ToolSpec},
        ChatEngine, MockProvider, ModelTurn, NoOpLogger, PromptRunner, ProviderModelConfig,
        RegistryHandle, RegistryResult, Settings, ToolAdapter, ToolCall,
    };

    /// Minimal scripted registry for handler tests.
    struct TestRegistry;

    #[async_trait]
    impl RegistryTransport for TestRegistry {
        async fn list_tools(&self) -> RegistryResult<Vec<ToolSpec>> {
            Ok(vec![
                ToolSpec {
                    name: "get_all_hierarchies".to_string(),
                    description: "Get all available hierarchies".to_string(),
                    input_schema: json!({ "type": "object", "properties": {} }),
                },
                ToolSpec {
                    name: "get_hpl_formula".to_string(),
                    description: "Get the HPL formula for a hierarchy".to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": { "hierarchy": { "type": "string" } },
                        "required": ["hierarchy"]
                    }),
                },
            ])
        }

        async fn call_tool(&self, _name: &str, _arguments: Value) -> RegistryResult<RawToolOutput> {
            Ok(RawToolOutput {
                text: "FHC, PRA".to_string(),
                is_error: false,
            })
        }

        async fn list_prompts(&self) -> RegistryResult<Vec<PromptSpec>> {
            Ok(vec![PromptSpec {
                name: "finance_complete_analysis".to_string(),
                description: "Guided multi-step HPL analysis".to_string(),
                arguments: vec![PromptArgSpec {
                    name: "hierarchy".to_string(),
                    description: "Hierarchy to analyze".to_string(),
                    required: true,
                }],
            }])
        }

        async fn get_prompt(
            &self,
            _name: &str,
            _arguments: Value,
        ) -> RegistryResult<Vec<ChatMessage>> {
            Ok(vec![ChatMessage::user("Analyze the FHC hierarchy.")])
        }

        async fn shutdown(self: Box<Self>) -> RegistryResult<()> {
            Ok(())
        }
    }

    async fn test_state(provider: MockProvider) -> AppState {
        let logger = Arc::new(NoOpLogger);
        let handle = RegistryHandle::spawn(Box::new(TestRegistry), logger.clone());

        let adapter = Arc::new(ToolAdapter::new(handle.clone(), logger.clone()));
        adapter.discover().await.unwrap();

        let prompts = Arc::new(PromptRunner::new(handle, logger.clone()));
        prompts.discover().await.unwrap();

        let engine = Arc::new(ChatEngine::new(
            Arc::new(provider),
            Arc::clone(&adapter),
            ProviderModelConfig::new("mock"),
            logger,
        ));

        AppState {
            adapter,
            prompts,
            engine,
            settings: Arc::new(Settings::default()),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_tools() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(Request::builder().uri("/api/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["tools"].as_array().unwrap().len(), 2);
        assert_eq!(body["tools"][1]["parameters"][0]["name"], json!("hierarchy"));
        assert_eq!(body["tools"][1]["parameters"][0]["required"], json!(true));
    }

    #[tokio::test]
    async fn test_get_prompts() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(Request::builder().uri("/api/prompts").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["prompts"][0]["name"], json!("finance_complete_analysis"));
    }

    #[tokio::test]
    async fn test_chat_reports_tool_calls() {
        let provider = MockProvider::scripted(
            vec![
                ModelTurn {
                    text: String::new(),
                    tool_calls: vec![ToolCall::new("c1", "get_all_hierarchies", json!({}))],
                },
                ModelTurn::text("The hierarchies are FHC and PRA."),
            ],
            Arc::new(NoOpLogger),
        );
        let app = router(test_state(provider).await);

        let response = app
            .oneshot(post_json(
                "/api/chat",
                r#"{"message": "What hierarchies are available?", "history": []}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["response"], json!("The hierarchies are FHC and PRA."));
        assert_eq!(body["data"]["tool_calls"][0]["name"], json!("get_all_hierarchies"));
        assert_eq!(body["data"]["tool_calls"][0]["result"], json!("FHC, PRA"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(post_json("/api/chat", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_execute_prompt_missing_argument_is_400() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(post_json(
                "/api/execute-prompt",
                r#"{"prompt_name": "finance_complete_analysis", "arguments": {}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("hierarchy"));
    }

    #[tokio::test]
    async fn test_execute_prompt_returns_turns() {
        let provider = MockProvider::fixed("Analysis complete.", Arc::new(NoOpLogger));
        let app = router(test_state(provider).await);

        let response = app
            .oneshot(post_json(
                "/api/execute-prompt",
                r#"{"prompt_name": "finance_complete_analysis", "arguments": {"hierarchy": "FHC"}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["answer"], json!("Analysis complete."));
        assert_eq!(body["turns"][0]["type"], json!("user"));
    }

    #[tokio::test]
    async fn test_unknown_prompt_is_404() {
        let app = router(test_state(MockProvider::fixed("ok", Arc::new(NoOpLogger))).await);

        let response = app
            .oneshot(post_json(
                "/api/execute-prompt",
                r#"{"prompt_name": "no_such_prompt", "arguments": {}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
