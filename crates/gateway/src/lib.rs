//! HTTP API gateway for Pepil.
//!
//! Exposes the chat endpoint used by the clinic's chat widget, the raw
//! dataset view used by the dashboard, and a health check.
//!
//! Built on Axum. Datasets are loaded and compiled once at startup; a broken
//! dataset directory stops the server before it binds.

pub mod chat;
pub mod dashboard;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, Method, StatusCode, header},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use pepil_core::error::ProviderError;
use pepil_core::message::{Conversation, Message, Role};
use pepil_knowledge::{DatasetSource, DirectorySource, KnowledgeBase};

pub use chat::ChatService;
pub use dashboard::DashboardData;

/// Prefix of the reply text sent when compilation or the provider fails.
pub const SERVER_ERROR_PREFIX: &str = "AI 모델 호출 중 서버 오류 발생";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub chat: ChatService,
    pub dashboard: DashboardData,
}

impl GatewayState {
    pub fn new(chat: ChatService, knowledge: &KnowledgeBase) -> Self {
        Self {
            chat,
            dashboard: DashboardData::from_knowledge(knowledge),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/chat",
            post(chat_handler)
                .options(preflight_handler)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/data",
            get(data_handler).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured origins; `"*"` allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the gateway HTTP server.
///
/// Loads and compiles the knowledge base before binding, so dataset problems
/// surface as a startup error rather than as failed chat requests.
pub async fn start(config: pepil_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let source = DirectorySource::new(config.knowledge.data_dir.clone());
    let knowledge = Arc::new(source.load()?);
    info!(
        dir = %source.describe(),
        doctors = knowledge.doctors.len(),
        procedures = knowledge.procedures.len(),
        "Datasets loaded"
    );

    if !config.has_api_key() {
        return Err(ProviderError::NotConfigured(format!(
            "{}: no API key, set PEPIL_API_KEY or OPENAI_API_KEY",
            config.default_provider
        ))
        .into());
    }

    let router = pepil_providers::build_from_config(&config);
    let provider = router.default().ok_or_else(|| {
        ProviderError::NotConfigured(format!("{}: not registered", router.default_name()))
    })?;

    let chat = ChatService::new(provider, knowledge.clone(), &config.default_model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens);
    chat.system_prompt()?;

    let state = Arc::new(GatewayState::new(chat, &knowledge));
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, provider = %config.default_provider, model = %config.default_model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ClientMessage>,
}

/// One turn of the client-held conversation history.
#[derive(Debug, Deserialize)]
pub struct ClientMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message.into() })))
}

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| bad_request(e.body_text()))?;

    if payload.messages.is_empty() {
        return Err(bad_request("messages must contain at least one entry"));
    }

    let conversation = Conversation::from_messages(
        payload
            .messages
            .into_iter()
            .map(|m| Message::new(m.role, m.content))
            .collect(),
    );

    info!(
        conversation = %conversation.id,
        turns = conversation.messages.len(),
        query_chars = conversation
            .last_user_message()
            .map_or(0, |m| m.content.chars().count()),
        estimated_tokens = conversation.estimated_tokens(),
        "Chat request"
    );

    match state.chat.reply(&conversation.messages).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(e) => {
            error!(error = %e, "Chat request failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "response": format!("{SERVER_ERROR_PREFIX}: {e}") })),
            ))
        }
    }
}

async fn data_handler(State(state): State<SharedState>) -> Json<DashboardData> {
    Json(state.dashboard.clone())
}

async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method Not Allowed" })),
    )
}
