//! End-to-end tests for the Pepil pipeline.
//!
//! These exercise the bundled datasets through compilation, prompt assembly,
//! the chat service and the HTTP layer, with a scripted provider standing in
//! for the model.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pepil_core::error::ProviderError;
use pepil_core::message::{Message, Role};
use pepil_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use pepil_gateway::{ChatService, GatewayState, build_router};
use pepil_knowledge::{DatasetSource, DirectorySource, KnowledgeCompiler, build_prompt};
use tower::ServiceExt;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence and keeps
/// every request it saw.
struct ScriptedProvider {
    replies: Vec<&'static str>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let reply = self.replies.get(requests.len()).unwrap_or_else(|| {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                requests.len(),
                self.replies.len()
            )
        });
        let model = request.model.clone();
        requests.push(request);
        Ok(ProviderResponse {
            message: Message::assistant(*reply),
            usage: Some(Usage {
                prompt_tokens: 1000,
                completion_tokens: 20,
                total_tokens: 1020,
            }),
            model,
        })
    }
}

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[test]
fn bundled_document_covers_every_section() {
    let compiler = KnowledgeCompiler::new(DirectorySource::new(data_dir()));
    let doc = compiler.compile().unwrap();

    assert_eq!(doc.matches("\n# ").count() + 1, 9);
    assert!(doc.contains("- 토닝과 보톡스 (시술: 레이저 토닝, 보톡스)의 추천 순서는 '레이저 토닝 → 보톡스' 입니다."));
    assert!(doc.contains("- 레이저 토닝: 김원장 10분, 이원장 11분, 박원장 12분 30초"));
    assert!(doc.contains("- 프락셀: 김원장 20분 50초, 이원장 23분, 박원장 26분"));
    assert!(doc.contains("- 물광 주사 준비: 시술 10분 (마취 30분)"));
    assert!(doc.contains("## 레이저\n- LDM: 시술 15분"));
    assert!(doc.contains("- 버전 1.2.0 (2024-07-15):"));
}

#[tokio::test]
async fn multi_turn_chat_through_gateway() {
    let source = DirectorySource::new(data_dir());
    let kb = Arc::new(source.load().unwrap());
    let provider = ScriptedProvider::new(vec![
        "레이저 토닝을 먼저 받으시고 보톡스를 맞으시면 됩니다.",
        "김원장님은 필러에 13분 정도 걸립니다.",
    ]);

    let chat = ChatService::new(provider.clone(), kb.clone(), "gpt-3.5-turbo");
    let expected_prompt = chat.system_prompt().unwrap();
    let app = build_router(
        Arc::new(GatewayState::new(chat, &kb)),
        &["*".to_string()],
    );

    let first = serde_json::json!({
        "messages": [{"role": "user", "content": "토닝이랑 보톡스 같이 받으면 순서가 어떻게 되나요?"}]
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(first.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["response"],
        "레이저 토닝을 먼저 받으시고 보톡스를 맞으시면 됩니다."
    );

    let second = serde_json::json!({
        "messages": [
            {"role": "user", "content": "토닝이랑 보톡스 같이 받으면 순서가 어떻게 되나요?"},
            {"role": "assistant", "content": "레이저 토닝을 먼저 받으시고 보톡스를 맞으시면 됩니다."},
            {"role": "user", "content": "김원장님 필러는 얼마나 걸려요?"}
        ]
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/chat")
                .header("content-type", "application/json")
                .body(Body::from(second.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(provider.calls(), 2);
    let requests = provider.requests.lock().unwrap();
    for request in requests.iter() {
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, expected_prompt);
    }
    let roles: Vec<Role> = requests[1].messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::System, Role::User, Role::Assistant, Role::User]);
}

#[test]
fn prompt_embeds_compiled_document() {
    let compiler = KnowledgeCompiler::new(DirectorySource::new(data_dir()));
    let doc = compiler.compile().unwrap();
    let prompt = build_prompt(doc);

    assert!(prompt.starts_with("당신은 '어레인지 클리닉'의 AI 전문가 '페필이'입니다."));
    assert!(prompt.contains(doc));
}

#[tokio::test]
async fn gateway_refuses_to_start_on_broken_datasets() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("genmac.json"), "{ broken").unwrap();

    let mut config = pepil_config::AppConfig::default();
    config.knowledge.data_dir = dir.path().to_path_buf();
    config.gateway.port = 1;

    let err = pepil_gateway::start(config).await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("4 problem(s)"), "{message}");
    assert!(message.contains("genmac.json: malformed JSON"));
    assert!(message.contains("patch-notes.json: file not found"));
}

#[tokio::test]
async fn gateway_refuses_to_start_without_api_key() {
    let mut config = pepil_config::AppConfig::default();
    config.knowledge.data_dir = data_dir();
    config.api_key = None;
    config.gateway.port = 1;

    let err = pepil_gateway::start(config).await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Provider not configured: openai"), "{message}");
}
