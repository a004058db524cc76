//! Backend and model calls against a local canned-response server

use std::sync::{Arc, Mutex};

use aacdoc_client::{BackendClient, CaseMaterials, ClientError, ContentGenerator, LlmClient};
use aacdoc_core::StudentProfile;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const LEARNING_ASSET: &str = include_str!("../../aacdoc-core/tests/fixtures/learning_asset.json");
const EVALUATION: &str = include_str!("../../aacdoc-core/tests/fixtures/evaluation.json");

/// A canned answer, chosen when the raw request contains `needle`
#[derive(Clone)]
struct Route {
    needle: &'static str,
    status: u16,
    body: String,
}

fn route(needle: &'static str, status: u16, body: String) -> Route {
    Route {
        needle,
        status,
        body,
    }
}

fn completion(content: &str) -> String {
    json!({ "choices": [{ "message": { "content": content } }] }).to_string()
}

type Seen = Arc<Mutex<Vec<String>>>;

async fn serve(routes: Vec<Route>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let (status, body) = routes
                    .iter()
                    .find(|r| request.contains(r.needle))
                    .map(|r| (r.status, r.body.clone()))
                    .unwrap_or((404, String::new()));
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), seen)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn materials() -> CaseMaterials {
    CaseMaterials {
        profile: StudentProfile::from_value(&json!({ "name": "小明", "teaching_Time": "40" })),
        prompt_content: "洗手學習單".to_string(),
    }
}

#[tokio::test]
async fn test_fetch_all_joins_profile_and_prompt() {
    let (url, seen) = serve(vec![
        route(
            "GetUserStudySheetData",
            200,
            json!({ "name": "小明", "disability": "[\"自閉症\"]" }).to_string(),
        ),
        route(
            "GetBoardPromptWordData",
            200,
            json!({ "promptContent": "洗手學習單" }).to_string(),
        ),
    ])
    .await;

    let client = BackendClient::with_url(&url, "user-key").unwrap();
    let materials = client.fetch_all("42").await.unwrap();

    assert_eq!(materials.prompt_content, "洗手學習單");
    assert!(materials.profile.case_info().contains("姓名: 小明"));
    assert!(materials.profile.case_info().contains("障礙類別: 自閉症"));

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.starts_with("GET "));
        assert!(request.to_lowercase().contains("authorization: bearer user-key"));
    }
    let prompt_request = requests
        .iter()
        .find(|r| r.contains("GetBoardPromptWordData"))
        .unwrap();
    assert!(prompt_request.contains(r#"{"ID":"42"}"#));
}

#[tokio::test]
async fn test_failed_fetch_fails_the_pair() {
    let (url, _) = serve(vec![
        route("GetUserStudySheetData", 200, json!({ "name": "小明" }).to_string()),
        route("GetBoardPromptWordData", 500, "boom".to_string()),
    ])
    .await;

    let client = BackendClient::with_url(&url, "user-key").unwrap();
    match client.fetch_all("42").await {
        Err(ClientError::Api {
            endpoint, status, ..
        }) => {
            assert_eq!(endpoint, "GetBoardPromptWordData");
            assert_eq!(status, 500);
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_prompt_content() {
    let (url, _) = serve(vec![route(
        "GetBoardPromptWordData",
        200,
        json!({ "other": 1 }).to_string(),
    )])
    .await;

    let client = BackendClient::with_url(&url, "user-key").unwrap();
    let err = client.fetch_prompt("42").await.unwrap_err();
    assert!(matches!(err, ClientError::MissingField { ref field, .. } if field == "promptContent"));
}

#[tokio::test]
async fn test_generate_parses_both_documents() {
    let (url, seen) = serve(vec![
        route(r#""name":"LearningAsset""#, 200, completion(LEARNING_ASSET)),
        route(r#""name":"EvaluationAssetTable""#, 200, completion(EVALUATION)),
    ])
    .await;

    let generator = ContentGenerator::new(LlmClient::with_url(&url, "sk-test").unwrap());
    let content = generator.generate(&materials()).await.unwrap();

    assert_eq!(content.learning_asset.lesson_plan.teaching_methods.len(), 3);
    assert_eq!(content.evaluation.evaluation_items.len(), 4);

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    let asset_request = requests
        .iter()
        .find(|r| r.contains("LearningAsset"))
        .unwrap();
    assert!(asset_request.starts_with("POST /chat/completions"));
    assert!(asset_request.contains(r#""model":"gpt-4o-mini""#));
    assert!(asset_request.contains(r#""strict":true"#));
    // Placeholders are filled before sending
    assert!(asset_request.contains("姓名: 小明"));
    assert!(!asset_request.contains("<case_info>"));
    let evaluation_request = requests
        .iter()
        .find(|r| r.contains("EvaluationAssetTable"))
        .unwrap();
    assert!(evaluation_request.contains(r#""model":"o3""#));
}

#[tokio::test]
async fn test_refusal_is_empty_content() {
    let refusal = json!({
        "choices": [{ "message": { "content": null, "refusal": "cannot help" } }]
    })
    .to_string();
    let (url, _) = serve(vec![route("chat/completions", 200, refusal)]).await;

    let generator = ContentGenerator::new(LlmClient::with_url(&url, "sk-test").unwrap());
    let err = generator
        .generate_evaluation("姓名: 小明", "洗手")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::EmptyContent(_)));
}

#[tokio::test]
async fn test_schema_mismatch_is_reported() {
    let (url, _) = serve(vec![route(
        "chat/completions",
        200,
        completion(r#"{"evaluation_asset_title": "洗手"}"#),
    )])
    .await;

    let generator = ContentGenerator::new(LlmClient::with_url(&url, "sk-test").unwrap());
    let err = generator
        .generate_evaluation("姓名: 小明", "洗手")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Schema(_)));
}

#[tokio::test]
async fn test_model_error_message_is_extracted() {
    let body = json!({ "error": { "message": "Invalid API key" } }).to_string();
    let (url, _) = serve(vec![route("chat/completions", 401, body)]).await;

    let generator = ContentGenerator::new(LlmClient::with_url(&url, "sk-bad").unwrap());
    match generator.generate_learning_asset("a", "b").await {
        Err(ClientError::Api {
            status, message, ..
        }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
