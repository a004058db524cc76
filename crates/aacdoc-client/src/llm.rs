//! Chat-completions client for structured content
//!
//! Requests use a strict `json_schema` response format built from the
//! content schema, so the reply is a JSON document the core crate can parse.
//! Prompts and replies are only logged at debug level.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::error::{ClientError, Result};

/// Default OpenAI-compatible base URL
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
/// Model used for the lesson plan and worksheet
pub const DEFAULT_ASSET_MODEL: &str = "gpt-4o-mini";
/// Model used for the evaluation rubric
pub const DEFAULT_EVALUATION_MODEL: &str = "o3";

const COMPLETIONS_ENDPOINT: &str = "chat/completions";

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone)]
pub struct LlmClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl LlmClient {
    /// Create a client for the default endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(DEFAULT_LLM_URL, api_key)
    }

    /// Create a client for a custom endpoint
    pub fn with_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // Reasoning models can take minutes on long prompts
        let client = Client::builder().timeout(Duration::from_secs(300)).build()?;
        Ok(Self {
            base_url,
            api_key: api_key.into(),
            client,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one system prompt and return the raw JSON text of the reply
    #[instrument(level = "info", skip(self, system, schema), fields(model = %model))]
    pub async fn complete_json(
        &self,
        model: &str,
        system: &str,
        schema_name: &str,
        schema: Value,
    ) -> Result<String> {
        let url = format!("{}/{}", self.base_url, COMPLETIONS_ENDPOINT);
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![ChatMessageReq {
                role: "system".into(),
                content: system.into(),
            }],
            response_format: ResponseFormat {
                kind: "json_schema".into(),
                json_schema: JsonSchemaFormat {
                    name: schema_name.to_string(),
                    strict: true,
                    schema,
                },
            },
        };
        debug!(prompt = system, "sending completion request");

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, concat!("aacdoc/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            return Err(ClientError::Api {
                endpoint: COMPLETIONS_ENDPOINT.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response.json().await?;
        if let Some(usage) = &body.usage {
            info!(
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                elapsed = ?start.elapsed(),
                "completion received"
            );
        }

        let text = reply_content(body)
            .ok_or_else(|| ClientError::EmptyContent(schema_name.to_string()))?;
        debug!(reply = %text, "completion content");
        Ok(text)
    }
}

/// Content of the first choice, unless it is missing, blank or a refusal
fn reply_content(body: ChatCompletionResponse) -> Option<String> {
    let message = body.choices.into_iter().next()?.message;
    if message.refusal.is_some() {
        return None;
    }
    message.content.filter(|c| !c.trim().is_empty())
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessageReq>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessageReq {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: Value,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResp,
}

#[derive(Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

/// Pull `error.message` out of an error body
fn extract_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorWrap {
        error: ErrorObj,
    }
    #[derive(Deserialize)]
    struct ErrorObj {
        message: String,
    }
    serde_json::from_str::<ErrorWrap>(body)
        .ok()
        .map(|w| w.error.message)
}

/// A strict object schema: every property required, nothing else allowed
fn object(properties: Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn string() -> Value {
    json!({ "type": "string" })
}

fn array(items: Value) -> Value {
    json!({ "type": "array", "items": items })
}

fn titled_items() -> Value {
    array(object(json!({ "title": string(), "explanation": string() })))
}

fn questions() -> Value {
    array(object(json!({ "question": string() })))
}

/// Response schema for the lesson plan and worksheet
pub fn learning_asset_schema() -> Value {
    object(json!({
        "lesson_plan": object(json!({
            "title": string(),
            "objectives": string(),
            "content": array(string()),
            "teaching_methods": titled_items(),
            "teaching_steps": titled_items(),
            "assessment_methods": titled_items(),
        })),
        "worksheet": object(json!({
            "practice_questions": questions(),
            "activity_guides": array(object(json!({ "description": string() }))),
            "reflection_questions": questions(),
            "assessment_questions": questions(),
            "self_assessment_items": array(object(json!({ "item": string() }))),
            "collaborative_learning_activity": string(),
        })),
    }))
}

/// Response schema for the evaluation rubric
pub fn evaluation_schema() -> Value {
    object(json!({
        "evaluation_asset_title": string(),
        "evaluation_items": array(object(json!({
            "evaluation_item_title": string(),
            "evaluation_metric": string(),
            "score_descriptions": object(json!({
                "excellent_with_score_4": string(),
                "good_with_score_3": string(),
                "fair_with_score_2": string(),
                "needs_improvement_with_score_1": string(),
            })),
        }))),
    }))
}
