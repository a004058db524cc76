//! Learning backend client
//!
//! Fetches the student profile and the worksheet prompt for a board. The
//! caller's key is passed through as a bearer token.

use std::time::Duration;

use aacdoc_core::StudentProfile;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{ClientError, Result};

/// Default backend base URL
pub const DEFAULT_BACKEND_URL: &str = "https://aaclearningbackend.azurewebsites.net/api/WebAAC";

/// Profile endpoint name
pub const PROFILE_ENDPOINT: &str = "GetUserStudySheetData";
/// Prompt endpoint name
pub const PROMPT_ENDPOINT: &str = "GetBoardPromptWordData";

/// Field of the prompt response holding the worksheet template text
const PROMPT_FIELD: &str = "promptContent";

/// Everything fetched from the backend for one request
#[derive(Debug, Clone)]
pub struct CaseMaterials {
    /// Parsed student profile
    pub profile: StudentProfile,
    /// Worksheet template text for the board
    pub prompt_content: String,
}

/// Client for the learning backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl BackendClient {
    /// Create a client for the default backend
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_url(DEFAULT_BACKEND_URL, api_key)
    }

    /// Create a client for a custom backend URL
    pub fn with_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
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

    /// Fetch and flatten the student profile
    pub async fn fetch_profile(&self) -> Result<StudentProfile> {
        let url = format!("{}/{}", self.base_url, PROFILE_ENDPOINT);
        debug!(%url, "fetching student profile");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let payload: Value = check_status(PROFILE_ENDPOINT, response).await?.json().await?;

        Ok(StudentProfile::from_value(&payload))
    }

    /// Fetch the worksheet prompt text for a board
    pub async fn fetch_prompt(&self, board_id: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, PROMPT_ENDPOINT);
        debug!(%url, board_id, "fetching board prompt");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({ "ID": board_id }))
            .send()
            .await?;
        let payload: Value = check_status(PROMPT_ENDPOINT, response).await?.json().await?;

        payload
            .get(PROMPT_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::MissingField {
                endpoint: PROMPT_ENDPOINT.to_string(),
                field: PROMPT_FIELD.to_string(),
            })
    }

    /// Fetch profile and prompt concurrently. Either failure fails both.
    pub async fn fetch_all(&self, board_id: &str) -> Result<CaseMaterials> {
        let (profile, prompt_content) =
            tokio::try_join!(self.fetch_profile(), self.fetch_prompt(board_id))?;
        info!(
            student = %profile.name,
            prompt_len = prompt_content.len(),
            "backend data received"
        );
        Ok(CaseMaterials {
            profile,
            prompt_content,
        })
    }
}

/// Turn a non-success status into [`ClientError::Api`]
pub(crate) async fn check_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = BackendClient::with_url("http://localhost:9000/api/", "key").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }

    #[test]
    fn test_default_url() {
        let client = BackendClient::new("key").unwrap();
        assert!(client.base_url().ends_with("/api/WebAAC"));
    }
}
