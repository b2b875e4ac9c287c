use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::services::report::ProviderError;

pub const GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini text-generation client
///
/// One generateContent call per report request; the client timeout bounds
/// the call, and dropping the request future releases the connection.
pub struct GeminiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, timeout_secs: u64) -> Self {
        Self::with_base_url(GEMINI_BASE_URL.to_string(), api_key, timeout_secs)
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(base_url: String, api_key: Option<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model: GEMINI_MODEL.to_string(),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the prompt and return the generated text.
    ///
    /// Fails with a classified error instead of degrading: missing key,
    /// non-success status, empty or malformed body, transport failure.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingCredential("gemini"))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = json!({"contents": [{"parts": [{"text": prompt}]}]});

        tracing::info!("Calling Gemini generateContent (prompt length: {})", prompt.len());

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("Gemini HTTP {}", status);

        if !status.is_success() {
            return Err(ProviderError::RemoteStatus(status.as_u16()));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|_| ProviderError::EmptyResponse)?;

        extract_text(&data).ok_or(ProviderError::EmptyResponse)
    }
}

/// Pull the generated text out of a generateContent response body.
fn extract_text(data: &Value) -> Option<String> {
    let text = data
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_candidates() {
        let data = json!({
            "candidates": [{"content": {"parts": [{"text": "  שלום  "}]}}]
        });
        assert_eq!(extract_text(&data).unwrap(), "שלום");
    }

    #[test]
    fn test_extract_text_missing_or_empty() {
        assert!(extract_text(&json!({})).is_none());
        assert!(extract_text(&json!({"candidates": []})).is_none());
        let blank = json!({"candidates": [{"content": {"parts": [{"text": "   "}]}}]});
        assert!(extract_text(&blank).is_none());
    }

    #[test]
    fn test_missing_key_is_a_configuration_error() {
        let client = GeminiClient::new(None, 5);
        let err = tokio_test::block_on(client.generate("prompt")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let client = GeminiClient::new(Some("   ".to_string()), 5);
        let err = tokio_test::block_on(client.generate("prompt")).unwrap_err();
        assert!(matches!(err, ProviderError::MissingCredential("gemini")));
    }
}
