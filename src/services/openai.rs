use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::services::report::ProviderError;

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const SYSTEM_PROMPT: &str = "אתה יועץ רגולציה. כתוב בעברית פשוטה ועניינית.";

/// OpenAI chat-completions client
pub struct OpenAiClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, model: String, timeout_secs: u64) -> Self {
        Self::with_base_url(OPENAI_BASE_URL.to_string(), api_key, model, timeout_secs)
    }

    /// Point the client at a different endpoint (used by tests).
    pub fn with_base_url(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the prompt as a chat completion and return the reply text.
    ///
    /// Same failure contract as the Gemini client: classified errors,
    /// no silent degradation.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingCredential("openai"))?;

        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.3,
            "max_tokens": 1000
        });

        tracing::info!(
            "Calling OpenAI chat completion (model: {}, prompt length: {})",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("OpenAI HTTP {}", status);

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

/// Pull the reply text out of a chat-completions response body.
fn extract_text(data: &Value) -> Option<String> {
    let text = data
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
