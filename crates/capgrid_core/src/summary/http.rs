//! OpenAI-compatible chat-completions summary generator.

use super::{SummaryError, SummaryGenerator, SummaryRequest};
use crate::config::SummaryConfig;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

const SYSTEM_PROMPT: &str =
    "You are an analyst writing a short, neutral comparison of software products.";
const TEMPERATURE: f64 = 0.3;

/// Summary generator calling `<endpoint>/chat/completions`.
pub struct HttpSummaryGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpSummaryGenerator {
    /// Builds a generator from config, resolving the API key.
    ///
    /// A missing key is not an error here; calls fail with
    /// `MissingCredentials` instead.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.resolve_api_key(),
        })
    }
}

impl SummaryGenerator for HttpSummaryGenerator {
    fn generate(&self, request: &SummaryRequest) -> Result<String, SummaryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SummaryError::MissingCredentials)?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": request.to_prompt() },
            ],
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(api_key)
            .json(&body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SummaryError::Status(status.as_u16()));
        }

        let payload: Value = response.json()?;
        extract_content(&payload)
    }
}

fn extract_content(payload: &Value) -> Result<String, SummaryError> {
    let content = payload["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| SummaryError::InvalidResponse("missing choices[0].message.content".into()))?;
    if content.trim().is_empty() {
        return Err(SummaryError::EmptyResult);
    }
    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_content, HttpSummaryGenerator};
    use crate::config::SummaryConfig;
    use crate::summary::{SummaryError, SummaryGenerator, SummaryRequest};
    use serde_json::json;

    #[test]
    fn extracts_first_choice_content() {
        let payload = json!({ "choices": [{ "message": { "content": "Beta leads." } }] });
        assert_eq!(extract_content(&payload).unwrap(), "Beta leads.");
    }

    #[test]
    fn unexpected_shapes_are_invalid_or_empty() {
        assert!(matches!(
            extract_content(&json!({ "error": "nope" })),
            Err(SummaryError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_content(&json!({ "choices": [{ "message": { "content": " " } }] })),
            Err(SummaryError::EmptyResult)
        ));
    }

    #[test]
    fn missing_key_fails_before_any_request() {
        let generator = HttpSummaryGenerator {
            client: reqwest::blocking::Client::new(),
            endpoint: "http://127.0.0.1:9".to_string(),
            model: SummaryConfig::default().model,
            api_key: None,
        };
        let request = SummaryRequest {
            dimensions: Vec::new(),
            subjects: Vec::new(),
        };
        assert!(matches!(
            generator.generate(&request),
            Err(SummaryError::MissingCredentials)
        ));
    }
}
