//! Google Gemini provider.
//!
//! Calls `generateContent` with the system prompt as `system_instruction`
//! and the user turn in `contents`. Text is read from
//! `candidates[0].content.parts[].text`.

use async_trait::async_trait;
use brandbot_core::error::ProviderError;
use brandbot_core::message::{Message, Role, split_system};
use brandbot_core::provider::*;
use serde_json::{Value, json};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            client: crate::http_client(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the JSON request body for the generateContent API.
    pub fn build_request_body(request: &ProviderRequest) -> Value {
        let (system, messages) = split_system(&request.messages);

        let mut contents: Vec<Value> = messages
            .iter()
            .map(|msg| {
                let role = if msg.role == Role::Assistant { "model" } else { "user" };
                json!({ "role": role, "parts": [{ "text": msg.content }] })
            })
            .collect();

        if contents.is_empty() {
            contents.push(json!({ "role": "user", "parts": [{ "text": "" }] }));
        }

        let mut generation_config = json!({ "temperature": request.temperature });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["max_output_tokens"] = json!(max_tokens);
        }

        let mut body = json!({
            "contents": contents,
            "generation_config": generation_config,
        });
        if let Some(system) = system {
            body["system_instruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }

    /// Concatenate the text parts of the first candidate.
    pub fn parse_response(body: &Value) -> Result<String, ProviderError> {
        let candidate = body
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| ProviderError::InvalidResponse("missing candidates in response".into()))?;

        let parts = candidate
            .pointer("/content/parts")
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                let reason = candidate
                    .get("finishReason")
                    .and_then(|f| f.as_str())
                    .unwrap_or("unknown");
                ProviderError::InvalidResponse(format!("candidate has no parts (finishReason: {reason})"))
            })?;

        Ok(parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(""))
    }

    fn parse_usage(body: &Value) -> Option<Usage> {
        let meta = body.get("usageMetadata")?;
        let prompt = meta.get("promptTokenCount")?.as_u64()? as u32;
        let completion = meta
            .get("candidatesTokenCount")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32;
        Some(Usage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let body = Self::build_request_body(&request);

        debug!(provider = "gemini", model = %model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Gemini API key".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse Gemini response: {e}")))?;

        let text = Self::parse_response(&payload)?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Self::parse_usage(&payload),
            model: payload
                .get("modelVersion")
                .and_then(|m| m.as_str())
                .unwrap_or(&model)
                .to_string(),
        })
    }
}
