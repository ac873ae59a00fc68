//! OpenAI chat-completions client with image input.
//!
//! One POST per cycle. The HTTP client carries the request timeout; nothing
//! here retries.

use super::prompts;
use super::{AnalysisError, Analyzer};
use crate::capture;
use crate::config::{ApiConfig, IMAGE_MAX_DIMENSION, JPEG_QUALITY};
use crate::session::AnalysisMode;
use image::DynamicImage;
use std::time::Duration;

pub struct OpenAiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl OpenAiClient {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn map_transport_error(&self, e: reqwest::Error) -> AnalysisError {
        transport_error(e.is_timeout(), e, self.config.timeout)
    }
}

impl Analyzer for OpenAiClient {
    async fn analyze(
        &self,
        image: &DynamicImage,
        mode: &AnalysisMode,
    ) -> Result<String, AnalysisError> {
        let encode_start = std::time::Instant::now();
        let image_b64 = capture::encode_jpeg_base64(image, IMAGE_MAX_DIMENSION, JPEG_QUALITY)?;
        log::info!(
            "[LLM] Image encoded in {}ms ({} base64 chars)",
            encode_start.elapsed().as_millis(),
            image_b64.len()
        );

        let body = build_request_body(&self.config, &image_b64, mode);

        log::info!("[LLM] Model: {} mode: {}", self.config.model, mode);
        let start = std::time::Instant::now();

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);

        log::info!("[LLM] API latency: {}ms", start.elapsed().as_millis());

        if !status.is_success() {
            let err = classify_api_error(status.as_u16(), &json, &raw);
            log::error!("[LLM] API returned {}: {}", status, err);
            return Err(err);
        }

        if let Some(usage) = json.get("usage") {
            log::info!(
                "[LLM] Tokens: {} prompt, {} completion",
                usage["prompt_tokens"].as_u64().unwrap_or(0),
                usage["completion_tokens"].as_u64().unwrap_or(0)
            );
        }

        extract_content(&json)
    }

    async fn check_access(&self) -> Result<String, AnalysisError> {
        let response = self
            .http
            .get(format!("{}/models", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            return Err(classify_api_error(status.as_u16(), &json, &raw));
        }

        let listed = json["data"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .any(|m| m["id"].as_str() == Some(self.config.model.as_str()))
            })
            .unwrap_or(false);
        if !listed {
            log::warn!(
                "[LLM] Model {} not in the account's model list",
                self.config.model
            );
        }

        Ok(self.config.model.replace("-preview", ""))
    }
}

/// Chat-completions payload: the mode's instruction followed by the image.
pub fn build_request_body(
    config: &ApiConfig,
    image_b64: &str,
    mode: &AnalysisMode,
) -> serde_json::Value {
    serde_json::json!({
        "model": config.model,
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "text",
                    "text": prompts::instruction_for(mode)
                },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:image/jpeg;base64,{image_b64}"),
                        "detail": config.detail
                    }
                }
            ]
        }]
    })
}

/// Map a failure below HTTP (connect, TLS, deadline) to the error the user sees.
pub fn transport_error(timed_out: bool, detail: impl std::fmt::Display, timeout: Duration) -> AnalysisError {
    if timed_out {
        AnalysisError::Timeout(timeout.as_secs())
    } else {
        AnalysisError::Network(detail.to_string())
    }
}

/// Map a non-2xx response to the error the user sees.
pub fn classify_api_error(status: u16, body: &serde_json::Value, raw: &str) -> AnalysisError {
    let error = &body["error"];
    let message = error["message"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                "unknown error".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    let quota = error["code"].as_str() == Some("insufficient_quota")
        || error["type"].as_str() == Some("insufficient_quota");

    match status {
        401 | 403 => AnalysisError::Auth(message),
        429 if quota => AnalysisError::Quota,
        429 => AnalysisError::RateLimited(message),
        _ => AnalysisError::Api { status, message },
    }
}

/// Pull `choices[0].message.content` out of a completion.
pub fn extract_content(body: &serde_json::Value) -> Result<String, AnalysisError> {
    body["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .and_then(|choice| choice["message"]["content"].as_str())
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(AnalysisError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use serde_json::json;

    fn api_config() -> ApiConfig {
        AppConfig::from_lookup(|key| (key == "OPENAI_API_KEY").then(|| "sk-test".to_string()))
            .unwrap()
            .api
    }

    #[test]
    fn body_carries_mode_template_and_settings() {
        let config = api_config();
        let body = build_request_body(&config, "AAAA", &AnalysisMode::Text);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 500);
        let content = &body["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], prompts::TEXT_PROMPT);
        assert_eq!(content[1]["image_url"]["url"], "data:image/jpeg;base64,AAAA");
        assert_eq!(content[1]["image_url"]["detail"], "auto");
    }

    #[test]
    fn template_independent_of_image() {
        let config = api_config();
        let a = build_request_body(&config, "AAAA", &AnalysisMode::Summary);
        let b = build_request_body(&config, "/9j/BBBB", &AnalysisMode::Summary);
        assert_eq!(
            a["messages"][0]["content"][0]["text"],
            b["messages"][0]["content"][0]["text"]
        );
    }

    #[test]
    fn custom_prompt_sent_verbatim() {
        let config = api_config();
        let mode = AnalysisMode::Custom("Which tab is active?".into());
        let body = build_request_body(&config, "AAAA", &mode);
        assert_eq!(body["messages"][0]["content"][0]["text"], "Which tab is active?");
    }

    #[test]
    fn unauthorized_is_auth_error() {
        let body = json!({"error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}});
        let err = classify_api_error(401, &body, "");
        assert!(matches!(err, AnalysisError::Auth(ref m) if m == "Incorrect API key provided"));
    }

    #[test]
    fn insufficient_quota_is_distinct() {
        let body = json!({"error": {"message": "You exceeded your current quota", "type": "insufficient_quota", "code": "insufficient_quota"}});
        assert!(matches!(classify_api_error(429, &body, ""), AnalysisError::Quota));

        let body = json!({"error": {"message": "Rate limit reached", "type": "requests"}});
        assert!(matches!(
            classify_api_error(429, &body, ""),
            AnalysisError::RateLimited(_)
        ));
    }

    #[test]
    fn non_json_error_uses_raw_text() {
        let err = classify_api_error(502, &serde_json::Value::Null, "Bad Gateway\n");
        match err {
            AnalysisError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extracts_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "This is a login screen"}}]});
        assert_eq!(extract_content(&body).unwrap(), "This is a login screen");
    }

    #[test]
    fn content_returned_verbatim() {
        let reply = "    fn main() {}\n    // indented\n";
        let body = json!({"choices": [{"message": {"content": reply}}]});
        assert_eq!(extract_content(&body).unwrap(), reply);
    }

    #[test]
    fn deadline_maps_to_timeout_with_configured_seconds() {
        let err = transport_error(true, "operation timed out", Duration::from_secs(30));
        assert!(matches!(err, AnalysisError::Timeout(30)));
        assert_eq!(err.to_string(), "No response from OpenAI within 30s");
    }

    #[test]
    fn other_transport_failures_are_network_errors() {
        let err = transport_error(false, "dns error: no such host", Duration::from_secs(30));
        assert!(matches!(err, AnalysisError::Network(ref m) if m == "dns error: no such host"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let mut config = api_config();
        config.base_url = "http://127.0.0.1:9".to_string();
        config.timeout = Duration::from_secs(5);
        let client = OpenAiClient::new(config).unwrap();

        let err = client.check_access().await.unwrap_err();
        assert!(matches!(err, AnalysisError::Network(_)), "got {err:?}");
    }

    #[test]
    fn missing_or_blank_content_is_empty_response() {
        assert!(matches!(
            extract_content(&json!({"choices": []})),
            Err(AnalysisError::EmptyResponse)
        ));
        assert!(matches!(
            extract_content(&json!({"choices": [{"message": {"content": "   "}}]})),
            Err(AnalysisError::EmptyResponse)
        ));
    }
}
