use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::config::AnalysisConfig;
use crate::prompt::AnalysisRequest;

/// Opaque text-completion service. Implementations make exactly one attempt per call.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, api_key: &str, request: &AnalysisRequest) -> anyhow::Result<String>;
}

/// OpenRouter chat completions with the PDF attached inline as a file part
#[derive(Debug, Clone)]
pub struct OpenRouterBackend {
    http: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenRouterBackend {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    fn payload(&self, request: &AnalysisRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": request.instructions()
                        },
                        {
                            "type": "file",
                            "file": {
                                "filename": request.document.name,
                                "file_data": request.document.data_url()
                            }
                        }
                    ]
                }
            ],
            "max_tokens": self.max_tokens
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    async fn complete(&self, api_key: &str, request: &AnalysisRequest) -> anyhow::Result<String> {
        info!(
            model = %self.model,
            document = %request.document.name,
            encoded_bytes = request.document.data.len(),
            "Submitting evidence for analysis"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.payload(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            return Err(match body["error"]["message"].as_str() {
                Some(message) => anyhow!("LLM API request failed: {} ({})", status, message),
                None => anyhow!("LLM API request failed: {}", status),
            });
        }

        let response_json: Value = response.json().await?;
        completion_text(&response_json)
    }
}

fn completion_text(response_json: &Value) -> anyhow::Result<String> {
    let content = response_json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow!("LLM response did not contain any completion text"))?;

    Ok(content.to_string())
}
