//! OpenAI Responses API adapter for the text-generation port.

use crate::config::app_config::GenerationConfig;
use crate::domain::model::Directive;
use crate::domain::ports::TextGenerator;
use crate::utils::error::GenerationError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_output_tokens: u32,
}

impl OpenAiGenerator {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.endpoint)
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ResponsesResponse {
    /// All `output_text` parts joined in order; empty if there are none.
    fn output_text(self) -> String {
        self.output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text)
            .collect()
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, directive: &Directive) -> Result<String, GenerationError> {
        let request = ResponsesRequest {
            model: &self.model,
            input: &directive.text,
            max_output_tokens: self.max_output_tokens,
        };

        tracing::debug!("Sending directive to {}", self.responses_url());
        let response = self
            .client
            .post(self.responses_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Generation API response status: {}", status);

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ResponsesResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::Parse(e.to_string()))?;
        Ok(parsed.output_text())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
