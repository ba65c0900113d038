//! Gemini `generateContent` transport.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ClientHandle, ModelInfo, Oracle, OracleError, Prompt};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(Blob),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<RemoteModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn build_request<'a>(handle: &'a ClientHandle, prompt: &Prompt) -> GenerateContentRequest<'a> {
    let mut parts = vec![Part::Text(prompt.render_text())];
    if let Some(attachment) = &prompt.attachment {
        parts.push(Part::InlineData(Blob {
            mime_type: attachment.mime_type.clone(),
            data: STANDARD.encode(&attachment.data),
        }));
    }
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: handle.response_mime_type,
            response_schema: &handle.response_schema,
        },
    }
}

/// Gemini REST client. Calls fail fast: there is no retry loop, so a failed
/// call surfaces immediately to the caller.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: String, api_base: String, timeout: Duration) -> Result<Self, OracleError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_base,
        })
    }

    async fn error_from(response: reqwest::Response) -> OracleError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        OracleError::Api { status, message }
    }
}

#[async_trait]
impl Oracle for GeminiClient {
    async fn generate(
        &self,
        handle: &ClientHandle,
        prompt: &Prompt,
    ) -> Result<String, OracleError> {
        let url = format!("{}/{}:generateContent", self.api_base, handle.model);
        let body = build_request(handle, prompt);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from(response).await;
            warn!("Oracle call for {} failed: {err}", handle.schema_name);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Oracle call succeeded: schema={}, prompt_tokens={:?}, output_tokens={:?}",
                handle.schema_name, usage.prompt_token_count, usage.candidates_token_count
            );
        }

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(OracleError::Blocked(reason));
        }

        match parsed.text() {
            Some(text) => Ok(text),
            None => {
                if let Some(reason) = parsed.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
                    debug!("Empty oracle content, finish_reason={reason}");
                }
                Err(OracleError::EmptyContent)
            }
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, OracleError> {
        let url = format!("{}/models", self.api_base);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(Self::error_from(response).await);
            }

            let page: ListModelsResponse = response.json().await?;
            models.extend(page.models.into_iter().map(|m| ModelInfo {
                name: m.name,
                display_name: m.display_name,
                supported_generation_methods: m.supported_generation_methods,
            }));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }
}
