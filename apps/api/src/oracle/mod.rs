/// Oracle — the single point of entry for all generative-AI calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Handlers and analysis code talk to `dyn Oracle`; the HTTP implementation
/// lives in `gemini`, and tests substitute `stub::StubOracle`.
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod gemini;
pub mod prompts;
pub mod request;
#[cfg(test)]
pub mod stub;

pub use gemini::GeminiClient;
pub use request::{create_structured_client, ClientHandle, Prompt};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Failures talking to the oracle. Every variant is recoverable per request.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Prompt was blocked by the oracle: {0}")]
    Blocked(String),

    #[error("Oracle returned empty content")]
    EmptyContent,
}

/// A model advertised by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

/// The oracle seam. Implement this to swap the transport without touching
/// the analysis or handler code.
///
/// Carried in `AppState` as `Arc<dyn Oracle>`.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Sends one prompt under the handle's output contract and returns the raw
    /// response text. The text is untrusted until validated.
    async fn generate(&self, handle: &ClientHandle, prompt: &Prompt)
        -> Result<String, OracleError>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>, OracleError>;
}
