//! Deterministic in-process oracle for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClientHandle, ModelInfo, Oracle, OracleError, Prompt};

type Responder = dyn Fn(&ClientHandle, &Prompt) -> Result<String, OracleError> + Send + Sync;

/// Answers every call through a closure and records what it was asked.
pub struct StubOracle {
    responder: Box<Responder>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, Prompt)>>,
}

impl StubOracle {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ClientHandle, &Prompt) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn fixed(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_, _| Ok(text.clone()))
    }

    /// Always fails with an API error.
    pub fn failing() -> Self {
        Self::new(|_, _| {
            Err(OracleError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls made for one schema.
    pub fn calls_for(&self, schema_name: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == schema_name)
            .count()
    }

    pub fn prompts(&self) -> Vec<(String, Prompt)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Oracle for StubOracle {
    async fn generate(
        &self,
        handle: &ClientHandle,
        prompt: &Prompt,
    ) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((handle.schema_name.to_string(), prompt.clone()));
        (self.responder)(handle, prompt)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, OracleError> {
        Ok(vec![
            ModelInfo {
                name: "models/gemini-2.5-flash".to_string(),
                display_name: Some("Gemini 2.5 Flash".to_string()),
                supported_generation_methods: vec!["generateContent".to_string()],
            },
            ModelInfo {
                name: "models/text-embedding-004".to_string(),
                display_name: None,
                supported_generation_methods: vec!["embedContent".to_string()],
            },
        ])
    }
}
