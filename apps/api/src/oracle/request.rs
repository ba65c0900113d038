//! Request-side contracts: the structured-client handle and the prompt bundle.

use bytes::Bytes;
use serde_json::Value;

use crate::models::schema::OutputSchema;

/// Output MIME type requested from the oracle for every structured call.
pub const JSON_MIME: &str = "application/json";

/// A model configured to answer in JSON conforming to one output schema.
/// Pure configuration: building a handle performs no I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientHandle {
    pub model: String,
    pub schema_name: &'static str,
    pub response_mime_type: &'static str,
    pub response_schema: Value,
}

/// Builds a handle that constrains the oracle's output to `T`'s schema.
/// Bare model ids are normalised to the `models/` resource form.
pub fn create_structured_client<T: OutputSchema>(model: &str) -> ClientHandle {
    let model = model.trim();
    let model = if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    };
    ClientHandle {
        model,
        schema_name: T::NAME,
        response_mime_type: JSON_MIME,
        response_schema: T::response_schema(),
    }
}

/// A labelled block of data embedded in the prompt text.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSection {
    pub heading: String,
    pub body: String,
}

/// Raw document bytes forwarded to the oracle alongside the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: Bytes,
}

/// A prompt bundle: instructions, serialized inputs, and an optional document.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub instructions: String,
    pub sections: Vec<PromptSection>,
    pub closing: Option<String>,
    pub attachment: Option<Attachment>,
}

impl Prompt {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            sections: Vec::new(),
            closing: None,
            attachment: None,
        }
    }

    pub fn section(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(PromptSection {
            heading: heading.into(),
            body: body.into(),
        });
        self
    }

    pub fn closing(mut self, closing: impl Into<String>) -> Self {
        self.closing = Some(closing.into());
        self
    }

    pub fn attach(mut self, mime_type: impl Into<String>, data: Bytes) -> Self {
        self.attachment = Some(Attachment {
            mime_type: mime_type.into(),
            data,
        });
        self
    }

    /// Renders the text portion. Each section is fenced with `---` lines.
    pub fn render_text(&self) -> String {
        let mut text = self.instructions.trim().to_string();
        for section in &self.sections {
            text.push_str("\n\n");
            text.push_str(&section.heading);
            text.push_str(":\n---\n");
            text.push_str(section.body.trim_end());
            text.push_str("\n---");
        }
        if let Some(closing) = &self.closing {
            text.push_str("\n\n");
            text.push_str(closing.trim());
        }
        text
    }

    /// Body of the first section with the given heading.
    pub fn section_body(&self, heading: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| s.body.as_str())
    }
}
