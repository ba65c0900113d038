use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Document formats accepted for upload. The bytes are never decoded locally;
/// the kind only decides which MIME type is declared to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }

    /// Resolves the kind from the declared content type, falling back to the
    /// file extension when the client sent nothing useful.
    pub fn detect(file_name: &str, declared_mime: Option<&str>) -> Option<Self> {
        let declared = declared_mime
            .map(|m| m.split(';').next().unwrap_or(m).trim().to_ascii_lowercase());
        match declared.as_deref() {
            Some(PDF_MIME) => return Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => return Some(DocumentKind::Docx),
            _ => {}
        }

        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("'{file_name}' is not a PDF or DOCX document")]
    UnsupportedType { file_name: String },

    #[error("'{0}' is empty")]
    Empty(String),
}

/// An uploaded resume document, held verbatim.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub kind: DocumentKind,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        declared_mime: Option<&str>,
        data: Bytes,
    ) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let kind = DocumentKind::detect(&file_name, declared_mime).ok_or_else(|| {
            UploadError::UnsupportedType {
                file_name: file_name.clone(),
            }
        })?;
        if data.is_empty() {
            return Err(UploadError::Empty(file_name));
        }
        Ok(Self {
            file_name,
            kind,
            data,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}
