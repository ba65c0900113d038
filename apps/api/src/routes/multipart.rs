//! Collects a multipart upload into named files and text fields.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::models::upload::UploadedFile;

#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<(String, UploadedFile)>,
    texts: HashMap<String, String>,
}

impl UploadForm {
    /// Reads every field. Fields carrying a file name are treated as
    /// documents and type-checked; everything else is text.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    let file = UploadedFile::new(file_name, content_type.as_deref(), data)?;
                    form.files.push((field_name, file));
                }
                None => {
                    let text = field.text().await?;
                    form.texts.insert(field_name, text);
                }
            }
        }

        Ok(form)
    }

    /// The single file uploaded under `field`.
    pub fn file(&mut self, field: &str) -> Result<UploadedFile, AppError> {
        let index = self
            .files
            .iter()
            .position(|(name, _)| name == field)
            .ok_or_else(|| AppError::Validation(format!("Missing file field '{field}'")))?;
        Ok(self.files.remove(index).1)
    }

    /// All files uploaded under `field`, in upload order.
    pub fn files(&mut self, field: &str) -> Vec<UploadedFile> {
        let (wanted, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.files).into_iter().partition(|(name, _)| name == field);
        self.files = rest;
        wanted.into_iter().map(|(_, file)| file).collect()
    }

    /// A required, non-blank text field.
    pub fn text(&self, field: &str) -> Result<String, AppError> {
        self.texts
            .get(field)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("{field} cannot be empty")))
    }
}
