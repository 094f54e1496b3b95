use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};

use super::{resolve_content_type, ResumeFile};

/// Multipart part carrying the resume binary.
pub const RESUME_FIELD: &str = "resume";

/// A drained multipart form: at most one resume plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<ResumeFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == RESUME_FIELD {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let declared = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if bytes.is_empty() {
                    continue;
                }
                form.resume = Some(ResumeFile {
                    content_type: resolve_content_type(declared.as_deref(), &file_name, &bytes),
                    file_name,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Text field value, or `""` when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}
