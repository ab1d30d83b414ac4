//! Multipart form decoding for the item and claim forms

use std::collections::HashMap;

use axum_extra::extract::Multipart;

use crate::{
    error::{AppError, AppResult},
    services::uploads::UploadedFile,
};

/// Text fields and file parts of one submitted form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    // Browsers send an empty part when no file was picked
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A field the form must carry (it may still be blank)
    pub fn require(&self, name: &str) -> AppResult<String> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::BadRequest(format!("Missing form field: {}", name)))
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub(crate) fn with_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_and_optional() {
        let form = FormData::with_fields(&[("name", "Umbrella"), ("category", "")]);

        assert_eq!(form.require("name").unwrap(), "Umbrella");
        assert_eq!(form.optional("category").as_deref(), Some(""));
        assert!(matches!(form.require("description"), Err(AppError::BadRequest(_))));
        assert!(form.optional("image").is_none());
    }
}
