use crate::api::errors::APIErrors;
use crate::storage::UploadedFile;
use axum::extract::{FromRequest, Multipart, Request};
use std::collections::HashMap;
use std::str::FromStr;

/// A fully buffered multipart body: text fields plus file parts.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, APIErrors> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| APIErrors::BadRequest(format!("Invalid multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| APIErrors::BadRequest(format!("Invalid file part '{name}': {e}")))?;

                // Browsers send an empty part for an untouched file input.
                if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
                    continue;
                }

                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| APIErrors::BadRequest(format!("Invalid field '{name}': {e}")))?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Non-blank text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<&str, APIErrors> {
        self.text(name)
            .ok_or_else(|| APIErrors::Unprocessable(format!("The {} field is required.", name.replace('_', " "))))
    }

    pub fn parsed<T: FromStr>(&self, name: &str) -> Result<Option<T>, APIErrors> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|_| {
                    APIErrors::Unprocessable(format!("The {} field is invalid.", name.replace('_', " ")))
                })
            })
            .transpose()
    }

    /// HTML-form booleans: `1`, `true`, `on` and `yes` are true.
    pub fn flag(&self, name: &str) -> bool {
        self.text(name)
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes"))
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = APIErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| APIErrors::BadRequest(e.body_text()))?;

        MultipartForm::read(multipart).await
    }
}
