use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use std::path::Path;

use crate::error::VaultError;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

const NOT_MULTIPART: &str = "Expected a multipart form submission.";
const MALFORMED: &str = "Malformed multipart form submission.";
const BAD_FILE_TYPE: &str = "Only images (jpeg, jpg, png, gif) are allowed!";
const FILE_TOO_LARGE: &str = "Images must be 5 MB or smaller.";
const MISSING_FIELDS: &str = "Site, username, and password are required.";

/// One uploaded image, buffered before the handler runs.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Parsed multipart submission for the account create and update routes.
/// Text fields stay optional here; the handler decides which are required.
/// File type and size preconditions are enforced during extraction, before
/// any handler logic runs.
#[derive(Debug, Default)]
pub struct AccountForm {
    pub site: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub current_image: Option<String>,
    pub image: Option<UploadPart>,
}

impl AccountForm {
    /// Validate the required text fields shared by create and update.
    pub fn required_fields(&self) -> Result<(&str, &str, &str), VaultError> {
        match (
            non_empty(self.site.as_deref()),
            non_empty(self.username.as_deref()),
            non_empty(self.password.as_deref()),
        ) {
            (Some(site), Some(username), Some(password)) => Ok((site, username, password)),
            _ => Err(VaultError::Validation(MISSING_FIELDS)),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn allowed_image(file_name: &str, content_type: Option<&str>) -> bool {
    let ext_ok = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        });
    // Browsers always send a content type for file parts; when present it
    // must agree with the extension check.
    let mime_ok = content_type.is_none_or(|ct| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| ct.eq_ignore_ascii_case(&format!("image/{allowed}")))
    });
    ext_ok && mime_ok
}

impl<S> FromRequest<S> for AccountForm
where
    S: Send + Sync,
{
    type Rejection = VaultError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|_| VaultError::Validation(NOT_MULTIPART))?;

        let mut form = AccountForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| VaultError::Validation(MALFORMED))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    // An empty file part is how browsers submit "no file selected".
                    if file_name.is_empty() {
                        continue;
                    }
                    let content_type = field.content_type().map(str::to_string);
                    if !allowed_image(&file_name, content_type.as_deref()) {
                        return Err(VaultError::Validation(BAD_FILE_TYPE));
                    }
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| VaultError::Validation(MALFORMED))?;
                    if bytes.len() > MAX_IMAGE_BYTES {
                        return Err(VaultError::Validation(FILE_TOO_LARGE));
                    }
                    form.image = Some(UploadPart { file_name, bytes });
                }
                "site" => form.site = field.text().await.ok(),
                "username" => form.username = field.text().await.ok(),
                "password" => form.password = field.text().await.ok(),
                "currentImage" => form.current_image = field.text().await.ok(),
                _ => {
                    // Drain and ignore unknown parts.
                    let _ = field.bytes().await;
                }
            }
        }
        Ok(form)
    }
}
