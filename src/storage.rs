//! Uploaded file persistence below the configured upload directory.

use crate::api::config::Config;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

const MIB: usize = 1024 * 1024;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "webp", "gif", "heic", "heif"];

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("The {0} must be an image (jpeg, jpg, png, webp, gif, heic, heif).")]
    UnsupportedType(&'static str),
    #[error("The {field} may not be greater than {limit_mb} MB.")]
    TooLarge { field: &'static str, limit_mb: usize },
    #[error("The {0} file is empty.")]
    Empty(&'static str),
    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// A file part pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ListingImage,
    PaymentReceipt,
    DepartmentLogo,
    GcashQr,
}

impl UploadKind {
    pub fn folder(&self) -> &'static str {
        match self {
            UploadKind::ListingImage => "listings",
            UploadKind::PaymentReceipt => "payment_receipts",
            UploadKind::DepartmentLogo => "department_logos",
            UploadKind::GcashQr => "gcash_qr_codes",
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            UploadKind::ListingImage => 5 * MIB,
            _ => 2 * MIB,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            UploadKind::ListingImage => "image",
            UploadKind::PaymentReceipt => "receipt",
            UploadKind::DepartmentLogo => "logo",
            UploadKind::GcashQr => "gcash qr image",
        }
    }
}

/// Lowercase extension to store `file` under, or an error when it is not an
/// accepted image or exceeds the size limit for `kind`.
pub fn validate_upload(file: &UploadedFile, kind: UploadKind) -> Result<String, StorageError> {
    if file.bytes.is_empty() {
        return Err(StorageError::Empty(kind.field()));
    }

    if file.bytes.len() > kind.max_bytes() {
        return Err(StorageError::TooLarge {
            field: kind.field(),
            limit_mb: kind.max_bytes() / MIB,
        });
    }

    let from_name = file
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    let from_mime = file
        .content_type
        .as_deref()
        .and_then(|mime| mime.strip_prefix("image/"))
        .map(str::to_lowercase);

    from_name
        .into_iter()
        .chain(from_mime)
        .find(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or(StorageError::UnsupportedType(kind.field()))
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new() -> Self {
        Self::with_root(Config::new().upload_dir)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FileStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the file as `<folder>/<uuid>.<ext>` and returns that relative path.
    pub async fn store(&self, file: &UploadedFile, kind: UploadKind) -> Result<String, StorageError> {
        let ext = validate_upload(file, kind)?;
        let relative = format!("{}/{}.{}", kind.folder(), Uuid::new_v4(), ext);

        let dir = self.root.join(kind.folder());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(self.root.join(&relative), &file.bytes).await?;

        tracing::info!(path = %relative, bytes = file.bytes.len(), "stored upload");

        Ok(relative)
    }

    /// Deletes a previously stored file. Missing files and paths escaping the
    /// upload directory are ignored.
    pub async fn remove(&self, relative: &str) {
        let path = Path::new(relative);
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            tracing::warn!(path = relative, "refusing to remove path outside upload dir");
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.root.join(path)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::error!(path = relative, error = %e, "failed to remove upload");
            }
        }
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}
