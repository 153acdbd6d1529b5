//! File selection: validate and hold the document to be submitted.
//!
//! The service only processes raster images and PDFs, so selection is
//! pre-validated client-side against a fixed MIME allow-list. Rejection is
//! deliberately non-destructive: [`crate::client::UploadClient`] keeps any
//! previously accepted selection when a new candidate is refused, so a
//! mis-drop never loses the user's earlier pick.

use crate::error::ClientError;
use std::path::Path;
use tracing::debug;

/// MIME types accepted for submission.
///
/// `image/jpg` is not a registered type, but browsers and the service both
/// emit it, so it stays on the list.
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "application/pdf",
    "image/tiff",
];

/// Is this MIME type on the service allow-list?
pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(mime.trim()))
}

/// MIME type inferred from a file extension, for the extensions the
/// service accepts. `None` for everything else.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pdf" => Some("application/pdf"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}

/// The currently selected document: name, MIME type, and raw bytes.
///
/// Constructing a `SelectedFile` is what validates the MIME type — a value
/// of this type is always submittable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    /// Accept an in-memory document, validating its MIME type.
    pub fn from_bytes(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ClientError> {
        let mime = mime.into();
        if !is_allowed_mime(&mime) {
            return Err(ClientError::UnsupportedFileType { mime });
        }
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
        })
    }

    /// Read a document from disk, inferring its MIME type from the
    /// extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let mime = mime_for_extension(ext).ok_or_else(|| ClientError::UnsupportedFileType {
            mime: if ext.is_empty() {
                "unknown".to_string()
            } else {
                format!(".{ext}")
            },
        })?;

        let bytes = read_validated(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        debug!("Selected {} ({}, {} bytes)", name, mime, bytes.len());
        Ok(Self {
            name,
            mime: mime.to_string(),
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Byte size of the document.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Read the file, mapping the io error kinds the user can act on.
fn read_validated(path: &Path) -> Result<Vec<u8>, ClientError> {
    if !path.exists() {
        return Err(ClientError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => ClientError::PermissionDenied {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::NotFound => ClientError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ClientError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
