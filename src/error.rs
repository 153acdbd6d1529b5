//! Error types for the sourcead-client library.
//!
//! Every error here is terminal for the **current attempt only** — the
//! [`crate::client::UploadClient`] stays usable and the caller may retry.
//! Nothing in this crate retries automatically: a submission is sent once
//! and its outcome, whatever it is, is reported through exactly one
//! [`ClientError`] variant.
//!
//! The variants mirror the distinct failure modes of the upload contract:
//! local validation (`UnsupportedFileType`, `NoFileSelected`,
//! `InterfaceNotLoaded`), transport (`Connection`), protocol
//! (`HttpStatus`), and application (`Server`).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the sourcead-client library.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Selection errors ─────────────────────────────────────────────────
    /// The file's MIME type is not on the service allow-list.
    ///
    /// A rejected selection never replaces a previously accepted one.
    #[error("Unsupported file type '{mime}'\nAccepted: PNG, JPEG, PDF, TIFF.")]
    UnsupportedFileType { mime: String },

    /// The file to select was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the selected file from disk failed.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Submission errors ────────────────────────────────────────────────
    /// `submit` was called with no stored selection and no fallback.
    #[error("No file selected.\nSelect a file before submitting.")]
    NoFileSelected,

    /// Processing options were never populated (empty data type or format).
    #[error("Processing options are not loaded.\nFetch them with load_options() or pass explicit values.")]
    InterfaceNotLoaded,

    /// The selected file exceeds the service's request size cap.
    #[error("File is too large: {size} bytes (limit {max})")]
    FileTooLarge { size: u64, max: u64 },

    /// The service answered with a non-2xx status.
    #[error("HTTP error from extraction service: status {status}")]
    HttpStatus { status: u16 },

    /// The request never produced a response (DNS, refused, reset, timeout).
    #[error("Connection error: {reason}\nCheck that the extraction service is reachable.")]
    Connection { reason: String },

    /// The service answered 2xx but reported `success: false`.
    #[error("Extraction service error: {message}")]
    Server { message: String },

    /// The 2xx response body was not the expected JSON envelope.
    #[error("Malformed response from extraction service: {detail}")]
    MalformedResponse { detail: String },

    // ── Download errors ──────────────────────────────────────────────────
    /// Download was requested but no successful submission produced a URL.
    #[error("Nothing to download.\nSubmit a document successfully first.")]
    NothingToDownload,

    /// Could not create or write the downloaded artifact.
    #[error("Failed to write artifact '{path}': {source}")]
    ArtifactWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_type_display() {
        let e = ClientError::UnsupportedFileType {
            mime: "image/gif".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("image/gif"), "got: {msg}");
        assert!(msg.contains("PNG"));
    }

    #[test]
    fn http_status_display() {
        let e = ClientError::HttpStatus { status: 502 };
        assert!(e.to_string().contains("502"));
    }

    #[test]
    fn file_too_large_display() {
        let e = ClientError::FileTooLarge {
            size: 20_000_000,
            max: 16_777_216,
        };
        let msg = e.to_string();
        assert!(msg.contains("20000000"));
        assert!(msg.contains("16777216"));
    }

    #[test]
    fn server_display_carries_message() {
        let e = ClientError::Server {
            message: "Type de fichier non autorisé".into(),
        };
        assert!(e.to_string().contains("non autorisé"));
    }

    #[test]
    fn connection_display() {
        let e = ClientError::Connection {
            reason: "connection refused".into(),
        };
        assert!(e.to_string().contains("connection refused"));
    }
}
