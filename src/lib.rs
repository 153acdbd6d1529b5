//! # sourcead-client
//!
//! Client for the SourceAd document-extraction service: upload a scanned
//! document (PNG, JPEG, PDF, or TIFF), have the service extract structured
//! data from it, render the result as text, and download the converted
//! artifact.
//!
//! ## Contract Overview
//!
//! ```text
//! UploadClient                         Extraction Service
//!  │
//!  ├─ load_options ── GET /api/data_types ──▶ { data_types: [{id, name}] }
//!  │               ── GET /api/formats ─────▶ { formats:    [{id, name}] }
//!  ├─ select_file    (local MIME validation, no network)
//!  ├─ submit ─────── POST /upload (multipart) ─▶ { success, data, download_url }
//!  └─ download_to ── GET <download_url> ──────▶ converted artifact bytes
//! ```
//!
//! The extraction payload is a union tagged by a `"type"` field
//! (`universal`, `budget`, or anything else — rendered as a raw dump), see
//! [`ExtractionResult`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sourcead_client::{ClientConfig, ProcessingOptions, UploadClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://127.0.0.1:5000")
//!         .build()?;
//!     let mut client = UploadClient::new(config)?;
//!
//!     client.select_file("invoice.pdf")?;
//!     let extraction = client.submit(&ProcessingOptions::new("auto", "csv")).await?;
//!     println!("{}", extraction.render());
//!
//!     client.download_to("invoice.csv").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Model
//!
//! Every failure is one [`ClientError`] variant and is terminal for the
//! current attempt only — the client stays usable and the caller may
//! retry. The library never retries on its own and never times out an
//! in-flight submission.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sourcead` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! sourcead-client = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod observer;
pub mod render;
pub mod select;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::UploadClient;
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::ClientError;
pub use model::{
    BudgetLine, BudgetResult, Extraction, ExtractionResult, HealthResponse, OptionEntry,
    OptionLists, ProcessingOptions, Section, UniversalResult,
};
pub use observer::{NoopObserver, Observer, UploadObserver};
pub use render::{render_result, PREVIEW_CHAR_LIMIT};
pub use select::{SelectedFile, ALLOWED_MIME_TYPES};
