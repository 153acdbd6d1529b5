//! The upload client: selection state, submission, and artifact download.
//!
//! [`UploadClient`] is the one stateful object in this crate. It owns the
//! current selection and the download reference from the last successful
//! submission, and exposes the named operations the presentation layer
//! invokes: [`select_file`](UploadClient::select_file),
//! [`load_options`](UploadClient::load_options),
//! [`submit`](UploadClient::submit),
//! [`download_to`](UploadClient::download_to).
//!
//! ## Submission lifecycle
//!
//! ```text
//! Idle ──▶ Validating ──▶ Submitting ──▶ {Succeeded, Failed} ──▶ Idle
//! ```
//!
//! Local validation (file present, options loaded, size cap) happens
//! before the busy state is entered; once entered, the busy state is left
//! on every exit path — the observer sees exactly one
//! `on_submission_start` / `on_submission_finished` pair per attempt.
//!
//! Mutual exclusion of submissions is not a runtime flag here:
//! [`submit`](UploadClient::submit) takes `&mut self`, so a second
//! submission while one is in flight is rejected by the borrow checker,
//! not by a disabled button.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{
    DataTypesResponse, Extraction, FormatsResponse, HealthResponse, OptionLists,
    ProcessingOptions, UploadResponse,
};
use crate::observer::{NoopObserver, UploadObserver};
use crate::select::SelectedFile;
use std::path::Path;
use tracing::{debug, info, warn};

static NOOP_OBSERVER: NoopObserver = NoopObserver;

/// Client for one extraction-service session.
///
/// # Example
/// ```rust,no_run
/// use sourcead_client::{ClientConfig, ProcessingOptions, UploadClient};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = UploadClient::new(ClientConfig::default())?;
/// client.select_file("facture.pdf")?;
/// let extraction = client.submit(&ProcessingOptions::new("budget", "csv")).await?;
/// println!("{}", extraction.render());
/// client.download_to("facture.csv").await?;
/// # Ok(())
/// # }
/// ```
pub struct UploadClient {
    http: reqwest::Client,
    config: ClientConfig,
    /// Current selection. Overwritten by any accepted selection, never
    /// cleared.
    selected: Option<SelectedFile>,
    /// Artifact URL from the last successful submission. Overwritten by
    /// the next success only.
    download_url: Option<String>,
}

impl UploadClient {
    /// Create a client for the service named in `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("sourcead-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            selected: None,
            download_url: None,
        })
    }

    fn observer(&self) -> &dyn UploadObserver {
        match self.config.observer {
            Some(ref obs) => obs.as_ref(),
            None => &NOOP_OBSERVER,
        }
    }

    /// Route every returned error through the single visible error region.
    fn fail(&self, err: ClientError) -> ClientError {
        self.observer().on_error(&err.to_string());
        err
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Select a document from disk, inferring its MIME type from the
    /// extension.
    ///
    /// On rejection the previous selection (if any) stays in place.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<&SelectedFile, ClientError> {
        match SelectedFile::from_path(path) {
            Ok(file) => Ok(self.accept(file)),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Select an in-memory document with an explicit MIME type.
    pub fn select_bytes(
        &mut self,
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<&SelectedFile, ClientError> {
        match SelectedFile::from_bytes(name, mime, bytes) {
            Ok(file) => Ok(self.accept(file)),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn accept(&mut self, file: SelectedFile) -> &SelectedFile {
        info!("File selected: {} ({})", file.name(), file.mime());
        self.observer().on_file_selected(file.name());
        self.selected.insert(file)
    }

    /// The currently stored selection, if any.
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    // ── Option loading ───────────────────────────────────────────────────

    /// Fetch the data-type and output-format lists.
    ///
    /// The two requests are independent and unordered. A failure on either
    /// side is logged and leaves that list empty — never an `Err`; the
    /// rest of the session is unaffected.
    pub async fn load_options(&self) -> OptionLists {
        let (data_types, formats) = tokio::join!(self.fetch_data_types(), self.fetch_formats());

        OptionLists {
            data_types: data_types.unwrap_or_else(|e| {
                warn!("Failed to load data types: {e}");
                Vec::new()
            }),
            formats: formats.unwrap_or_else(|e| {
                warn!("Failed to load formats: {e}");
                Vec::new()
            }),
        }
    }

    async fn fetch_data_types(&self) -> Result<Vec<crate::model::OptionEntry>, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/data_types"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response)?;
        let body: DataTypesResponse = response.json().await.map_err(malformed)?;
        debug!("Loaded {} data types", body.data_types.len());
        Ok(body.data_types)
    }

    async fn fetch_formats(&self) -> Result<Vec<crate::model::OptionEntry>, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/api/formats"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response)?;
        let body: FormatsResponse = response.json().await.map_err(malformed)?;
        debug!("Loaded {} formats", body.formats.len());
        Ok(body.formats)
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Submit the stored selection with the given options.
    ///
    /// # Errors
    /// * [`ClientError::NoFileSelected`] — nothing was ever selected;
    ///   no request is issued.
    /// * [`ClientError::InterfaceNotLoaded`] — `options` has an empty
    ///   data type or format; no request is issued.
    /// * [`ClientError::FileTooLarge`] — selection exceeds
    ///   `max_upload_bytes`; no request is issued.
    /// * [`ClientError::Connection`] / [`ClientError::HttpStatus`] /
    ///   [`ClientError::Server`] — the request was sent and failed.
    pub async fn submit(
        &mut self,
        options: &ProcessingOptions,
    ) -> Result<Extraction, ClientError> {
        self.submit_with_fallback(None, options).await
    }

    /// Submit, preferring the stored selection but falling back to
    /// `fallback` when nothing is stored — the equivalent of reading the
    /// file picker directly when the remembered file is gone.
    pub async fn submit_with_fallback(
        &mut self,
        fallback: Option<SelectedFile>,
        options: &ProcessingOptions,
    ) -> Result<Extraction, ClientError> {
        // ── Validating (before the busy state) ───────────────────────────
        let file = match self.selected.clone().or(fallback) {
            Some(f) => f,
            None => return Err(self.fail(ClientError::NoFileSelected)),
        };

        if !options.is_loaded() {
            return Err(self.fail(ClientError::InterfaceNotLoaded));
        }

        if file.size() > self.config.max_upload_bytes {
            return Err(self.fail(ClientError::FileTooLarge {
                size: file.size(),
                max: self.config.max_upload_bytes,
            }));
        }

        // ── Submitting ───────────────────────────────────────────────────
        info!(
            "Submitting {} ({} bytes) as data_type={} format={}",
            file.name(),
            file.size(),
            options.data_type,
            options.output_format
        );
        self.observer().on_submission_start();
        let result = self.perform_upload(file, options).await;
        // Unconditional: the busy state ends however the attempt ended.
        self.observer().on_submission_finished();

        match result {
            Ok(extraction) => {
                // The reference is only replaced by a new success, and an
                // empty URL is never retained (it must not be dereferenced).
                if let Some(url) = extraction
                    .download_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                {
                    debug!("Download reference: {url}");
                    self.download_url = Some(url.to_string());
                }
                info!("Submission succeeded");
                Ok(extraction)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn perform_upload(
        &self,
        file: SelectedFile,
        options: &ProcessingOptions,
    ) -> Result<Extraction, ClientError> {
        let name = file.name().to_string();
        let mime = file.mime().to_string();
        let part = reqwest::multipart::Part::bytes(file.into_bytes())
            .file_name(name)
            .mime_str(&mime)
            .map_err(|e| ClientError::Internal(format!("multipart: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("data_type", options.data_type.clone())
            .text("format", options.output_format.clone());

        let response = self
            .http
            .post(self.endpoint("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response)?;
        let body: UploadResponse = response.json().await.map_err(malformed)?;

        if !body.success {
            return Err(ClientError::Server {
                message: body
                    .error
                    .unwrap_or_else(|| "unspecified server error".to_string()),
            });
        }

        let result = body.data.ok_or_else(|| ClientError::MalformedResponse {
            detail: "success response without a data payload".to_string(),
        })?;

        Ok(Extraction {
            result,
            download_url: body.download_url,
            detected_type: body.detected_type,
        })
    }

    // ── Download ─────────────────────────────────────────────────────────

    /// The artifact URL from the last successful submission, resolved
    /// against the service base URL.
    ///
    /// # Errors
    /// [`ClientError::NothingToDownload`] when no submission has succeeded
    /// yet in this session.
    pub fn download_reference(&self) -> Result<reqwest::Url, ClientError> {
        let raw = match self.download_url.as_deref() {
            Some(url) => url,
            None => return Err(self.fail(ClientError::NothingToDownload)),
        };
        resolve_reference(&self.config.base_url, raw)
    }

    /// Fetch the converted artifact and write it to `dest`.
    ///
    /// Idempotent: calling again re-fetches the same reference. The write
    /// is atomic (temp file + rename) so a failed download never leaves a
    /// partial artifact behind.
    pub async fn download_to(&self, dest: impl AsRef<Path>) -> Result<u64, ClientError> {
        let url = self.download_reference()?;
        let dest = dest.as_ref();
        info!("Downloading artifact from {url}");

        let bytes = async {
            let response = self.http.get(url).send().await.map_err(transport_error)?;
            let response = check_status(response)?;
            response.bytes().await.map_err(transport_error)
        }
        .await
        .map_err(|e| self.fail(e))?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.fail(artifact_write_failed(dest, e)))?;
        }

        let tmp_path = dest.with_extension("part");
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| self.fail(artifact_write_failed(dest, e)))?;
        tokio::fs::rename(&tmp_path, dest)
            .await
            .map_err(|e| self.fail(artifact_write_failed(dest, e)))?;

        info!("Artifact written: {} ({} bytes)", dest.display(), bytes.len());
        Ok(bytes.len() as u64)
    }

    // ── Health ───────────────────────────────────────────────────────────

    /// Ask the service for its health status.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/health"))
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response)?;
        response.json().await.map_err(malformed)
    }
}

// ── Shared response handling ─────────────────────────────────────────────

/// Map a request that produced no usable response to a connection error.
fn transport_error(e: reqwest::Error) -> ClientError {
    ClientError::Connection {
        reason: e.to_string(),
    }
}

/// Non-2xx status → [`ClientError::HttpStatus`] carrying the code.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::HttpStatus {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

fn malformed(e: reqwest::Error) -> ClientError {
    ClientError::MalformedResponse {
        detail: e.to_string(),
    }
}

fn artifact_write_failed(dest: &Path, source: std::io::Error) -> ClientError {
    ClientError::ArtifactWriteFailed {
        path: dest.to_path_buf(),
        source,
    }
}

/// Resolve a possibly relative artifact URL against the service root.
fn resolve_reference(base_url: &str, reference: &str) -> Result<reqwest::Url, ClientError> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reqwest::Url::parse(reference).map_err(|e| ClientError::Internal(e.to_string()));
    }
    let base = reqwest::Url::parse(base_url)
        .map_err(|e| ClientError::Internal(format!("base_url: {e}")))?;
    base.join(reference)
        .map_err(|e| ClientError::Internal(format!("download reference: {e}")))
}
