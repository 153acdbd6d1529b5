//! Configuration for the upload client.
//!
//! All behaviour is controlled through [`ClientConfig`], built via its
//! [`ClientConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config between callers and to see at a glance how a
//! client instance differs from the defaults.

use crate::error::ClientError;
use crate::observer::Observer;
use std::fmt;
use std::time::Duration;

/// Default service root: the extraction service's local development port.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Default client-side size cap, matching the service's request limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration for an [`crate::client::UploadClient`].
///
/// Built via [`ClientConfig::builder()`] or [`ClientConfig::default()`].
///
/// # Example
/// ```rust
/// use sourcead_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://extract.internal:5000")
///     .connect_timeout(std::time::Duration::from_secs(5))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Root URL of the extraction service. All endpoint paths
    /// (`/api/data_types`, `/upload`, …) are resolved against it.
    pub base_url: String,

    /// TCP connect timeout. Default: 10 s.
    ///
    /// This is the only timeout the client sets. A submission that has
    /// been sent runs to completion or transport failure; there is no
    /// overall request deadline and no abort path.
    pub connect_timeout: Duration,

    /// Client-side size cap checked before a submission is sent.
    /// Default: 16 MiB, the service's own request limit — rejecting
    /// locally saves uploading megabytes only to receive a 413.
    pub max_upload_bytes: u64,

    /// Observer for selection/busy/error indicators. Default: none
    /// (equivalent to [`crate::observer::NoopObserver`]).
    pub observer: Option<Observer>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            observer: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("observer", &self.observer.as_ref().map(|_| "<dyn UploadObserver>"))
            .finish()
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        // A trailing slash would double up when joining endpoint paths.
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn max_upload_bytes(mut self, max: u64) -> Self {
        self.config.max_upload_bytes = max.max(1);
        self
    }

    pub fn observer(mut self, observer: Observer) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        if !c.base_url.starts_with("http://") && !c.base_url.starts_with("https://") {
            return Err(ClientError::InvalidConfig(format!(
                "base_url must be an HTTP/HTTPS URL, got '{}'",
                c.base_url
            )));
        }
        if reqwest::Url::parse(&c.base_url).is_err() {
            return Err(ClientError::InvalidConfig(format!(
                "base_url is not a valid URL: '{}'",
                c.base_url
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ClientConfig::default();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.connect_timeout, Duration::from_secs(10));
        assert_eq!(c.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(c.observer.is_none());
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let c = ClientConfig::builder()
            .base_url("http://localhost:5000/")
            .build()
            .unwrap();
        assert_eq!(c.base_url, "http://localhost:5000");
    }

    #[test]
    fn builder_rejects_non_http_url() {
        let err = ClientConfig::builder()
            .base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_garbage_url() {
        let err = ClientConfig::builder()
            .base_url("http://")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig(_)));
    }

    #[test]
    fn max_upload_bytes_floor_is_one() {
        let c = ClientConfig::builder().max_upload_bytes(0).build().unwrap();
        assert_eq!(c.max_upload_bytes, 1);
    }
}
