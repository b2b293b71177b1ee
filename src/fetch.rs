//! Remote collaborators: record lists, section info, and widget payloads.
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::types::{
    GraphData,
    ListData,
    Record,
    RecordPage,
    SectionInfo,
    TableData,
    TextBoxData,
    TimelineData,
};

/// Placeholder in widget URLs replaced by the record id.
pub const RECORD_ID_PLACEHOLDER: &str = ":id";

/// Client-level timeout for every request.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Substitute the record id into a widget URL template.
pub fn format_url_with_id(url: &str, id: &str) -> String {
    url.replacen(RECORD_ID_PLACEHOLDER, id, 1)
}

/// Decode a payload, reporting failures against its URL.
fn decode<T: DeserializeOwned>(url: &str, value: serde_json::Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::Fetch { reason: e.to_string(), url: url.to_owned() })
}

/// Read access to the platform's remote data.
///
/// Only `fetch_json` talks to a backend; the typed accessors decode its
/// payload. Errors are returned as-is; callers in the resolver fold them
/// into "no data".
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the JSON document behind `url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` if the backend cannot produce a payload.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, Error>;

    /// Every record of a section.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn records(&self, section_url: &str) -> Result<Vec<Record>, Error> {
        let page: RecordPage = decode(section_url, self.fetch_json(section_url).await?)?;
        Ok(page.rows)
    }

    /// The info payload behind one record of a section.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn section_info(&self, record_id: &str, section_url: &str) -> Result<SectionInfo, Error> {
        let url = format!("{section_url}/{record_id}");
        decode(&url, self.fetch_json(&url).await?)
    }

    /// Graph widget payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn graph(&self, widget_url: &str) -> Result<GraphData, Error> {
        decode(widget_url, self.fetch_json(widget_url).await?)
    }

    /// Table widget payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn table(&self, widget_url: &str) -> Result<TableData, Error> {
        decode(widget_url, self.fetch_json(widget_url).await?)
    }

    /// List widget payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn list(&self, widget_url: &str) -> Result<ListData, Error> {
        decode(widget_url, self.fetch_json(widget_url).await?)
    }

    /// Timeline widget payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn timeline(&self, widget_url: &str) -> Result<TimelineData, Error> {
        decode(widget_url, self.fetch_json(widget_url).await?)
    }

    /// Text-box widget payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` on transport or decode failure.
    async fn text_box(&self, widget_url: &str) -> Result<TextBoxData, Error> {
        decode(widget_url, self.fetch_json(widget_url).await?)
    }
}

/// Fetches payloads over HTTP. Relative URLs are joined to `base_url`.
pub struct HttpFetcher {
    /// Prefix for relative URLs, without a trailing slash.
    base_url: String,
    /// Shared connection pool.
    client: Client,
}

impl HttpFetcher {
    /// Build a client with the transport timeout the resolver relies on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Fetch` if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Fetch { reason: e.to_string(), url: base_url.clone() })?;
        Ok(Self { base_url, client })
    }

    /// Join a relative URL onto the base URL.
    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_owned();
        }
        format!("{}/{}", self.base_url.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, Error> {
        let url = self.absolute(url);
        debug!(%url, "fetching");
        let failed = |e: reqwest::Error| Error::Fetch { reason: e.to_string(), url: url.clone() };

        self.client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?
            .json()
            .await
            .map_err(failed)
    }
}

/// Serves recorded payloads keyed by URL. Unknown URLs fail like a dead endpoint.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    /// Every URL asked for, in order.
    requested: Mutex<Vec<String>>,
    /// Payloads by URL.
    responses: HashMap<String, serde_json::Value>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `{ "<url>": <payload>, ... }` document.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file is missing, `Error::Io` on
    /// other read failures, or `Error::Json` if the document is not a JSON object.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        let responses: HashMap<String, serde_json::Value> = serde_json::from_str(&content)?;
        Ok(Self { requested: Mutex::new(Vec::new()), responses })
    }

    /// Record a payload for `url`.
    #[must_use]
    pub fn with(mut self, url: impl Into<String>, payload: serde_json::Value) -> Self {
        self.responses.insert(url.into(), payload);
        self
    }

    /// Every URL asked for so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, Error> {
        self.requested.lock().unwrap_or_else(PoisonError::into_inner).push(url.to_owned());
        self.responses.get(url).cloned().ok_or_else(|| Error::Fetch {
            reason: "no response recorded".to_owned(),
            url: url.to_owned(),
        })
    }
}
