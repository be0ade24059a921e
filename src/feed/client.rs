//! Blocking feed client (ureq) and response classification.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::core::event::RawEvent;

/// Default API endpoint segment.
pub const DEFAULT_ENDPOINT: &str = "gobi-log";

/// Where the feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Http {
        base_url: String,
        endpoint: String,
        log_name: String,
    },
    File(PathBuf),
}

impl FeedSource {
    pub fn http(base_url: impl Into<String>, endpoint: impl Into<String>, log_name: impl Into<String>) -> Self {
        FeedSource::Http {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
            log_name: log_name.into(),
        }
    }

    /// Request URL for HTTP sources.
    pub fn url(&self) -> Option<String> {
        match self {
            FeedSource::Http {
                base_url,
                endpoint,
                log_name,
            } => Some(format!(
                "{}/api/{}/{}",
                base_url.trim_end_matches('/'),
                endpoint.trim_matches('/'),
                log_name.trim_start_matches('/')
            )),
            FeedSource::File(_) => None,
        }
    }

    /// Short name for titles and the status bar.
    pub fn display_name(&self) -> String {
        match self {
            FeedSource::Http { log_name, .. } => log_name.clone(),
            FeedSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// URI an image loader can open for an image `path` from the feed.
    ///
    /// Absolute URLs pass through. Otherwise HTTP sources resolve against the
    /// base URL and file sources against the JSON file's directory.
    pub fn resolve_image(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("file://") {
            return path.to_string();
        }
        match self {
            FeedSource::Http { base_url, .. } => {
                format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
            }
            FeedSource::File(json) => {
                let dir = json.parent().unwrap_or(Path::new("."));
                format!("file://{}", dir.join(path.trim_start_matches('/')).display())
            }
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Http { .. } => write!(f, "{}", self.url().unwrap_or_default()),
            FeedSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Body of a feed response.
///
/// Entries are decoded one by one: a record that does not fit [`RawEvent`]
/// becomes [`RawEvent::Unknown`] instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "FeedDocument")]
pub enum FeedResponse {
    Events(Vec<RawEvent>),
    Error { error: String },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Entries(Vec<serde_json::Value>),
    Error { error: String },
}

impl From<FeedDocument> for FeedResponse {
    fn from(doc: FeedDocument) -> Self {
        match doc {
            FeedDocument::Entries(entries) => FeedResponse::Events(
                entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, value)| {
                        serde_json::from_value(value).unwrap_or_else(|e| {
                            warn!("Feed entry {} is malformed: {}", i, e);
                            RawEvent::Unknown
                        })
                    })
                    .collect(),
            ),
            FeedDocument::Error { error } => FeedResponse::Error { error },
        }
    }
}

/// Failure to obtain a feed document at all.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("{url} answered HTTP {code} without a feed document")]
    Status { url: String, code: u16 },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid feed JSON from {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("feed loader for {source_name} stopped without a result")]
    LoaderGone { source_name: String },
}

/// Parse a feed document.
pub fn parse_feed(reader: impl Read, origin: &str) -> Result<FeedResponse, FeedError> {
    serde_json::from_reader(reader).map_err(|source| FeedError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Fetch and parse the feed. Blocking.
pub fn fetch(source: &FeedSource) -> Result<FeedResponse, FeedError> {
    match source {
        FeedSource::Http { .. } => {
            let url = source.url().unwrap_or_default();
            fetch_http(&url)
        }
        FeedSource::File(path) => {
            info!("Reading log feed from {}", path.display());
            let file = File::open(path).map_err(|source| FeedError::Io {
                path: path.clone(),
                source,
            })?;
            parse_feed(BufReader::new(file), &path.display().to_string())
        }
    }
}

fn fetch_http(url: &str) -> Result<FeedResponse, FeedError> {
    info!("Fetching log feed: GET {}", url);
    match ureq::get(url).call() {
        Ok(response) => {
            debug!("Feed responded {} {}", response.status(), response.status_text());
            parse_feed(response.into_reader(), url)
        }
        // An error status may still carry an {"error": ...} document.
        Err(ureq::Error::Status(code, response)) => {
            debug!("Feed responded with status {}", code);
            parse_feed(response.into_reader(), url).map_err(|_| FeedError::Status {
                url: url.to_string(),
                code,
            })
        }
        Err(e) => Err(FeedError::Http {
            url: url.to_string(),
            source: Box::new(e),
        }),
    }
}
