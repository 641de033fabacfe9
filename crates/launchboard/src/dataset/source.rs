//! Dataset sources.
//!
//! A [`DatasetSource`] produces the raw CSV bytes once at startup. The public
//! dataset is fetched over HTTPS; a local file can be used instead for offline
//! work and tests.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::Dataset;
use crate::config::DatasetConfig;
use crate::error::{Error, Result};

/// Something that can produce the raw launch CSV.
#[async_trait]
pub trait DatasetSource: Send + Sync + std::fmt::Debug {
    /// Human-readable description for logs and the dataset summary.
    fn describe(&self) -> String;

    /// Fetch the raw CSV bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be retrieved.
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// Fetches the dataset over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for `url` with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::DatasetFetch {
                url: url.clone(),
                source,
            })?;
        Ok(Self { url, client })
    }

    /// The URL this source fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let fetch_error = |source| Error::DatasetFetch {
            url: self.url.clone(),
            source,
        };

        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_error)?;
        let body = response.bytes().await.map_err(fetch_error)?;
        Ok(body.to_vec())
    }
}

/// Reads the dataset from a local CSV file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Reading {}", self.path.display());
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::DatasetRead {
                path: self.path.clone(),
                source,
            })
    }
}

/// Pick the dataset source.
///
/// An explicit `location` (from `--data`) wins over configuration; it is
/// treated as a URL when it starts with `http://` or `https://`, otherwise as
/// a file path. Without one, a configured `path` wins over the configured `url`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn source_for(
    config: &DatasetConfig,
    location: Option<&str>,
) -> Result<Box<dyn DatasetSource>> {
    let timeout = config.timeout();

    if let Some(location) = location {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Ok(Box::new(HttpSource::new(location, timeout)?));
        }
        return Ok(Box::new(FileSource::new(location)));
    }

    match &config.path {
        Some(path) => Ok(Box::new(FileSource::new(path.clone()))),
        None => Ok(Box::new(HttpSource::new(config.url.clone(), timeout)?)),
    }
}

/// Fetch and parse the dataset. Called once, before serving.
///
/// # Errors
///
/// Returns an error if fetching or parsing fails, or if the table has no rows.
pub async fn load(source: &dyn DatasetSource) -> Result<Dataset> {
    let source_name = source.describe();
    info!(source = %source_name, "Loading launch dataset");

    let bytes = source.fetch().await?;
    let dataset = Dataset::from_csv_reader(bytes.as_slice(), source_name.clone())?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset { source_name });
    }

    info!(
        rows = dataset.len(),
        sites = dataset.sites().len(),
        fingerprint = %&dataset.info().fingerprint[..16],
        "Launch dataset loaded"
    );
    Ok(dataset)
}
