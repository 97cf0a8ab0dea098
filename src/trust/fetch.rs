// src/trust/fetch.rs

//! Resolve a trusted root from a URL or a local file

use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use tough::schema::{Root, Signed};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Where a trusted root comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSource {
    /// `http://` or `https://` location
    Remote(Url),
    /// Anything else is treated as a filesystem path
    Local(PathBuf),
}

impl RootSource {
    /// Classify a user-supplied root location
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Local(PathBuf::from(source)),
        }
    }
}

/// Fetch root bytes from a URL or a local path
///
/// Remote bodies are returned as served. Local files must parse as a TUF
/// root document and are re-serialized as compact JSON.
pub fn fetch_root(source: &str) -> Result<Vec<u8>> {
    match RootSource::parse(source) {
        RootSource::Remote(url) => fetch_remote(&url),
        RootSource::Local(path) => load_local(&path),
    }
}

fn fetch_remote(url: &Url) -> Result<Vec<u8>> {
    info!("Fetching trusted root from {}", url);
    let fetch_error = |reason: String| Error::FetchError {
        source_uri: url.to_string(),
        reason,
    };

    let client = Client::builder()
        .build()
        .map_err(|e| fetch_error(format!("failed to create HTTP client: {e}")))?;
    let response = client
        .get(url.clone())
        .send()
        .map_err(|e| fetch_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", response.status())));
    }

    let bytes = response
        .bytes()
        .map_err(|e| fetch_error(format!("failed to read response: {e}")))?;

    debug!("Fetched {} bytes of trusted root", bytes.len());
    Ok(bytes.to_vec())
}

fn load_local(path: &Path) -> Result<Vec<u8>> {
    debug!("Loading trusted root from {}", path.display());
    let raw = fs::read(path).map_err(|e| Error::FetchError {
        source_uri: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let root: Signed<Root> = serde_json::from_slice(&raw)
        .map_err(|e| Error::ParseError(format!("{}: {e}", path.display())))?;

    serde_json::to_vec(&root).map_err(|e| Error::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification() {
        assert!(matches!(
            RootSource::parse("https://metadata.rstuf.org/1.root.json"),
            RootSource::Remote(_)
        ));
        assert!(matches!(
            RootSource::parse("http://localhost:8080/root.json"),
            RootSource::Remote(_)
        ));
        assert_eq!(
            RootSource::parse("tests/fixtures/test-root.json"),
            RootSource::Local(PathBuf::from("tests/fixtures/test-root.json"))
        );
        assert!(matches!(
            RootSource::parse("file:///etc/root.json"),
            RootSource::Local(_)
        ));
    }

    #[test]
    fn test_missing_local_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        let err = fetch_root(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::FetchError { .. }));
    }

    #[test]
    fn test_malformed_local_root_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("root.json");
        fs::write(&path, br#"{"signed": {"_type": "targets"}}"#).unwrap();
        let err = fetch_root(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[test]
    fn test_unreachable_remote_is_fetch_error() {
        // Port 9 (discard) on loopback refuses connections on test hosts
        let err = fetch_root("http://127.0.0.1:9/root.json").unwrap_err();
        assert!(matches!(err, Error::FetchError { .. }));
    }
}
