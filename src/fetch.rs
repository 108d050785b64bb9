//! fetch
//!
//! Checksum-verified downloads with a local cache.
//!
//! A download target is a file path plus the URL it comes from and the
//! SHA-256 digest it must have. An existing file with the right digest is
//! reused without touching the network; a file with the wrong digest is
//! treated as a corrupted cache entry and replaced.
//!
//! # Example
//!
//! ```no_run
//! use patchstack::fetch::download;
//! use patchstack::ui::output::Reporter;
//! use std::path::Path;
//!
//! download(
//!     Path::new("build/bukkit-1.7.2.jar"),
//!     "https://example.com/bukkit-1.7.2.jar",
//!     "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
//!     &Reporter::default(),
//! )
//! .unwrap();
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::ui::output::Reporter;

/// Errors from download operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The downloaded bytes do not hash to the expected digest.
    #[error("checksum mismatch for '{path}': expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Connection, TLS or HTTP status failure.
    #[error("failed to download '{url}': {message}")]
    NetworkFailure { url: String, message: String },

    #[error("I/O error on '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
}

/// What [`download`] did to produce the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// An existing file already had the expected digest.
    Cached,
    /// The file was fetched from the network.
    Downloaded,
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String, FetchError> {
    let io_err = |source| FetchError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::open(path).map_err(io_err)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(io_err)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Download `url` to `file` unless a verified copy is already present.
///
/// Blocking wrapper around [`download_async`]; must not be called from
/// inside a tokio runtime.
pub fn download(
    file: &Path,
    url: &str,
    sha256: &str,
    out: &Reporter,
) -> Result<DownloadOutcome, FetchError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(FetchError::Runtime)?;
    rt.block_on(download_async(file, url, sha256, out))
}

/// Async implementation of [`download`].
///
/// # Errors
///
/// - [`FetchError::NetworkFailure`] on transport errors or non-2xx status
/// - [`FetchError::ChecksumMismatch`] if the fetched bytes do not verify;
///   the bad file is removed
pub async fn download_async(
    file: &Path,
    url: &str,
    sha256: &str,
    out: &Reporter,
) -> Result<DownloadOutcome, FetchError> {
    let expected = sha256.trim().to_ascii_lowercase();

    if file.is_file() {
        let cached = sha256_file(file)?;
        if cached == expected {
            out.info(format!("Using cached {}", file.display()));
            return Ok(DownloadOutcome::Cached);
        }
        out.warn(format!(
            "Found a cached but corrupted version of {} (expected sha256 {}, got {})",
            file.display(),
            expected,
            cached
        ));
        fs::remove_file(file).map_err(|source| FetchError::Io {
            path: file.to_path_buf(),
            source,
        })?;
    }

    out.info(format!("Downloading {url}"));
    let bytes = fetch_bytes(url).await?;

    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| FetchError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    tokio::fs::write(file, &bytes)
        .await
        .map_err(|source| FetchError::Io {
            path: file.to_path_buf(),
            source,
        })?;

    let actual = sha256_file(file)?;
    if actual != expected {
        // Best effort: the mismatch is the error worth reporting.
        let _ = fs::remove_file(file);
        return Err(FetchError::ChecksumMismatch {
            path: file.to_path_buf(),
            expected,
            actual,
        });
    }

    out.debug(format!("Verified {} ({} bytes)", file.display(), bytes.len()));
    Ok(DownloadOutcome::Downloaded)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let network = |e: reqwest::Error| FetchError::NetworkFailure {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = reqwest::get(url)
        .await
        .map_err(network)?
        .error_for_status()
        .map_err(network)?;
    let bytes = response.bytes().await.map_err(network)?;
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sha256_of_known_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "test").unwrap();
        assert_eq!(
            sha256_file(&path).unwrap(),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn sha256_of_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = sha256_file(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }

    #[test]
    fn cached_file_skips_network() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "test").unwrap();

        // An unroutable URL proves the network is never touched.
        let outcome = download(
            &path,
            "http://127.0.0.1:9/never",
            "9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08",
            &Reporter::quiet(),
        )
        .unwrap();
        assert_eq!(outcome, DownloadOutcome::Cached);
    }
}
