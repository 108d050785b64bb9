//! Integration tests for checksum-verified downloads against a mock HTTP
//! server.

use std::fs;

use sha2::{Digest, Sha256};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patchstack::fetch::{download_async, DownloadOutcome, FetchError};
use patchstack::ui::output::Reporter;

const JAR: &[u8] = b"PK\x03\x04 not really a jar";

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

async fn serving_jar() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bukkit.jar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JAR))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn downloads_and_verifies() {
    let server = serving_jar().await;
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("lib/bukkit.jar");

    let outcome = download_async(
        &file,
        &format!("{}/bukkit.jar", server.uri()),
        &digest(JAR),
        &Reporter::quiet(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, DownloadOutcome::Downloaded);
    assert_eq!(fs::read(&file).unwrap(), JAR);
}

#[tokio::test]
async fn verified_cache_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(JAR))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("bukkit.jar");
    fs::write(&file, JAR).unwrap();

    let outcome = download_async(
        &file,
        &format!("{}/bukkit.jar", server.uri()),
        &digest(JAR),
        &Reporter::quiet(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, DownloadOutcome::Cached);
}

#[tokio::test]
async fn corrupted_cache_is_replaced() {
    let server = serving_jar().await;
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("bukkit.jar");
    fs::write(&file, b"truncated").unwrap();

    let outcome = download_async(
        &file,
        &format!("{}/bukkit.jar", server.uri()),
        &digest(JAR),
        &Reporter::quiet(),
    )
    .await
    .unwrap();

    assert_eq!(outcome, DownloadOutcome::Downloaded);
    assert_eq!(fs::read(&file).unwrap(), JAR);
}

#[tokio::test]
async fn checksum_mismatch_removes_file() {
    let server = serving_jar().await;
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("bukkit.jar");
    let wrong = digest(b"something else");

    let err = download_async(
        &file,
        &format!("{}/bukkit.jar", server.uri()),
        &wrong,
        &Reporter::quiet(),
    )
    .await
    .unwrap_err();

    match err {
        FetchError::ChecksumMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, wrong);
            assert_eq!(actual, digest(JAR));
        }
        other => panic!("expected ChecksumMismatch, got {other:?}"),
    }
    assert!(!file.exists());
}

#[tokio::test]
async fn http_error_is_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("missing.jar");

    let err = download_async(
        &file,
        &format!("{}/missing.jar", server.uri()),
        &digest(JAR),
        &Reporter::quiet(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, FetchError::NetworkFailure { .. }));
    assert!(!file.exists());
}
