#![allow(dead_code)]

use bundlesync::cache::HashCache;
use bundlesync::download::RemoteVariant;
use bundlesync::reconcile::{FetchJob, ReconcilerBuilder};
use md5::{Digest, Md5};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::{Request, Respond, ResponseTemplate};

// Common test constants
pub const TEST_MD5_EMPTY: &str = "d41d8cd98f00b204e9800998ecf8427e";
pub const TEST_MD5_HELLO: &str = "65a8e27d8879283831b664bd8b7f0ad4";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a file with the given content, parent directories included
pub fn create_temp_file(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&file_path, content).expect("Failed to write temporary file");
    file_path
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Creates content of the same size as [`create_test_content`] but different bytes
pub fn create_other_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| ((i * 7 + 3) % 251) as u8).collect()
}

/// Lowercase hex MD5 of a buffer
pub fn md5_hex(content: &[u8]) -> String {
    hex::encode(Md5::digest(content))
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that nothing exists at the given path
pub fn assert_file_absent(path: &Path) {
    assert!(
        fs::symlink_metadata(path).is_err(),
        "Nothing should exist at path: {:?}",
        path
    );
}

/// Asserts that a file has the expected size
pub fn assert_file_size(path: &Path, expected_size: u64) {
    let metadata = fs::metadata(path).expect("Failed to get file metadata");
    assert_eq!(
        metadata.len(),
        expected_size,
        "File size mismatch at path: {:?}",
        path
    );
}

/// Asserts that a file holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert!(content == expected, "File content mismatch at path: {:?}", path);
}

// === Variant Helpers ===

/// Creates a variant served by the mock server at `path`
pub fn create_variant(server_uri: &str, path: &str, content: &[u8]) -> RemoteVariant {
    RemoteVariant::from_url(
        "Download",
        &format!("{}{}", server_uri, path),
        content.len() as u64,
        &md5_hex(content),
    )
    .expect("Failed to create variant")
}

/// Creates a job placing `variant` under `<root>/<stem>/`
pub fn create_job(root: &Path, stem: &str, variant: RemoteVariant) -> FetchJob {
    let target = root.join(stem).join(&variant.filename);
    FetchJob::new(variant, target)
}

/// Hash cache mirroring `root` under `<root>/json`
pub fn create_test_cache(root: &Path) -> HashCache {
    HashCache::new(root, root.join("json"))
}

/// Reconciler builder with hidden bars, no retries and a cache under `root`
pub fn create_test_reconciler_builder(root: &Path) -> ReconcilerBuilder {
    ReconcilerBuilder::hidden()
        .retries(0)
        .cache(create_test_cache(root))
}

// === Mock Server Helpers ===

/// `Range` header of a received request
pub fn range_header(request: &Request) -> Option<String> {
    request
        .headers
        .get("range")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn range_start(request: &Request) -> Option<usize> {
    range_header(request)?
        .strip_prefix("bytes=")?
        .trim_end_matches('-')
        .parse()
        .ok()
}

/// Serves a file, honouring `Range: bytes=L-` unless told not to.
pub struct RangeResponder {
    body: Vec<u8>,
    honor_range: bool,
}

impl RangeResponder {
    pub fn new(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            honor_range: true,
        }
    }

    pub fn ignoring_range(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            honor_range: false,
        }
    }
}

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let len = self.body.len();
        match range_start(request) {
            Some(start) if self.honor_range && start < len => ResponseTemplate::new(206)
                .insert_header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, len - 1, len).as_str(),
                )
                .set_body_bytes(self.body[start..].to_vec()),
            Some(_) if self.honor_range => ResponseTemplate::new(416)
                .insert_header("Content-Range", format!("bytes */{}", len).as_str()),
            _ => ResponseTemplate::new(200).set_body_bytes(self.body.clone()),
        }
    }
}

/// Announces the whole file but stops sending after `cut` bytes, like a
/// connection that drops mid-transfer.
pub struct TruncatingResponder {
    body: Vec<u8>,
    cut: usize,
}

impl TruncatingResponder {
    pub fn new(body: &[u8], cut: usize) -> Self {
        Self {
            body: body.to_vec(),
            cut,
        }
    }
}

impl Respond for TruncatingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let len = self.body.len();
        let start = range_start(request).unwrap_or(0);
        ResponseTemplate::new(206)
            .insert_header(
                "Content-Range",
                format!("bytes {}-{}/{}", start, len - 1, len).as_str(),
            )
            .set_body_bytes(self.body[start..self.cut].to_vec())
    }
}

// === Order Document Helpers ===

/// One `download_struct` entry
pub fn download_entry(name: &str, url: &str, content: &[u8]) -> Value {
    json!({
        "name": name,
        "url": { "web": url },
        "file_size": content.len(),
        "md5": md5_hex(content),
    })
}

/// One subproduct with a single platform
pub fn subproduct(machine_name: &str, platform: &str, entries: Vec<Value>) -> Value {
    json!({
        "machine_name": machine_name,
        "human_name": machine_name.replace('_', " "),
        "downloads": [
            { "platform": platform, "download_struct": entries }
        ],
    })
}

/// An order document
pub fn order(subproducts: Vec<Value>) -> Value {
    json!({ "subproducts": subproducts })
}
