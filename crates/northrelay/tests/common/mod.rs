//! Common test utilities and helpers

use std::path::Path;
use std::time::Duration;

use northrelay::Client;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "nr_test_0123456789abcdef0123456789abcdef".to_string()
}

/// Route SDK logs to the test harness output.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("northrelay=debug"))
        .with_test_writer()
        .try_init();
}

/// A client for `base_url` that retries quickly.
#[allow(dead_code)]
pub fn fast_client(base_url: &str, max_retries: u32) -> Client {
    Client::builder()
        .api_key(test_api_key())
        .base_url(base_url)
        .max_retries(max_retries)
        .retry_delay(Duration::from_millis(1))
        .max_retry_delay(Duration::from_millis(5))
        .build()
        .expect("Failed to build client")
}
