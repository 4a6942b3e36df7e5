//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use wifispot_lib::{load_catalog, SpotCatalog};

/// Path to the fixtures directory at the workspace root.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn fixture_csv() -> PathBuf {
    fixtures_dir().join("nyc_wifi_sample.csv")
}

/// Load the sample dataset; twelve valid spots out of thirteen data rows.
#[allow(dead_code)]
pub fn fixture_catalog() -> SpotCatalog {
    load_catalog(&fixture_csv()).expect("fixture dataset loads")
}
