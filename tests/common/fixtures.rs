//! Test fixtures for loading endpoint descriptions from JSON files.

use serde_json::Value;
use std::path::PathBuf;

/// Path of a fixture file below `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Read a fixture as raw text.
pub fn load_fixture_text(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

/// Load a fixture as JSON.
pub fn load_fixture(name: &str) -> Value {
    serde_json::from_str(&load_fixture_text(name))
        .unwrap_or_else(|_| panic!("Failed to parse JSON fixture: {}", name))
}
