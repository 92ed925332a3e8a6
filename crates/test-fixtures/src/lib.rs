//! Test fixtures for the arbitration engine: golden scenarios, scripted
//! inference backends, and source builders shared across crates.

pub mod backends;

use std::path::PathBuf;

use arbiter_core::models::{Decision, Dimension, SourceResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    loop {
        if path.join("golden").is_dir() && path.ends_with("test-fixtures") {
            return path;
        }
        let candidate = path.join("test-fixtures");
        if candidate.join("golden").is_dir() {
            return candidate;
        }
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Read a fixture file as a string.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixtures_root().join(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read fixture dir {}: {}", dir.display(), e))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// A golden arbitration scenario: inputs plus the outcome they must produce.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenScenario {
    pub name: String,
    pub sources: Vec<SourceResponse>,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedOutcome {
    /// Any of these decisions is acceptable.
    pub decision_any_of: Vec<Decision>,
    #[serde(default)]
    pub min_overall: Option<f64>,
    #[serde(default)]
    pub max_overall: Option<f64>,
    /// Dimensions that must report at least one contradiction.
    #[serde(default)]
    pub flagged: Vec<Dimension>,
    /// Dimensions that must report none.
    #[serde(default)]
    pub clean: Vec<Dimension>,
}

/// Load a golden scenario by file stem, e.g. `"safety_posture_conflict"`.
pub fn load_scenario(name: &str) -> GoldenScenario {
    load_fixture(&format!("golden/{name}.json"))
}

/// Every golden scenario, sorted by file name.
pub fn all_scenarios() -> Vec<GoldenScenario> {
    list_fixtures("golden")
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
        })
        .collect()
}

/// A free-text source with confidence 0.9.
pub fn source(id: &str, text: &str) -> SourceResponse {
    SourceResponse::free_text(id, text, 0.9)
}

/// Free-text sources named `s0`, `s1`, ... in order.
pub fn sources(texts: &[&str]) -> Vec<SourceResponse> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| source(&format!("s{i}"), t))
        .collect()
}
