use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lines::LineOptions;
use crate::luminance::EDGE_DETECTION_THRESHOLD;

#[derive(Debug, Deserialize)]
pub struct LineToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub edge: EdgeConfig,
    #[serde(default)]
    pub lines: LineOptions,
    pub output: LineOutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub threshold: i32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            threshold: EDGE_DETECTION_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LineOutputConfig {
    #[serde(rename = "edges_image")]
    pub edges_image: PathBuf,
    #[serde(rename = "annotated_image")]
    pub annotated_image: PathBuf,
    #[serde(rename = "lines_json")]
    pub lines_json: PathBuf,
}

pub fn load_line_tool_config(path: &Path) -> Result<LineToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
