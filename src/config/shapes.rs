use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalyzerOptions;

#[derive(Debug, Deserialize)]
pub struct ShapeToolConfig {
    #[serde(rename = "input")]
    pub input: PathBuf,
    #[serde(default)]
    pub analyzer: AnalyzerOptions,
    pub output: ShapeOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct ShapeOutputConfig {
    #[serde(rename = "features_image")]
    pub features_image: PathBuf,
    #[serde(rename = "shapes_json")]
    pub shapes_json: PathBuf,
}

pub fn load_shape_tool_config(path: &Path) -> Result<ShapeToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
