//! I/O helpers for raster images and JSON.
//!
//! - `load_raster_image`: read a PNG/BMP/JPEG/etc. into an owned packed-RGB buffer.
//! - `save_raster_image`: write a `RasterImage` to disk (format from extension).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RasterImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to a packed-RGB raster.
pub fn load_raster_image(path: &Path) -> Result<RasterImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(RasterImage::from_rgb_image(&img))
}

/// Save a raster to disk; the output format follows the file extension.
pub fn save_raster_image(raster: &RasterImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    raster
        .to_rgb_image()
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
