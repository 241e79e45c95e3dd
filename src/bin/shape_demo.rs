use cellscan::analyzer::CellImage;
use cellscan::config::load_shape_tool_config;
use cellscan::image::io::{load_raster_image, save_raster_image, write_json_file};
use cellscan::shapes::Shape;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_shape_tool_config(Path::new(&config_path))?;

    let image = load_raster_image(&config.input)?;
    let cell = CellImage::analyze(image, &config.analyzer)?;
    let features = cell.render_features(&config.analyzer)?;

    let summary = ShapeScanSummary {
        width: cell.image().w,
        height: cell.image().h,
        edge_threshold: config.analyzer.edge_threshold,
        num_shapes: cell.shapes().len(),
        shapes: cell.shapes().to_vec(),
    };

    save_raster_image(&features, &config.output.features_image)?;
    write_json_file(&config.output.shapes_json, &summary)?;

    println!(
        "Saved feature image to {}",
        config.output.features_image.display()
    );
    println!(
        "Saved {} shapes to {}",
        summary.num_shapes,
        config.output.shapes_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: shape_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShapeScanSummary {
    width: usize,
    height: usize,
    edge_threshold: i32,
    num_shapes: usize,
    shapes: Vec<Shape>,
}
