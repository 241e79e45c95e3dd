use cellscan::config::load_line_tool_config;
use cellscan::image::io::{load_raster_image, save_raster_image, write_json_file};
use cellscan::lines::{detect_lines, DetectionStats, Line};
use cellscan::luminance::{render_edge_image, LuminanceMap};
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
    let config = load_line_tool_config(Path::new(&config_path))?;

    let image = load_raster_image(&config.input)?;
    let map = LuminanceMap::from_source(&image, config.edge.threshold)?;
    let edges = render_edge_image(&map);

    let mut annotated = image.clone();
    let result = detect_lines(&edges, &map, None, &config.lines, Some(&mut annotated))?;

    let summary = LineDetectionSummary {
        width: map.width(),
        height: map.height(),
        edge_threshold: config.edge.threshold,
        edge_count: map.edge_count(),
        stats: result.stats,
        elapsed_ms: result.elapsed_ms,
        lines: result.lines,
    };

    save_raster_image(&edges, &config.output.edges_image)?;
    save_raster_image(&annotated, &config.output.annotated_image)?;
    write_json_file(&config.output.lines_json, &summary)?;

    println!(
        "Saved edge image to {} ({} edge pixels)",
        config.output.edges_image.display(),
        summary.edge_count
    );
    println!(
        "Saved {} lines to {}",
        summary.lines.len(),
        config.output.lines_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: line_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LineDetectionSummary {
    width: i32,
    height: i32,
    edge_threshold: i32,
    edge_count: usize,
    stats: DetectionStats,
    elapsed_ms: f64,
    lines: Vec<Line>,
}
