mod common;

use common::synthetic_image::{block_image, horizontal_line_image};

use cellscan::image::{BLACK, WHITE};
use cellscan::prelude::*;

#[test]
fn block_image_yields_one_shape_with_consistent_geometry() {
    let image = block_image(80, 80, 30, 30, 16);
    let analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();

    assert_eq!(analysis.shapes().len(), 1);
    let shape = &analysis.shapes()[0];

    // The discovered outline hugs the block; the bounding box must cover it.
    assert!(shape.bounds.contains(30, 30));
    assert!(shape.bounds.contains(45, 45));

    let area = shape.area_in_pixels();
    assert!(area > 0);
    let stats = shape.pixel_stats(analysis.image()).unwrap();
    assert_eq!(stats.num_pixels, area as u64);
    assert!(stats.min_luminance <= stats.max_luminance);

    // Every covered pixel is either fully black or fully white here.
    let (in_range, fraction) = shape
        .count_pixels_in_luminance_range(0, 0, analysis.image())
        .unwrap();
    assert!(in_range > 0);
    assert!(fraction > 0.0 && fraction <= 1.0);
}

#[test]
fn separated_blocks_become_separate_shapes() {
    let mut image = block_image(120, 80, 10, 10, 16);
    for y in 50..66 {
        for x in 80..96 {
            image.set_pixel(x, y, BLACK).unwrap();
        }
    }
    let analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();
    assert_eq!(analysis.shapes().len(), 2);

    let mut ids: Vec<_> = analysis.shapes().iter().map(|s| s.id).collect();
    ids.dedup();
    assert_eq!(ids.len(), 2, "shape ids must be distinct");
}

#[test]
fn inspect_region_from_edge_detection_matches_the_block() {
    let image = block_image(80, 80, 30, 30, 16);
    let mut analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();
    let discovered = analysis.shapes()[0].clone();

    let region = analysis
        .create_inspect_region(InspectRegionPlacement::FromEdgeDetection {
            top: 20,
            bottom: 60,
            left: 20,
            right: 60,
        })
        .unwrap();
    assert_eq!(region.id, discovered.id);
    assert_eq!(region.area_in_pixels(), discovered.area_in_pixels());
}

#[test]
fn line_round_trips_from_raster_to_analytic_form() {
    let image = horizontal_line_image(200, 60, 25, 20, 170);
    let analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();

    let (result, annotated) = analysis.detect_lines(&LineOptions::default(), true).unwrap();
    assert_eq!(result.lines.len(), 1, "stats: {:?}", result.stats);

    let line = &result.lines[0];
    assert!(line.slope.abs() < 0.05);
    assert!((line.y_intercept - 25.0).abs() <= 3.0);
    assert!(line.point_a.x <= 20 && line.point_b.x >= 170);

    // The annotated copy marks the supporting pixels in blue.
    let annotated = annotated.unwrap();
    let blue = 0x0000_00FFu32;
    let marked = annotated.data.iter().filter(|&&p| p == blue).count();
    assert!(marked > 0, "expected annotated pixels");
}

#[test]
fn blank_image_produces_nothing() {
    let image = RasterImage::filled(64, 64, WHITE);
    let analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();
    assert!(analysis.shapes().is_empty());

    let (result, _) = analysis.detect_lines(&LineOptions::default(), false).unwrap();
    assert!(result.lines.is_empty());
}

#[test]
fn rendered_features_keep_image_dimensions() {
    let image = block_image(80, 80, 30, 30, 16);
    let analysis = CellImage::analyze(image, &AnalyzerOptions::default()).unwrap();
    let options = AnalyzerOptions {
        outlines_only: true,
        draw_scanlines: true,
        ..AnalyzerOptions::default()
    };
    let canvas = analysis.render_features(&options).unwrap();
    assert_eq!((canvas.w, canvas.h), (80, 80));
    assert!(canvas.data.iter().any(|&p| p != BLACK));
}
