//! Integration tests for the scene analysis pipeline
//!
//! These tests validate the end-to-end workflow:
//! - Image loading and pre-scaling
//! - Card localization and canonical rectification
//! - Symbol extraction and pairwise matching
//! - Error handling for edge cases
//!
//! Note: tests requiring photographed card scenes are marked #[ignore]
//! until capture assets are available; synthetic scenes cover the geometric
//! stages and the empty-result contracts.

use opencv::core::{Mat, Point, Rect, Scalar, CV_8UC1};
use opencv::imgproc;
use opencv::prelude::*;
use spot_match::{analyze_scene, analyze_scene_file, PipelineConfig, PipelineError};
use std::path::Path;

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_analyze_scene_file_not_found() {
    let config = PipelineConfig::default();
    let result = analyze_scene_file(Path::new("nonexistent_scene.jpg"), &config, None);

    assert!(result.is_err());
    match result.unwrap_err() {
        PipelineError::ImageLoadError { .. } => {}
        err => panic!("Expected ImageLoadError, got: {:?}", err),
    }
}

#[test]
fn test_analyze_scene_file_unsupported_format() {
    let config = PipelineConfig::default();
    let result = analyze_scene_file(Path::new("scene.bmp"), &config, None);
    assert!(matches!(result, Err(PipelineError::ImageLoadError { .. })));
}

#[test]
fn test_analyze_scene_file_empty_path() {
    let config = PipelineConfig::default();
    let result = analyze_scene_file(Path::new(""), &config, None);
    assert!(result.is_err());
}

#[test]
fn test_invalid_config_rejected_before_loading() {
    let mut config = PipelineConfig::default();
    config.matching.good_matches_min = 0;

    // Validation fires before any file access.
    let result = analyze_scene_file(Path::new("nonexistent_scene.jpg"), &config, None);
    assert!(matches!(result, Err(PipelineError::InvalidParameter { .. })));
}

// ============================================================================
// Synthetic Scene Tests
// ============================================================================

fn blank_scene(rows: i32, cols: i32) -> Mat {
    Mat::zeros(rows, cols, CV_8UC1).unwrap().to_mat().unwrap()
}

fn draw_card_disc(scene: &mut Mat, center: Point, radius: i32) {
    imgproc::circle(
        scene,
        center,
        radius,
        Scalar::all(210.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
}

#[test]
fn test_all_black_scene_has_no_cards() {
    let scene = blank_scene(480, 640);
    let analysis = analyze_scene(&scene, &PipelineConfig::default(), None).unwrap();

    assert_eq!(analysis.cards_found, 0);
    assert!(analysis.pairs.is_empty());
}

#[test]
fn test_single_card_scene_has_no_pairs() {
    let mut scene = blank_scene(500, 500);
    draw_card_disc(&mut scene, Point::new(250, 250), 90);

    let analysis = analyze_scene(&scene, &PipelineConfig::default(), None).unwrap();
    assert_eq!(analysis.cards_found, 1);
    assert!(analysis.pairs.is_empty());
}

#[test]
fn test_two_featureless_cards_share_nothing() {
    // Two plain discs: cards are detected, neither contains symbols, so the
    // single pair resolves to "no shared symbol" without error.
    let mut scene = blank_scene(500, 900);
    draw_card_disc(&mut scene, Point::new(230, 250), 90);
    draw_card_disc(&mut scene, Point::new(650, 250), 90);

    let analysis = analyze_scene(&scene, &PipelineConfig::default(), None).unwrap();
    assert_eq!(analysis.cards_found, 2);
    assert_eq!(analysis.pairs.len(), 1);
    assert_eq!(analysis.pairs[0].card_a, 0);
    assert_eq!(analysis.pairs[0].card_b, 1);
    assert!(analysis.pairs[0].shared.is_none());
}

#[test]
fn test_loaded_scene_is_prescaled_before_detection() {
    // A big scene saved to disk goes through load + prescale + detection
    // without error; the oversized blank area still yields no cards.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big_scene.png");
    let img = image::GrayImage::new(1400, 1000);
    img.save(&path).unwrap();

    let analysis = analyze_scene_file(&path, &PipelineConfig::default(), None).unwrap();
    assert_eq!(analysis.cards_found, 0);
}

#[test]
fn test_verbose_sink_does_not_change_results() {
    let mut scene = blank_scene(500, 500);
    draw_card_disc(&mut scene, Point::new(250, 250), 90);

    let config = PipelineConfig::default();
    let plain = analyze_scene(&scene, &config, None).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = spot_match::DebugSink::new(dir.path()).unwrap();
    let verbose = analyze_scene(&scene, &config, Some(&sink)).unwrap();

    assert_eq!(plain.cards_found, verbose.cards_found);
    assert_eq!(plain.pairs.len(), verbose.pairs.len());
    // The sink produced at least the blurred-scene diagnostic.
    assert!(std::fs::read_dir(dir.path()).unwrap().count() > 0);
}

// ============================================================================
// Scenario Tests with Capture Assets (Ignored Until Assets Created)
// ============================================================================

#[test]
#[ignore] // Enable when capture assets are available
fn test_two_cards_sharing_one_symbol() {
    // Test Requirements:
    // - Image: tests/assets/two_cards_shared.jpg
    // - Content: two Dobble cards sharing exactly one printed symbol
    // - Expected: exactly 2 cards detected; the single pair reports a
    //   shared symbol whose indices point at the common symbol on each card

    let config = PipelineConfig::default();
    let analysis =
        analyze_scene_file(Path::new("tests/assets/two_cards_shared.jpg"), &config, None).unwrap();

    assert_eq!(analysis.cards_found, 2);
    assert_eq!(analysis.pairs.len(), 1);

    let shared = analysis.pairs[0].shared.as_ref().expect("a shared symbol");
    assert!(shared.good_matches >= config.matching.good_matches_min);
}

#[test]
#[ignore] // Enable when capture assets are available
fn test_three_card_scene_reports_all_pairs() {
    // Test Requirements:
    // - Image: tests/assets/three_cards.jpg
    // - Content: three cards, each pair sharing exactly one symbol
    // - Expected: 3 cards, 3 pair results in (0,1), (0,2), (1,2) order,
    //   each with a shared symbol

    let analysis = analyze_scene_file(
        Path::new("tests/assets/three_cards.jpg"),
        &PipelineConfig::default(),
        None,
    )
    .unwrap();

    assert_eq!(analysis.cards_found, 3);
    assert_eq!(analysis.pairs.len(), 3);
    for pair in &analysis.pairs {
        assert!(pair.shared.is_some());
    }
}

#[test]
#[ignore] // Enable when capture assets are available
fn test_partially_occluded_symbol_still_matches() {
    // Test Requirements:
    // - Image: tests/assets/occluded_shared.jpg
    // - Content: two cards whose shared symbol is ~25% occluded on one card
    // - Expected: the pair still reports the shared symbol (descriptor
    //   matching tolerates partial occlusion while enough keypoints remain)

    let analysis = analyze_scene_file(
        Path::new("tests/assets/occluded_shared.jpg"),
        &PipelineConfig::default(),
        None,
    )
    .unwrap();

    assert!(analysis.pairs[0].shared.is_some());
}

// Keep a symbol-bearing synthetic card path exercised end to end: symbols
// are extracted but plain geometric glyphs rarely clear the good-match
// limit, so only the pipeline plumbing is asserted here.
#[test]
fn test_symbol_bearing_cards_compare_without_error() {
    let mut scene = blank_scene(500, 900);
    draw_card_disc(&mut scene, Point::new(230, 250), 90);
    draw_card_disc(&mut scene, Point::new(650, 250), 90);
    // Dark glyphs inside each disc.
    imgproc::rectangle(
        &mut scene,
        Rect::new(200, 220, 40, 25),
        Scalar::all(30.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )
    .unwrap();
    imgproc::circle(
        &mut scene,
        Point::new(660, 260),
        18,
        Scalar::all(40.0),
        imgproc::FILLED,
        imgproc::LINE_8,
        0,
    )
    .unwrap();

    let analysis = analyze_scene(&scene, &PipelineConfig::default(), None).unwrap();
    assert_eq!(analysis.cards_found, 2);
    assert_eq!(analysis.pairs.len(), 1);
}
