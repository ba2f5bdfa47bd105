//! # Spot Match
//!
//! A Rust crate for finding the symbol shared between circular playing cards
//! in a photographed scene (Spot-it / Dobble style decks).
//!
//! The pipeline:
//! - Locates card-shaped circular regions with a Hough circle search
//! - Rectifies every card to one canonical square size
//! - Extracts the printed symbol boundaries inside each card
//! - Compares symbol pairs across cards with rotation- and scale-robust
//!   local feature descriptors, stopping at the first accepted pair
//!
//! ## Example
//!
//! ```rust,no_run
//! use spot_match::{analyze_scene_file, PipelineConfig};
//! use std::path::Path;
//!
//! let config = PipelineConfig::default();
//! let analysis = analyze_scene_file(Path::new("scene.jpg"), &config, None)?;
//! for pair in &analysis.pairs {
//!     match &pair.shared {
//!         Some(s) => println!(
//!             "cards {} and {} share symbol ({}, {})",
//!             pair.card_a, pair.card_b, s.index_a, s.index_b
//!         ),
//!         None => println!("cards {} and {} share nothing", pair.card_a, pair.card_b),
//!     }
//! }
//! # Ok::<(), spot_match::PipelineError>(())
//! ```

use std::path::Path;

use log::info;
use opencv::core::Mat;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod constants;
pub mod debug;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod matching;

pub use config::{CardDetectionConfig, MatchingConfig, ObjectExtractionConfig, PipelineConfig};
pub use debug::DebugSink;
pub use error::{PipelineError, Result};
pub use matching::SharedSymbol;

use detection::{CardLocator, CardRectifier};
use matching::CardComparer;

/// Shared-symbol outcome for one unordered pair of detected cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairResult {
    /// Index of the first card in detection order
    pub card_a: usize,
    /// Index of the second card in detection order
    pub card_b: usize,
    /// The first accepted shared symbol, if any
    pub shared: Option<SharedSymbol>,
}

/// Full result of analyzing one scene image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneAnalysis {
    /// Number of cards detected in the scene
    pub cards_found: usize,
    /// One entry per unordered card pair, in (0,1), (0,2), ... order
    pub pairs: Vec<PairResult>,
}

/// Analyze a grayscale scene image: detect cards, rectify them, and compare
/// every unordered pair for a shared symbol.
///
/// A scene without detectable cards produces an empty analysis, and a pair
/// without a shared symbol produces a `None` entry; neither is an error.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidParameter`] for an inconsistent
/// configuration and [`PipelineError::OpenCvError`] when a vision primitive
/// fails outright.
pub fn analyze_scene(
    scene: &Mat,
    config: &PipelineConfig,
    sink: Option<&DebugSink>,
) -> Result<SceneAnalysis> {
    config.validate()?;

    let locator = CardLocator::new(config.card_detection.clone());
    let cards = locator.detect_cards(scene, sink)?;
    if cards.is_empty() {
        return Ok(SceneAnalysis {
            cards_found: 0,
            pairs: Vec::new(),
        });
    }

    let uni_dim = config.canonical_dim();
    info!("uniform card size: {}x{}", uni_dim, uni_dim);
    let rectifier = CardRectifier::new(uni_dim)?;
    let uniform_cards = rectifier.uniform_size(&cards)?;

    let comparer = CardComparer::with_default_matcher(
        config.object_extraction.clone(),
        config.matching.clone(),
    );

    let mut pairs = Vec::new();
    for p in 0..uniform_cards.len() {
        for q in (p + 1)..uniform_cards.len() {
            let shared = comparer.cards_match(&uniform_cards[p], &uniform_cards[q], sink)?;
            pairs.push(PairResult {
                card_a: p,
                card_b: q,
                shared,
            });
        }
    }

    Ok(SceneAnalysis {
        cards_found: uniform_cards.len(),
        pairs,
    })
}

/// Load a scene image from disk, pre-scale it, and analyze it.
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoadError`] when the file is missing or
/// cannot be decoded, plus everything [`analyze_scene`] can return.
pub fn analyze_scene_file(
    path: &Path,
    config: &PipelineConfig,
    sink: Option<&DebugSink>,
) -> Result<SceneAnalysis> {
    config.validate()?;
    let scene = image_loader::load_grayscale(path)?;
    let scene = image_loader::prescale(&scene, config.prescale_limit)?;
    analyze_scene(&scene, config, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::CV_8UC1;
    use opencv::prelude::*;

    #[test]
    fn test_black_scene_yields_empty_analysis() {
        let scene = Mat::zeros(480, 640, CV_8UC1).unwrap().to_mat().unwrap();
        let analysis = analyze_scene(&scene, &PipelineConfig::default(), None).unwrap();
        assert_eq!(analysis.cards_found, 0);
        assert!(analysis.pairs.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_detection() {
        let scene = Mat::zeros(10, 10, CV_8UC1).unwrap().to_mat().unwrap();
        let mut config = PipelineConfig::default();
        config.card_detection.card_size_min = 0;
        assert!(matches!(
            analyze_scene(&scene, &config, None),
            Err(PipelineError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_pair_result_serialization() {
        let result = PairResult {
            card_a: 0,
            card_b: 2,
            shared: Some(SharedSymbol {
                index_a: 3,
                index_b: 1,
                good_matches: 14,
            }),
        };

        let json = serde_json::to_string(&result).unwrap();
        let restored: PairResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.card_a, 0);
        assert_eq!(restored.card_b, 2);
        assert_eq!(restored.shared.unwrap().good_matches, 14);
    }
}
