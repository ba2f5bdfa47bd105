//! Symbol comparison module
//!
//! Decides whether two cards share a printed symbol. The descriptor family
//! is a pluggable capability behind [`SymbolMatcher`]; the pipeline only
//! relies on "given two object images, return a confidence and an accept
//! decision", so alternative detectors can be swapped in without touching
//! the pairwise orchestration.

pub mod akaze;
pub mod comparer;

pub use akaze::AkazeFlannMatcher;
pub use comparer::{CardComparer, SharedSymbol};

use crate::error::Result;
use opencv::core::Mat;

/// Outcome of comparing two object images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolComparison {
    /// Number of keypoint correspondences below the distance threshold
    pub good_matches: usize,
    /// Whether the good-match count reached the acceptance limit
    pub accepted: bool,
}

impl SymbolComparison {
    /// A comparison that found nothing, used for degenerate candidates
    /// (e.g. an object too featureless to produce descriptors).
    pub fn rejected() -> Self {
        Self {
            good_matches: 0,
            accepted: false,
        }
    }
}

/// A strategy deciding whether two object images show the same symbol.
///
/// Implementations must be robust to in-plane rotation and moderate scale
/// change between the two images.
pub trait SymbolMatcher {
    /// Compare two object images.
    ///
    /// A featureless image on either side yields a rejected comparison,
    /// not an error.
    fn compare(&self, a: &Mat, b: &Mat) -> Result<SymbolComparison>;
}
