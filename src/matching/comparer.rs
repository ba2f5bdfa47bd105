//! Pairwise card comparison with earliest-match short-circuit
//!
//! For a pair of canonical cards: extract both symbol sets, then walk the
//! cross product (outer loop over the first card's symbols, inner loop over
//! the second's) and stop at the FIRST accepted pair. This is deliberately
//! an earliest-acceptable-match policy, not a search for the globally best
//! pair; in a deck where any two cards share exactly one symbol, the first
//! accepted pair is the answer.

use crate::config::{MatchingConfig, ObjectExtractionConfig};
use crate::debug::DebugSink;
use crate::detection::ObjectExtractor;
use crate::error::Result;
use crate::matching::{AkazeFlannMatcher, SymbolMatcher};
use log::{debug, info};
use opencv::core::Mat;
use serde::{Deserialize, Serialize};

/// Indices of a shared symbol on two compared cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSymbol {
    /// Extraction-order index of the symbol on the first card
    pub index_a: usize,
    /// Extraction-order index of the symbol on the second card
    pub index_b: usize,
    /// Good correspondences supporting the match
    pub good_matches: usize,
}

/// Compares two cards symbol by symbol.
pub struct CardComparer {
    extractor: ObjectExtractor,
    matcher: Box<dyn SymbolMatcher>,
}

impl CardComparer {
    pub fn new(extraction: ObjectExtractionConfig, matcher: Box<dyn SymbolMatcher>) -> Self {
        Self {
            extractor: ObjectExtractor::new(extraction),
            matcher,
        }
    }

    /// Comparer with the default AKAZE + FLANN matcher.
    pub fn with_default_matcher(
        extraction: ObjectExtractionConfig,
        matching: MatchingConfig,
    ) -> Self {
        Self::new(extraction, Box::new(AkazeFlannMatcher::new(matching)))
    }

    /// Decide whether two canonical cards share a symbol.
    ///
    /// Returns `Ok(None)` when either card yields no symbols or the full
    /// cross product completes without an accepted pair; both are normal
    /// outcomes. Symbols whose pixel content cannot be materialized are
    /// skipped without aborting the comparison.
    pub fn cards_match(
        &self,
        card_a: &Mat,
        card_b: &Mat,
        sink: Option<&DebugSink>,
    ) -> Result<Option<SharedSymbol>> {
        let contours_a = self.extractor.extract_objects(card_a, sink)?;
        let contours_b = self.extractor.extract_objects(card_b, sink)?;
        if contours_a.is_empty() || contours_b.is_empty() {
            info!(
                "comparison exhausted early: {} vs {} symbol(s)",
                contours_a.len(),
                contours_b.len()
            );
            return Ok(None);
        }

        let (objects_a, indices_a) = self.materialize(card_a, &contours_a);
        let (objects_b, indices_b) = self.materialize(card_b, &contours_b);

        let shared = self.first_shared(&objects_a, &objects_b)?;
        Ok(shared.map(|s| SharedSymbol {
            index_a: indices_a[s.index_a],
            index_b: indices_b[s.index_b],
            good_matches: s.good_matches,
        }))
    }

    /// Walk the cross product in order and return the first accepted pair.
    ///
    /// Indices refer to positions in the given slices. Both loops
    /// short-circuit on acceptance; pairs after the first accepted one are
    /// never evaluated.
    pub fn first_shared(
        &self,
        objects_a: &[Mat],
        objects_b: &[Mat],
    ) -> Result<Option<SharedSymbol>> {
        for (i, object_a) in objects_a.iter().enumerate() {
            for (j, object_b) in objects_b.iter().enumerate() {
                let comparison = self.matcher.compare(object_a, object_b)?;
                if comparison.accepted {
                    info!(
                        "match found between object {} on the first card and object {} on the second card",
                        i, j
                    );
                    return Ok(Some(SharedSymbol {
                        index_a: i,
                        index_b: j,
                        good_matches: comparison.good_matches,
                    }));
                }
            }
        }
        info!("no shared symbol found");
        Ok(None)
    }

    /// Crop each contour's object image, keeping the original indices of
    /// the crops that succeed.
    fn materialize(
        &self,
        card: &Mat,
        contours: &[opencv::core::Vector<opencv::core::Point>],
    ) -> (Vec<Mat>, Vec<usize>) {
        let mut objects = Vec::with_capacity(contours.len());
        let mut indices = Vec::with_capacity(contours.len());
        for (index, contour) in contours.iter().enumerate() {
            match self.extractor.get_object(card, contour) {
                Ok(object) => {
                    objects.push(object);
                    indices.push(index);
                }
                Err(e) => debug!("skipping unmaterializable symbol {}: {}", index, e),
            }
        }
        (objects, indices)
    }
}
