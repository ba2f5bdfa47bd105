//! AKAZE + FLANN symbol matcher
//!
//! The default [`SymbolMatcher`]: AKAZE keypoints with float KAZE
//! descriptors, compared through a FLANN nearest-descriptor search. Every
//! descriptor of the second object queries an index built over the first
//! object's descriptors; correspondences under the distance threshold count
//! as good, and the pair is accepted once enough good correspondences exist.
//!
//! The distance threshold is in normalized KAZE descriptor units; switching
//! descriptor families means retuning it.

use crate::config::MatchingConfig;
use crate::error::{PipelineError, Result};
use crate::matching::{SymbolComparison, SymbolMatcher};
use log::debug;
use opencv::core::{DMatch, KeyPoint, Mat, Vector};
use opencv::features2d::{FlannBasedMatcher, AKAZE, AKAZE_DescriptorType};
use opencv::prelude::*;

pub struct AkazeFlannMatcher {
    config: MatchingConfig,
}

impl AkazeFlannMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Detect keypoints and compute KAZE descriptors for one object image.
    fn describe(&self, object: &Mat) -> Result<(Vector<KeyPoint>, Mat)> {
        let mut akaze = AKAZE::create_def()
            .map_err(|e| PipelineError::opencv("create AKAZE detector", e))?;
        // Float KAZE descriptors: compared under L2, which the distance
        // threshold is calibrated for.
        akaze
            .set_descriptor_type(AKAZE_DescriptorType::DESCRIPTOR_KAZE)
            .map_err(|e| PipelineError::opencv("configure AKAZE descriptor type", e))?;

        let mut keypoints = Vector::<KeyPoint>::new();
        let mut descriptors = Mat::default();
        akaze
            .detect_and_compute(
                object,
                &Mat::default(),
                &mut keypoints,
                &mut descriptors,
                false,
            )
            .map_err(|e| PipelineError::opencv("AKAZE detect and compute", e))?;
        Ok((keypoints, descriptors))
    }
}

impl SymbolMatcher for AkazeFlannMatcher {
    fn compare(&self, a: &Mat, b: &Mat) -> Result<SymbolComparison> {
        let (keypoints_a, descriptors_a) = self.describe(a)?;
        let (keypoints_b, descriptors_b) = self.describe(b)?;
        debug!(
            "keypoints: {} vs {}",
            keypoints_a.len(),
            keypoints_b.len()
        );

        // A degenerate object (too small or featureless) is a rejected
        // candidate, never an error.
        if descriptors_a.empty() || descriptors_b.empty() {
            return Ok(SymbolComparison::rejected());
        }

        // Fresh index per comparison; never shared across comparisons.
        let matcher = FlannBasedMatcher::create()
            .map_err(|e| PipelineError::opencv("create FLANN matcher", e))?;
        let mut matched = Vector::<DMatch>::new();
        matcher
            .train_match(&descriptors_b, &descriptors_a, &mut matched, &Mat::default())
            .map_err(|e| PipelineError::opencv("FLANN descriptor match", e))?;

        let mut distances: Vec<f32> = matched.iter().map(|m| m.distance).collect();
        distances.sort_by(|x, y| x.total_cmp(y));
        if let (Some(first), Some(last)) = (distances.first(), distances.last()) {
            debug!("match distances: min {:.4}, max {:.4}", first, last);
        }

        let good_matches = distances
            .iter()
            .filter(|d| **d < self.config.good_distance)
            .count();
        debug!("good matched keypoints count: {}", good_matches);

        Ok(SymbolComparison {
            good_matches,
            accepted: good_matches >= self.config.good_matches_min,
        })
    }
}
