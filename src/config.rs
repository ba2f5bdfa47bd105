//! Configuration structures for the spot_match pipeline.
//!
//! This module defines all tunable parameters for card detection, symbol
//! extraction, and descriptor matching, organized into logical groups.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use spot_match::PipelineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), spot_match::PipelineError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`CardDetectionConfig`]: circle transform and card size bounds
//! - [`ObjectExtractionConfig`]: edge detection and symbol filtering
//! - [`MatchingConfig`]: descriptor distance and acceptance thresholds

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::error::{PipelineError, Result};

/// Complete pipeline configuration.
///
/// Contains all parameters needed to go from a scene image to a shared-symbol
/// decision. Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Card localization configuration
    pub card_detection: CardDetectionConfig,

    /// Symbol extraction configuration
    pub object_extraction: ObjectExtractionConfig,

    /// Descriptor matching configuration
    pub matching: MatchingConfig,

    /// Largest scene side processed without downscaling
    #[serde(default = "default_prescale_limit")]
    pub prescale_limit: i32,
}

fn default_prescale_limit() -> i32 {
    constants::processing::PRESCALE_LIMIT
}

/// Card localization parameters.
///
/// Controls the smoothing and Hough circle transform used to find
/// card-shaped regions in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetectionConfig {
    /// Smallest accepted card diameter in scene pixels
    pub card_size_min: i32,

    /// Largest accepted card diameter in scene pixels
    pub card_size_max: i32,

    /// Box blur kernel side applied before circle detection
    pub blur_kernel_size: i32,

    /// Inverse accumulator resolution ratio of the circle transform
    pub hough_dp: f64,

    /// Upper Canny threshold used internally by the circle transform
    pub hough_canny_threshold: f64,

    /// Accumulator votes required to accept a circle
    pub hough_accumulator_threshold: f64,
}

/// Symbol extraction parameters.
///
/// These thresholds were tuned against the default canonical card size
/// (`canonical_dim()` = 250 with default card size bounds). Substantially
/// different card size bounds will require retuning them; no
/// resolution-independent scaling rule is assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectExtractionConfig {
    /// Canny low gradient threshold
    pub canny_low_threshold: f64,

    /// Canny high gradient threshold
    pub canny_high_threshold: f64,

    /// Side of the elliptical closing kernel (must be odd)
    pub morph_kernel_size: i32,

    /// Noise floor: contours with area <= this are rejected
    pub min_object_area: f64,

    /// Coefficient of `PI * side^2` bounding a single symbol's area
    pub max_area_coeff: f64,

    /// Fraction of the card side delimiting the printable interior
    pub roi_radius_coeff: f64,
}

/// Descriptor matching parameters.
///
/// Distance units are those of the configured descriptor family; the
/// defaults apply to float KAZE descriptors compared under L2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Maximum descriptor distance for a correspondence to count as good
    pub good_distance: f32,

    /// Good correspondences required to accept a symbol pair
    pub good_matches_min: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            card_detection: CardDetectionConfig::default(),
            object_extraction: ObjectExtractionConfig::default(),
            matching: MatchingConfig::default(),
            prescale_limit: constants::processing::PRESCALE_LIMIT,
        }
    }
}

impl Default for CardDetectionConfig {
    fn default() -> Self {
        Self {
            card_size_min: constants::detection::CARD_SIZE_MIN,
            card_size_max: constants::detection::CARD_SIZE_MAX,
            blur_kernel_size: constants::detection::BLUR_KERNEL_SIZE,
            hough_dp: constants::detection::HOUGH_DP,
            hough_canny_threshold: constants::detection::HOUGH_CANNY_THRESHOLD,
            hough_accumulator_threshold: constants::detection::HOUGH_ACCUMULATOR_THRESHOLD,
        }
    }
}

impl Default for ObjectExtractionConfig {
    fn default() -> Self {
        Self {
            canny_low_threshold: constants::extraction::CANNY_LOW_THRESHOLD,
            canny_high_threshold: constants::extraction::CANNY_HIGH_THRESHOLD,
            morph_kernel_size: constants::extraction::MORPH_KERNEL_SIZE,
            min_object_area: constants::extraction::MIN_OBJECT_AREA,
            max_area_coeff: constants::extraction::MAX_AREA_COEFF,
            roi_radius_coeff: constants::extraction::ROI_RADIUS_COEFF,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            good_distance: constants::matching::GOOD_DISTANCE,
            good_matches_min: constants::matching::GOOD_MATCHES_MIN,
        }
    }
}

impl PipelineConfig {
    /// Shared canonical card side: every detected card is resampled to this
    /// square dimension before symbol extraction, so that the extraction
    /// thresholds are comparable across cards.
    pub fn canonical_dim(&self) -> i32 {
        (self.card_detection.card_size_min + self.card_detection.card_size_max) / 2
    }

    /// Check internal consistency of all parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] naming the first
    /// offending value.
    pub fn validate(&self) -> Result<()> {
        let d = &self.card_detection;
        if d.card_size_min <= 0 {
            return Err(invalid("card_size_min", d.card_size_min));
        }
        if d.card_size_min >= d.card_size_max {
            return Err(invalid("card_size_max", d.card_size_max));
        }
        if d.blur_kernel_size <= 0 {
            return Err(invalid("blur_kernel_size", d.blur_kernel_size));
        }
        if d.hough_dp <= 0.0 {
            return Err(invalid("hough_dp", d.hough_dp));
        }

        let e = &self.object_extraction;
        if e.canny_low_threshold >= e.canny_high_threshold {
            return Err(invalid("canny_low_threshold", e.canny_low_threshold));
        }
        if e.morph_kernel_size <= 0 || e.morph_kernel_size % 2 == 0 {
            return Err(invalid("morph_kernel_size", e.morph_kernel_size));
        }
        if e.min_object_area < 0.0 {
            return Err(invalid("min_object_area", e.min_object_area));
        }
        if e.max_area_coeff <= 0.0 {
            return Err(invalid("max_area_coeff", e.max_area_coeff));
        }
        if e.roi_radius_coeff <= 0.0 || e.roi_radius_coeff > 0.5 {
            return Err(invalid("roi_radius_coeff", e.roi_radius_coeff));
        }

        let m = &self.matching;
        if m.good_distance <= 0.0 {
            return Err(invalid("good_distance", m.good_distance));
        }
        if m.good_matches_min == 0 {
            return Err(invalid("good_matches_min", m.good_matches_min));
        }

        if self.prescale_limit <= 0 {
            return Err(invalid("prescale_limit", self.prescale_limit));
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::config(format!("cannot read {}", path.display()), e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PipelineError::config(format!("cannot parse {}", path.display()), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PipelineError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json)
            .map_err(|e| PipelineError::config(format!("cannot write {}", path.display()), e))?;
        Ok(())
    }
}

fn invalid(parameter: &str, value: impl std::fmt::Display) -> PipelineError {
    PipelineError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
    }
}
