//! Default tuning values for the card matching pipeline
//!
//! These are the baseline parameters the configuration structures start
//! from. Everything here can be overridden through [`crate::PipelineConfig`];
//! the extraction thresholds in particular were tuned against the default
//! canonical card size and need retuning when the card size bounds change.

/// Card localization parameters
pub mod detection {
    /// Smallest accepted card diameter, in scene pixels
    pub const CARD_SIZE_MIN: i32 = 100;

    /// Largest accepted card diameter, in scene pixels
    pub const CARD_SIZE_MAX: i32 = 400;

    /// Box blur kernel side applied before the circle transform
    pub const BLUR_KERNEL_SIZE: i32 = 3;

    /// Inverse accumulator resolution ratio for the Hough circle transform
    pub const HOUGH_DP: f64 = 1.0;

    /// Upper Canny threshold used internally by the circle transform
    pub const HOUGH_CANNY_THRESHOLD: f64 = 150.0;

    /// Accumulator votes required to accept a circle
    pub const HOUGH_ACCUMULATOR_THRESHOLD: f64 = 70.0;
}

/// Symbol extraction parameters
///
/// Tuned for canonical cards of `(CARD_SIZE_MIN + CARD_SIZE_MAX) / 2` pixels
/// per side (250 with the defaults above).
pub mod extraction {
    /// Canny low gradient threshold
    pub const CANNY_LOW_THRESHOLD: f64 = 20.0;

    /// Canny high gradient threshold
    pub const CANNY_HIGH_THRESHOLD: f64 = 150.0;

    /// Side of the elliptical closing kernel that bridges broken outlines
    pub const MORPH_KERNEL_SIZE: i32 = 3;

    /// Noise floor: contours with area <= this are rejected
    pub const MIN_OBJECT_AREA: f64 = 16.0;

    /// Coefficient of `PI * side^2` bounding a single symbol's area
    pub const MAX_AREA_COEFF: f64 = 0.25;

    /// Fraction of the card side delimiting the printable interior
    pub const ROI_RADIUS_COEFF: f64 = 0.45;
}

/// Descriptor matching parameters
pub mod matching {
    /// Maximum descriptor distance for a correspondence to count as good
    pub const GOOD_DISTANCE: f32 = 0.30;

    /// Good correspondences required to accept a symbol pair
    pub const GOOD_MATCHES_MIN: usize = 10;
}

/// Scene pre-scaling parameters
pub mod processing {
    /// Largest scene side processed without downscaling
    pub const PRESCALE_LIMIT: i32 = 700;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_size_bounds_ordered() {
        assert!(detection::CARD_SIZE_MIN < detection::CARD_SIZE_MAX);
        assert!(detection::CARD_SIZE_MIN > 0);
    }

    #[test]
    fn test_extraction_thresholds_consistent() {
        assert!(extraction::CANNY_LOW_THRESHOLD < extraction::CANNY_HIGH_THRESHOLD);
        assert!(extraction::MAX_AREA_COEFF > 0.0 && extraction::MAX_AREA_COEFF <= 1.0);
        assert!(extraction::ROI_RADIUS_COEFF > 0.0 && extraction::ROI_RADIUS_COEFF < 0.5);
        assert!(extraction::MIN_OBJECT_AREA > 0.0);
    }

    #[test]
    fn test_matching_thresholds() {
        assert!(matching::GOOD_DISTANCE > 0.0);
        assert!(matching::GOOD_MATCHES_MIN > 0);
    }
}
