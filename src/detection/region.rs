//! Geometric acceptance predicate shared by card and symbol filtering
//!
//! A candidate boundary is kept only when its area, its distance from a
//! reference center, and its maximum bounding-box dimension all fall inside
//! the configured bounds. The same predicate discriminates real symbol
//! contours from noise specks, oversized background blobs, and card rim
//! traces.

use crate::error::{PipelineError, Result};
use opencv::core::{Point, Rect, Vector};
use opencv::imgproc;

/// Derived geometry of one candidate boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionProperties {
    /// Axis-aligned bounding box of the contour
    pub bounding_box: Rect,
    /// Enclosed contour area in pixels
    pub area: f64,
    /// Center of the bounding box
    pub center: Point,
    /// Larger side of the bounding box
    pub max_dimension: i32,
}

impl RegionProperties {
    /// Compute bounding box, area, center and max dimension for a contour
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OpenCvError`] if the geometry primitives
    /// fail; callers filtering many candidates should skip the offending
    /// contour and continue.
    pub fn from_contour(contour: &Vector<Point>) -> Result<Self> {
        let bounding_box = imgproc::bounding_rect(contour)
            .map_err(|e| PipelineError::opencv("bounding rect", e))?;
        let area = imgproc::contour_area(contour, false)
            .map_err(|e| PipelineError::opencv("contour area", e))?;

        let center = Point::new(
            bounding_box.x + bounding_box.width / 2,
            bounding_box.y + bounding_box.height / 2,
        );
        let max_dimension = bounding_box.width.max(bounding_box.height);

        Ok(Self {
            bounding_box,
            area,
            center,
            max_dimension,
        })
    }
}

/// Pure acceptance predicate over [`RegionProperties`].
///
/// All three criteria must hold; any single failure rejects the candidate.
#[derive(Debug, Clone, Copy)]
pub struct RegionFilter {
    /// Areas at or below this bound are rejected (noise floor)
    pub min_area: f64,
    /// Areas at or above this bound are rejected (background blobs)
    pub max_area: f64,
    /// Bound on both the center distance and the max bounding-box dimension
    pub max_radius: f64,
}

impl RegionFilter {
    pub fn new(min_area: f64, max_area: f64, max_radius: f64) -> Self {
        Self {
            min_area,
            max_area,
            max_radius,
        }
    }

    /// Decide whether a candidate boundary is a plausible region.
    ///
    /// `reference_center` is the center of the frame the candidate lives in
    /// (the canonical card's own center for symbol filtering).
    pub fn accepts(&self, properties: &RegionProperties, reference_center: Point) -> bool {
        // Strict bounds: a candidate sitting exactly on a threshold is out.
        if properties.area <= self.min_area || properties.area >= self.max_area {
            return false;
        }

        let dx = (properties.center.x - reference_center.x) as f64;
        let dy = (properties.center.y - reference_center.y) as f64;
        if dx * dx + dy * dy >= self.max_radius * self.max_radius {
            return false;
        }

        (properties.max_dimension as f64) < self.max_radius
    }
}
