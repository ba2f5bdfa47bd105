//! Symbol extraction from canonical cards
//!
//! Finds the closed boundaries of the printed symbols inside one canonical
//! card: edge map, morphological closing to bridge broken outlines, contour
//! extraction with full point detail, then geometric filtering against the
//! card's own center and size. Thresholds are derived from the canonical
//! side length, so they are comparable across cards.

use crate::config::ObjectExtractionConfig;
use crate::debug::DebugSink;
use crate::detection::region::{RegionFilter, RegionProperties};
use crate::error::{PipelineError, Result};
use log::debug;
use opencv::core::{Mat, Point, Rect, Size, Vector, BORDER_CONSTANT};
use opencv::imgproc;
use opencv::prelude::*;
use std::f64::consts::PI;

/// Extracts symbol boundaries from a canonical card image.
pub struct ObjectExtractor {
    config: ObjectExtractionConfig,
}

impl ObjectExtractor {
    pub fn new(config: ObjectExtractionConfig) -> Self {
        Self { config }
    }

    /// Find the accepted symbol boundaries of a canonical card.
    ///
    /// Boundaries are returned in extraction order; downstream matching is
    /// exhaustive pairwise so no canonical ordering is imposed. An edge map
    /// without closed boundaries yields an empty `Vec`.
    ///
    /// Candidates whose geometry cannot be computed are skipped, not fatal.
    pub fn extract_objects(
        &self,
        card: &Mat,
        sink: Option<&DebugSink>,
    ) -> Result<Vec<Vector<Point>>> {
        let gray = self.to_single_channel(card)?;

        let mut edges = Mat::default();
        imgproc::canny(
            &gray,
            &mut edges,
            self.config.canny_low_threshold,
            self.config.canny_high_threshold,
            3,
            false,
        )
        .map_err(|e| PipelineError::opencv("symbol edge detection", e))?;

        let k = self.config.morph_kernel_size;
        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_ELLIPSE,
            Size::new(k, k),
            Point::new(-1, -1),
        )
        .map_err(|e| PipelineError::opencv("closing kernel", e))?;

        let mut closed = Mat::default();
        imgproc::morphology_ex(
            &edges,
            &mut closed,
            imgproc::MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            opencv::core::Scalar::default(),
        )
        .map_err(|e| PipelineError::opencv("edge closing", e))?;

        if let Some(sink) = sink {
            sink.save_image(&edges, "card_edges");
            sink.save_image(&closed, "card_edges_closed");
        }

        let mut contours = Vector::<Vector<Point>>::new();
        imgproc::find_contours(
            &closed,
            &mut contours,
            imgproc::RETR_LIST,
            imgproc::CHAIN_APPROX_NONE,
            Point::new(0, 0),
        )
        .map_err(|e| PipelineError::opencv("contour extraction", e))?;

        let side = gray.cols().min(gray.rows()) as f64;
        let filter = RegionFilter::new(
            self.config.min_object_area,
            self.config.max_area_coeff * PI * side * side,
            self.config.roi_radius_coeff * side,
        );
        let card_center = Point::new(gray.cols() / 2, gray.rows() / 2);

        let mut accepted = Vec::new();
        for contour in contours.iter() {
            let properties = match RegionProperties::from_contour(&contour) {
                Ok(p) => p,
                Err(e) => {
                    debug!("skipping degenerate symbol candidate: {}", e);
                    continue;
                }
            };
            if filter.accepts(&properties, card_center) {
                accepted.push(contour);
            }
        }
        debug!(
            "accepted {} of {} symbol candidate(s)",
            accepted.len(),
            contours.len()
        );

        if let Some(sink) = sink {
            let overlay: Vector<Vector<Point>> = accepted.iter().cloned().collect();
            sink.save_contours(&gray, &overlay, "card_symbols");
        }

        Ok(accepted)
    }

    /// Materialize the cropped pixel content of one symbol boundary.
    pub fn get_object(&self, card: &Mat, contour: &Vector<Point>) -> Result<Mat> {
        let bounds = imgproc::bounding_rect(contour)
            .map_err(|e| PipelineError::opencv("symbol bounding rect", e))?;
        let clamped = clamp_rect(bounds, card.cols(), card.rows());
        if clamped.width <= 0 || clamped.height <= 0 {
            return Err(PipelineError::processing(
                "symbol boundary lies outside its card",
            ));
        }
        Mat::roi(card, clamped)
            .map_err(|e| PipelineError::opencv("symbol crop", e))?
            .try_clone()
            .map_err(|e| PipelineError::opencv("symbol crop clone", e))
    }

    fn to_single_channel(&self, card: &Mat) -> Result<Mat> {
        if card.channels() == 1 {
            return card
                .try_clone()
                .map_err(|e| PipelineError::opencv("clone card", e));
        }
        let mut gray = Mat::default();
        imgproc::cvt_color(
            card,
            &mut gray,
            imgproc::COLOR_BGR2GRAY,
            0,
        )
        .map_err(|e| PipelineError::opencv("grayscale conversion", e))?;
        Ok(gray)
    }
}

fn clamp_rect(rect: Rect, max_width: i32, max_height: i32) -> Rect {
    let x = rect.x.max(0);
    let y = rect.y.max(0);
    let width = (rect.x + rect.width).min(max_width) - x;
    let height = (rect.y + rect.height).min(max_height) - y;
    Rect::new(x, y, width, height)
}
