//! Card localization: circle search over the scene image
//!
//! Cards are approximately circular bounded regions. The locator smooths the
//! scene, runs a Hough circle transform restricted to the configured diameter
//! range, and yields one cropped sub-image per detected circle with pixels
//! outside the circle zeroed. Finding no circles is a normal outcome, not an
//! error.

use crate::config::CardDetectionConfig;
use crate::debug::DebugSink;
use crate::error::{PipelineError, Result};
use log::{debug, info};
use opencv::core::{self, Mat, Point, Rect, Scalar, Size, Vec3f, Vector, BORDER_DEFAULT, CV_8UC1};
use opencv::imgproc;
use opencv::prelude::*;

/// Finds card-shaped circular regions in a grayscale scene.
pub struct CardLocator {
    config: CardDetectionConfig,
}

impl CardLocator {
    pub fn new(config: CardDetectionConfig) -> Self {
        Self { config }
    }

    /// Detect all cards in the scene, one masked crop per detected circle.
    ///
    /// Returns an empty `Vec` when no circle reaches the accumulator
    /// threshold. The optional `sink` receives intermediate images; it has
    /// no effect on the detection result.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::OpenCvError`] only when a primitive
    /// operation fails outright.
    pub fn detect_cards(&self, scene: &Mat, sink: Option<&DebugSink>) -> Result<Vec<Mat>> {
        let k = self.config.blur_kernel_size;
        let mut blurred = Mat::default();
        imgproc::blur(
            scene,
            &mut blurred,
            Size::new(k, k),
            Point::new(-1, -1),
            BORDER_DEFAULT,
        )
        .map_err(|e| PipelineError::opencv("scene blur", e))?;

        if let Some(sink) = sink {
            sink.save_image(&blurred, "scene_blurred");
        }

        let mut circles = Vector::<Vec3f>::new();
        imgproc::hough_circles(
            &blurred,
            &mut circles,
            imgproc::HOUGH_GRADIENT,
            self.config.hough_dp,
            self.config.card_size_min as f64,
            self.config.hough_canny_threshold,
            self.config.hough_accumulator_threshold,
            self.config.card_size_min / 2,
            self.config.card_size_max / 2,
        )
        .map_err(|e| PipelineError::opencv("Hough circle transform", e))?;

        if circles.is_empty() {
            info!("no cards found in scene");
            return Ok(Vec::new());
        }

        let mut cards = Vec::with_capacity(circles.len());
        for circle in circles.iter() {
            let cx = circle[0].round() as i32;
            let cy = circle[1].round() as i32;
            let radius = circle[2].round() as i32;
            debug!("card circle at ({}, {}) radius {}", cx, cy, radius);

            match self.crop_masked_card(scene, cx, cy, radius)? {
                Some(card) => {
                    if let Some(sink) = sink {
                        sink.save_image(&card, "card");
                    }
                    cards.push(card);
                }
                None => debug!("circle at ({}, {}) lies outside the scene, skipped", cx, cy),
            }
        }

        info!("detected {} card(s)", cards.len());
        Ok(cards)
    }

    /// Crop the circle's bounding square and zero pixels outside the circle.
    ///
    /// Returns `Ok(None)` when the clamped bounding square is degenerate.
    fn crop_masked_card(
        &self,
        scene: &Mat,
        cx: i32,
        cy: i32,
        radius: i32,
    ) -> Result<Option<Mat>> {
        let x0 = (cx - radius).max(0);
        let y0 = (cy - radius).max(0);
        let x1 = (cx + radius).min(scene.cols());
        let y1 = (cy + radius).min(scene.rows());
        let width = x1 - x0;
        let height = y1 - y0;
        if width <= 0 || height <= 0 {
            return Ok(None);
        }

        let crop = Mat::roi(scene, Rect::new(x0, y0, width, height))
            .map_err(|e| PipelineError::opencv("card crop", e))?
            .try_clone()
            .map_err(|e| PipelineError::opencv("card crop clone", e))?;

        let mut mask = Mat::zeros(height, width, CV_8UC1)
            .map_err(|e| PipelineError::opencv("create card mask", e))?
            .to_mat()
            .map_err(|e| PipelineError::opencv("materialize card mask", e))?;
        imgproc::circle(
            &mut mask,
            Point::new(cx - x0, cy - y0),
            radius,
            Scalar::all(255.0),
            imgproc::FILLED,
            imgproc::LINE_8,
            0,
        )
        .map_err(|e| PipelineError::opencv("draw card mask", e))?;

        let mut card = Mat::default();
        core::bitwise_and(&crop, &crop, &mut card, &mask)
            .map_err(|e| PipelineError::opencv("apply card mask", e))?;
        Ok(Some(card))
    }
}
