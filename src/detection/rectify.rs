//! Canonical card resizing
//!
//! Every detected card is resampled to one shared square dimension before
//! symbol extraction. The symbol-filter thresholds are computed from that
//! dimension, so cards of different scene sizes become directly comparable.

use crate::error::{PipelineError, Result};
use log::debug;
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;

/// Resamples cards to a shared `target_dim x target_dim` square.
pub struct CardRectifier {
    target_dim: i32,
}

impl CardRectifier {
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] for a non-positive target.
    pub fn new(target_dim: i32) -> Result<Self> {
        if target_dim <= 0 {
            return Err(PipelineError::InvalidParameter {
                parameter: "target_dim".to_string(),
                value: target_dim.to_string(),
            });
        }
        Ok(Self { target_dim })
    }

    pub fn target_dim(&self) -> i32 {
        self.target_dim
    }

    /// Resize every card to the canonical square, one output per input.
    ///
    /// Cards are near-circular crops of ~1:1 aspect ratio, so plain bilinear
    /// interpolation without letterboxing is sufficient.
    pub fn uniform_size(&self, cards: &[Mat]) -> Result<Vec<Mat>> {
        debug!(
            "rectifying {} card(s) to {}x{}",
            cards.len(),
            self.target_dim,
            self.target_dim
        );
        cards
            .iter()
            .map(|card| {
                let mut out = Mat::default();
                imgproc::resize(
                    card,
                    &mut out,
                    Size::new(self.target_dim, self.target_dim),
                    0.0,
                    0.0,
                    imgproc::INTER_LINEAR,
                )
                .map_err(|e| PipelineError::opencv("card resize", e))?;
                Ok(out)
            })
            .collect()
    }
}
