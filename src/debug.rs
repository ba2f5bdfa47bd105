//! Diagnostic image sink for verbose mode
//!
//! A side channel only: intermediate images and contour overlays are written
//! to a directory for human inspection and never feed back into detection or
//! matching results. Write failures are logged and swallowed so diagnostics
//! can never break a run.

use crate::error::{PipelineError, Result};
use log::warn;
use opencv::core::{Mat, Point, Scalar, Vector};
use opencv::prelude::*;
use opencv::{imgcodecs, imgproc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes intermediate pipeline images into an output directory.
pub struct DebugSink {
    output_dir: PathBuf,
    counter: AtomicUsize,
}

impl DebugSink {
    /// Create a sink rooted at `output_dir`, creating the directory if needed
    pub fn new(output_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            PipelineError::processing(format!(
                "cannot create debug directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            counter: AtomicUsize::new(0),
        })
    }

    /// Save an intermediate image under a sequence-numbered label
    pub fn save_image(&self, image: &Mat, label: &str) {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let path = self.output_dir.join(format!("{:03}_{}.png", seq, label));
        let path_str = match path.to_str() {
            Some(s) => s,
            None => {
                warn!("debug path is not valid UTF-8, skipping '{}'", label);
                return;
            }
        };
        match imgcodecs::imwrite(path_str, image, &Vector::new()) {
            Ok(_) => {}
            Err(e) => warn!("failed to save debug image '{}': {}", label, e),
        }
    }

    /// Save an image with the given contours drawn over it
    pub fn save_contours(&self, image: &Mat, contours: &Vector<Vector<Point>>, label: &str) {
        let mut canvas = match image.try_clone() {
            Ok(m) => m,
            Err(e) => {
                warn!("failed to clone image for debug overlay '{}': {}", label, e);
                return;
            }
        };
        for i in 0..contours.len() {
            if let Err(e) = imgproc::draw_contours(
                &mut canvas,
                contours,
                i as i32,
                Scalar::all(255.0),
                1,
                imgproc::LINE_8,
                &Mat::default(),
                i32::MAX,
                Point::new(0, 0),
            ) {
                warn!("failed to draw debug contour {}: {}", i, e);
            }
        }
        self.save_image(&canvas, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::CV_8UC1;

    #[test]
    fn test_sink_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DebugSink::new(dir.path()).unwrap();

        let mat = Mat::zeros(10, 10, CV_8UC1).unwrap().to_mat().unwrap();
        sink.save_image(&mat, "blurred");
        sink.save_image(&mat, "edges");

        assert!(dir.path().join("000_blurred.png").exists());
        assert!(dir.path().join("001_edges.png").exists());
    }
}
