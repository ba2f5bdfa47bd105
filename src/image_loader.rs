//! Grayscale image loading for the card matching pipeline
//!
//! The pipeline operates on single-channel intensity rasters. This module
//! decodes an image file with the `image` crate, collapses it to luma, and
//! hands it to OpenCV as a `CV_8UC1` Mat. A missing or undecodable file is a
//! load error, never an empty image.

use crate::error::{PipelineError, Result};
use opencv::core::{Mat, Size, CV_8UC1};
use opencv::imgproc;
use opencv::prelude::*;
use std::path::Path;

/// File extensions the scene scanner accepts
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

/// Check if a file extension belongs to a supported raster format
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
}

/// Load an image from disk as a single-channel grayscale Mat
///
/// # Errors
///
/// Returns [`PipelineError::ImageLoadError`] if the file cannot be opened,
/// its format is not supported, or decoding fails.
pub fn load_grayscale(path: &Path) -> Result<Mat> {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .map(is_supported_extension)
        .unwrap_or(false);
    if !ext_ok {
        return Err(PipelineError::ImageLoadError {
            message: format!("unsupported image format: {}", path.display()),
            source: None,
        });
    }

    let reader = image::ImageReader::open(path).map_err(|e| {
        PipelineError::image_load(format!("failed to open image file: {}", path.display()), e)
    })?;
    let img = reader.decode().map_err(|e| {
        PipelineError::image_load(format!("failed to decode image: {}", path.display()), e)
    })?;

    let luma = img.to_luma8();
    let (width, height) = luma.dimensions();
    gray_to_mat(luma.as_raw(), width as i32, height as i32)
}

/// Downscale a scene so its larger side does not exceed `limit`
///
/// Images already within the limit are returned unchanged (cloned). The
/// aspect ratio is preserved.
pub fn prescale(image: &Mat, limit: i32) -> Result<Mat> {
    let dim = image.rows().max(image.cols());
    if dim <= limit {
        return image
            .try_clone()
            .map_err(|e| PipelineError::opencv("clone scene image", e));
    }

    let factor = limit as f64 / dim as f64;
    let mut out = Mat::default();
    imgproc::resize(
        image,
        &mut out,
        Size::new(0, 0),
        factor,
        factor,
        imgproc::INTER_LINEAR,
    )
    .map_err(|e| PipelineError::opencv("prescale resize", e))?;
    Ok(out)
}

/// Convert a luma byte buffer to a `CV_8UC1` Mat
fn gray_to_mat(gray_data: &[u8], width: i32, height: i32) -> Result<Mat> {
    if gray_data.len() != (width * height) as usize {
        return Err(PipelineError::processing(format!(
            "luma buffer size {} does not match {}x{}",
            gray_data.len(),
            width,
            height
        )));
    }

    let mut mat = Mat::zeros(height, width, CV_8UC1)
        .map_err(|e| PipelineError::opencv("create Mat", e))?
        .to_mat()
        .map_err(|e| PipelineError::opencv("materialize Mat", e))?;

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            let pixel = mat
                .at_2d_mut::<u8>(y, x)
                .map_err(|e| PipelineError::opencv("access pixel", e))?;
            *pixel = gray_data[idx];
        }
    }

    Ok(mat)
}
