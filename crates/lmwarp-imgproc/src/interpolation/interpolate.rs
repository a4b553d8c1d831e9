use super::bicubic::bicubic_interpolation;
use super::bilinear::bilinear_interpolation;
use super::nearest::nearest_neighbor_interpolation;
use lmwarp_image::Image;
use serde::{Deserialize, Serialize};

/// Interpolation mode used when sampling the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Bicubic (cubic convolution) interpolation
    #[default]
    Bicubic,
    /// Bilinear interpolation
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image container with shape (height, width, C).
/// * `u` - The x coordinate (column) of the pixel to interpolate.
/// * `v` - The y coordinate (row) of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
///
/// # Returns
///
/// The interpolated pixel value.
pub fn interpolate_pixel<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
    interpolation: InterpolationMode,
) -> f32 {
    match interpolation {
        InterpolationMode::Bicubic => bicubic_interpolation(image, u, v, c),
        InterpolationMode::Bilinear => bilinear_interpolation(image, u, v, c),
        InterpolationMode::Nearest => nearest_neighbor_interpolation(image, u, v, c),
    }
}

/// Clamp a signed sample index into `[0, len)`.
#[inline]
pub(crate) fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Read one channel of the pixel at (row, col).
#[inline]
pub(crate) fn sample<const C: usize>(image: &Image<f32, C>, row: usize, col: usize, c: usize) -> f32 {
    image.as_slice()[(row * image.cols() + col) * C + c]
}
