use super::interpolate::{clamp_index, sample};
use lmwarp_image::Image;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let u0 = u.floor();
    let v0 = v.floor();

    let frac_u = u - u0;
    let frac_v = v - v0;

    let iu0 = clamp_index(u0 as i64, cols);
    let iv0 = clamp_index(v0 as i64, rows);
    let iu1 = clamp_index(u0 as i64 + 1, cols);
    let iv1 = clamp_index(v0 as i64 + 1, rows);

    let p00 = sample(image, iv0, iu0, c);
    let p01 = sample(image, iv0, iu1, c);
    let p10 = sample(image, iv1, iu0, c);
    let p11 = sample(image, iv1, iu1, c);

    let top = p00 + frac_u * (p01 - p00);
    let bottom = p10 + frac_u * (p11 - p10);

    top + frac_v * (bottom - top)
}
