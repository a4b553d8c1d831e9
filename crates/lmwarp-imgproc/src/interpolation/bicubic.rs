use super::interpolate::{clamp_index, sample};
use lmwarp_image::Image;

/// Free parameter of the cubic convolution kernel.
///
/// `-0.5` is the only value for which the kernel reproduces quadratics and is the
/// usual choice for image resampling.
const CUBIC_A: f32 = -0.5;

/// Cubic convolution kernel evaluated at distance `t` from a sample.
///
/// Equals 1 at `t = 0` and 0 at every other integer, which makes the
/// interpolant pass through the samples.
#[inline]
fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Weights for the four taps at offsets -1, 0, 1 and 2 from `floor(x)`.
#[inline]
fn cubic_weights(frac: f32) -> [f32; 4] {
    [
        cubic_weight(1.0 + frac),
        cubic_weight(frac),
        cubic_weight(1.0 - frac),
        cubic_weight(2.0 - frac),
    ]
}

/// Kernel for bicubic interpolation
///
/// Separable cubic convolution over the 4x4 neighbourhood around `(u, v)`.
/// Taps falling outside the image replicate the border samples.
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
/// The interpolated pixel value. It may overshoot the sample range near edges.
pub(crate) fn bicubic_interpolation<const C: usize>(
    image: &Image<f32, C>,
    u: f32,
    v: f32,
    c: usize,
) -> f32 {
    let (rows, cols) = (image.rows(), image.cols());

    let u0 = u.floor();
    let v0 = v.floor();

    let wu = cubic_weights(u - u0);
    let wv = cubic_weights(v - v0);

    let (u0, v0) = (u0 as i64, v0 as i64);

    let mut acc = 0.0;
    for (dy, wy) in wv.iter().enumerate() {
        if *wy == 0.0 {
            continue;
        }
        let iv = clamp_index(v0 + dy as i64 - 1, rows);

        let mut row_acc = 0.0;
        for (dx, wx) in wu.iter().enumerate() {
            let iu = clamp_index(u0 + dx as i64 - 1, cols);
            row_acc += wx * sample(image, iv, iu, c);
        }

        acc += wy * row_acc;
    }

    acc
}

#[cfg(test)]
mod tests {
    use super::{bicubic_interpolation, cubic_weight, cubic_weights};
    use approx::assert_relative_eq;
    use lmwarp_image::{Image, ImageError, ImageSize};

    #[test]
    fn kernel_is_interpolating() {
        assert_eq!(cubic_weight(0.0), 1.0);
        assert_eq!(cubic_weight(1.0), 0.0);
        assert_eq!(cubic_weight(-1.0), 0.0);
        assert_eq!(cubic_weight(2.0), 0.0);
        assert_eq!(cubic_weight(2.5), 0.0);
    }

    #[test]
    fn weights_partition_unity() {
        for frac in [0.0f32, 0.1, 0.25, 0.5, 0.9] {
            let sum: f32 = cubic_weights(frac).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn bicubic_exact_at_samples() -> Result<(), ImageError> {
        let data = (0..20).map(|x| (x * x) as f32).collect::<Vec<_>>();
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 5,
                height: 4,
            },
            data.clone(),
        )?;

        for row in 0..4 {
            for col in 0..5 {
                let val = bicubic_interpolation(&image, col as f32, row as f32, 0);
                assert_eq!(val, data[row * 5 + col]);
            }
        }
        Ok(())
    }

    #[test]
    fn bicubic_reproduces_linear_ramp() -> Result<(), ImageError> {
        // interior samples of a ramp are reproduced exactly by the a = -0.5 kernel
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 6,
                height: 1,
            },
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0],
        )?;
        assert_relative_eq!(bicubic_interpolation(&image, 2.5, 0.0, 0), 25.0, epsilon = 1e-4);
        assert_relative_eq!(bicubic_interpolation(&image, 1.25, 0.0, 0), 12.5, epsilon = 1e-4);
        Ok(())
    }

    #[test]
    fn bicubic_constant_image() -> Result<(), ImageError> {
        let image = Image::<f32, 3>::from_size_val([3, 3].into(), 7.0)?;
        for c in 0..3 {
            assert_relative_eq!(bicubic_interpolation(&image, 0.3, 1.7, c), 7.0, epsilon = 1e-5);
            assert_relative_eq!(bicubic_interpolation(&image, -0.4, 2.2, c), 7.0, epsilon = 1e-5);
        }
        Ok(())
    }
}
