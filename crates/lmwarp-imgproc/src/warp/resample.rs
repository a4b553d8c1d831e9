use lmwarp_image::{Image, ImageSize};
use serde::{Deserialize, Serialize};

use super::error::WarpError;
use super::field::MappingField;
use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel::{self, ExecutionStrategy};

/// Handling of output pixels whose source coordinate lies outside the source raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfHullPolicy {
    /// Clamp the coordinate to the nearest point of the raster, then interpolate.
    #[default]
    Clamp,
    /// Write the given value to every channel.
    Fill(u8),
    /// Abort the warp with [`WarpError::OutOfHull`].
    Reject,
}

/// Distance beyond the raster border still treated as inside.
const HULL_TOLERANCE: f64 = 1e-6;

/// Rectangle spanned by the sample points of a raster.
#[derive(Debug, Clone, Copy)]
struct Hull {
    max_row: f64,
    max_col: f64,
}

impl Hull {
    fn new(size: ImageSize) -> Self {
        Self {
            max_row: (size.height - 1) as f64,
            max_col: (size.width - 1) as f64,
        }
    }

    // NaN coordinates are never inside
    fn contains(&self, p: [f64; 2]) -> bool {
        let within = |v: f64, max: f64| (-HULL_TOLERANCE..=max + HULL_TOLERANCE).contains(&v);
        within(p[0], self.max_row) && within(p[1], self.max_col)
    }

    fn clamp(&self, p: [f64; 2]) -> [f64; 2] {
        let clamp = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        [clamp(p[0], self.max_row), clamp(p[1], self.max_col)]
    }
}

/// Resample the source image through a mapping field.
///
/// Every output pixel `(row, col)` takes the source value interpolated at
/// `field[row][col]`. Channels are interpolated independently, then rounded and
/// clamped to `[0, 255]`.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `field` - The lookup field; its size is the output size.
/// * `interpolation` - The interpolation mode to use.
/// * `out_of_hull` - Policy for coordinates outside the source raster.
/// * `strategy` - How rows are scheduled.
///
/// # Errors
///
/// * [`WarpError::EmptyImage`] if the source image has no pixels.
/// * [`WarpError::OutOfHull`] for the first offending pixel, in row-major order,
///   when the policy is [`OutOfHullPolicy::Reject`].
pub fn backward_warp<const C: usize>(
    src: &Image<u8, C>,
    field: &MappingField,
    interpolation: InterpolationMode,
    out_of_hull: OutOfHullPolicy,
    strategy: ExecutionStrategy,
) -> Result<Image<u8, C>, WarpError> {
    if src.size().is_empty() {
        return Err(WarpError::EmptyImage("source"));
    }

    let dst_size = field.size();
    if dst_size.is_empty() {
        return Err(WarpError::EmptyImage("reference"));
    }

    let hull = Hull::new(src.size());

    let outside = field.as_slice().iter().filter(|p| !hull.contains(**p)).count();
    if outside > 0 {
        match out_of_hull {
            OutOfHullPolicy::Reject => {
                let idx = field
                    .as_slice()
                    .iter()
                    .position(|p| !hull.contains(*p))
                    .unwrap_or_default();
                return Err(WarpError::OutOfHull {
                    row: idx / dst_size.width,
                    col: idx % dst_size.width,
                });
            }
            policy => log::warn!(
                "{outside} of {} output pixels map outside the source image, applying {policy:?}",
                dst_size.area()
            ),
        }
    }

    let src_f32 = src.cast::<f32>()?;

    let mut data = vec![0u8; dst_size.area() * C];
    parallel::for_each_row(&mut data, dst_size.width * C, strategy, |row, dst_row| {
        dst_row
            .chunks_exact_mut(C)
            .enumerate()
            .for_each(|(col, dst_pixel)| {
                let p = field.as_slice()[row * dst_size.width + col];
                let p = if hull.contains(p) {
                    hull.clamp(p)
                } else if let OutOfHullPolicy::Fill(val) = out_of_hull {
                    dst_pixel.fill(val);
                    return;
                } else {
                    hull.clamp(p)
                };

                dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
                    let val = interpolate_pixel(&src_f32, p[1] as f32, p[0] as f32, c, interpolation);
                    *pixel = val.round().clamp(0.0, 255.0) as u8;
                });
            });
    })?;

    Ok(Image::new(dst_size, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmwarp_image::ImageSize;

    fn gradient_image() -> Result<Image<u8, 3>, WarpError> {
        let size = ImageSize {
            width: 4,
            height: 3,
        };
        let data = (0..size.area())
            .flat_map(|i| [(i * 20) as u8, (255 - i * 20) as u8, 128])
            .collect();
        Ok(Image::new(size, data)?)
    }

    fn identity_field(size: ImageSize) -> Result<MappingField, WarpError> {
        let coords = (0..size.height)
            .flat_map(|r| (0..size.width).map(move |c| [r as f64, c as f64]))
            .collect();
        MappingField::from_vec(size, coords)
    }

    #[test]
    fn identity_field_reproduces_source() -> Result<(), WarpError> {
        let src = gradient_image()?;
        let field = identity_field(src.size())?;
        for mode in [
            InterpolationMode::Bicubic,
            InterpolationMode::Bilinear,
            InterpolationMode::Nearest,
        ] {
            let dst = backward_warp(
                &src,
                &field,
                mode,
                OutOfHullPolicy::Reject,
                ExecutionStrategy::Serial,
            )?;
            assert_eq!(dst, src);
        }
        Ok(())
    }

    #[test]
    fn output_takes_field_size() -> Result<(), WarpError> {
        let src = gradient_image()?;
        let size = ImageSize {
            width: 7,
            height: 5,
        };
        let coords = vec![[1.3, 2.7]; size.area()];
        let field = MappingField::from_vec(size, coords)?;
        let dst = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Clamp,
            ExecutionStrategy::ParallelRows,
        )?;
        assert_eq!(dst.size(), size);
        assert_eq!(dst.as_slice().len(), size.area() * 3);
        Ok(())
    }

    #[test]
    fn out_of_hull_policies() -> Result<(), WarpError> {
        let src = gradient_image()?;
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let field = MappingField::from_vec(
            size,
            vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [-3.0, 10.0]],
        )?;

        let clamped = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Clamp,
            ExecutionStrategy::Serial,
        )?;
        // (-3, 10) clamps to the top right corner (0, 3)
        assert_eq!(clamped.get([1, 1, 0]), src.get([0, 3, 0]));
        assert_eq!(clamped.get([1, 1, 1]), src.get([0, 3, 1]));

        let filled = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Fill(7),
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(&filled.as_slice()[9..12], &[7, 7, 7]);
        assert_eq!(filled.get([0, 1, 0]), src.get([0, 1, 0]));

        let rejected = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Reject,
            ExecutionStrategy::Serial,
        );
        assert_eq!(rejected, Err(WarpError::OutOfHull { row: 1, col: 1 }));
        Ok(())
    }

    #[test]
    fn border_noise_stays_inside() -> Result<(), WarpError> {
        let src = gradient_image()?;
        let field = MappingField::from_vec(
            [2, 1].into(),
            vec![[-1e-12, -7e-15], [2.0 + 1e-12, 3.0 + 5e-13]],
        )?;
        for policy in [OutOfHullPolicy::Reject, OutOfHullPolicy::Fill(7)] {
            let dst = backward_warp(
                &src,
                &field,
                InterpolationMode::Bicubic,
                policy,
                ExecutionStrategy::Serial,
            )?;
            assert_eq!(dst.get([0, 0, 1]), src.get([0, 0, 1]));
            assert_eq!(dst.get([0, 1, 0]), src.get([2, 3, 0]));
        }

        let field = MappingField::from_vec([1, 1].into(), vec![[-1e-3, 0.0]])?;
        let res = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Reject,
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(WarpError::OutOfHull { row: 0, col: 0 }));
        Ok(())
    }

    #[test]
    fn nan_coordinates_are_handled() -> Result<(), WarpError> {
        let src = gradient_image()?;
        let field = MappingField::from_vec([1, 1].into(), vec![[f64::NAN, f64::NAN]])?;
        let dst = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Clamp,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(dst.get([0, 0, 0]), src.get([0, 0, 0]));
        Ok(())
    }

    #[test]
    fn empty_source_is_rejected() -> Result<(), WarpError> {
        let src = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        let field = MappingField::from_vec([1, 1].into(), vec![[0.0, 0.0]])?;
        let res = backward_warp(
            &src,
            &field,
            InterpolationMode::Bicubic,
            OutOfHullPolicy::Clamp,
            ExecutionStrategy::Serial,
        );
        assert_eq!(res, Err(WarpError::EmptyImage("source")));
        Ok(())
    }

    #[test]
    fn policy_serde() -> Result<(), serde_json::Error> {
        let policy: OutOfHullPolicy = serde_json::from_str("{\"fill\": 255}")?;
        assert_eq!(policy, OutOfHullPolicy::Fill(255));
        let policy: OutOfHullPolicy = serde_json::from_str("\"reject\"")?;
        assert_eq!(policy, OutOfHullPolicy::Reject);
        Ok(())
    }
}
