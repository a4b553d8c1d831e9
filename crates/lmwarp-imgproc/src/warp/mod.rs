//! Landmark-driven geometric transformations.
//!
//! The warp is a backward mapping: a deformation model fitted on landmark pairs
//! maps every pixel of the reference grid to a position in the source image, and
//! the source is resampled at those positions.
//!
//! - [`fit`] builds a [`MappingFunction`] from a [`CorrespondenceSet`]
//! - [`evaluate`] turns it into a dense [`MappingField`]
//! - [`backward_warp`] resamples the source image through the field
//!
//! # Examples
//!
//! ```
//! use lmwarp_imgproc::warp::{fit, CoordinateMapping, CorrespondenceSet, DeformationModel, Landmark};
//!
//! let points = [Landmark::new(0, 0), Landmark::new(0, 9), Landmark::new(9, 0)];
//! let set = CorrespondenceSet::new(&points, &points).unwrap();
//! let mapping = fit(&set, DeformationModel::ThinPlateSpline).unwrap();
//!
//! let p = mapping.map([4.0, 4.0]);
//! assert!((p[0] - 4.0).abs() < 1e-6 && (p[1] - 4.0).abs() < 1e-6);
//! ```

mod config;
mod error;
mod field;
mod landmarks;
mod larm;
mod model;
mod resample;
mod tps;

pub use config::WarpConfig;
pub use error::WarpError;
pub use field::{evaluate, MappingField};
pub use landmarks::{CorrespondenceSet, Direction, Landmark, LandmarkLog, LandmarkPair};
pub use larm::{LocallyAffine, DEFAULT_LARM_DISTANCE_EXPONENT};
pub use model::{fit, fit_with_config, DeformationModel, MappingFunction, ParseModelError};
pub use resample::{backward_warp, OutOfHullPolicy};
pub use tps::{ThinPlateSpline, DEFAULT_TPS_REGULARIZATION};

/// A pure mapping from a reference-space `[row, col]` to a source-space `[row, col]`.
pub trait CoordinateMapping: Send + Sync {
    /// Map one coordinate. The result may be fractional or outside the source image.
    fn map(&self, v: [f64; 2]) -> [f64; 2];
}
