use lmwarp_image::ImageError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// Errors raised while fitting a deformation model or warping an image.
#[derive(Debug, Error, PartialEq)]
pub enum WarpError {
    /// The source and reference landmark lists have different lengths.
    #[error("The number of landmarks is not equal: {source_count} source vs {reference_count} reference")]
    LandmarkCountMismatch {
        /// Number of landmarks on the source image.
        source_count: usize,
        /// Number of landmarks on the reference image.
        reference_count: usize,
    },

    /// No landmark pairs were supplied.
    #[error("No landmarks")]
    NoLandmarks,

    /// One of the images has a zero dimension.
    #[error("The {0} image is empty")]
    EmptyImage(&'static str),

    /// A configured model parameter is out of range.
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Name of the configuration field.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The thin plate spline system cannot be solved for these control points.
    #[error("Singular thin plate spline system: {0}")]
    SingularSystem(String),

    /// A mapped coordinate fell outside the source raster.
    #[error("Output pixel (row {row}, col {col}) maps outside the source image")]
    OutOfHull {
        /// Row of the offending output pixel.
        row: usize,
        /// Column of the offending output pixel.
        col: usize,
    },

    /// Error from the image containers.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the row scheduler.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

impl WarpError {
    /// Whether the error is a precondition failure raised before any computation.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            WarpError::LandmarkCountMismatch { .. } | WarpError::NoLandmarks | WarpError::EmptyImage(_)
        )
    }
}
