//! Pixel interpolation methods for backward warping.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels
//! - **Bicubic**: Piecewise-cubic convolution over a 4x4 neighbourhood. Reproduces
//!   the sample values at integer coordinates and is C1 continuous elsewhere.
//!
//! All kernels replicate the border samples, so coordinates slightly outside the
//! raster read the nearest edge pixels.

mod bicubic;
mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
