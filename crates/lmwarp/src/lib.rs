#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use lmwarp_image as image;

#[doc(inline)]
pub use lmwarp_imgproc as imgproc;

/// One-shot spatial transform of a source image onto a reference grid.
pub mod transform;

pub use transform::{SpatialTransform, TransformOutput};
