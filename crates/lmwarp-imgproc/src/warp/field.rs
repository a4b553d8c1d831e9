use lmwarp_image::{ImageError, ImageSize};

use super::error::WarpError;
use super::CoordinateMapping;
use crate::parallel::{self, ExecutionStrategy};

/// Dense lookup field: for every reference pixel, the source `[row, col]` to sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingField {
    size: ImageSize,
    coords: Vec<[f64; 2]>,
}

impl MappingField {
    /// Wrap row-major coordinates of a grid of the given size.
    ///
    /// # Errors
    ///
    /// If the number of coordinates does not match the grid size.
    pub fn from_vec(size: ImageSize, coords: Vec<[f64; 2]>) -> Result<Self, WarpError> {
        if coords.len() != size.area() {
            return Err(ImageError::InvalidChannelShape(coords.len(), size.area()).into());
        }
        Ok(Self { size, coords })
    }

    /// Size of the reference grid.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Source coordinate for the reference pixel at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Option<[f64; 2]> {
        if row >= self.size.height || col >= self.size.width {
            return None;
        }
        self.coords.get(row * self.size.width + col).copied()
    }

    /// The coordinates in row-major order.
    pub fn as_slice(&self) -> &[[f64; 2]] {
        &self.coords
    }
}

/// Evaluate a mapping at every integer coordinate of a grid.
///
/// # Arguments
///
/// * `mapping` - The fitted mapping function.
/// * `size` - The size of the reference grid.
/// * `strategy` - How rows are scheduled.
///
/// # Returns
///
/// The field with `field[row][col] = mapping([row, col])`.
pub fn evaluate<M>(
    mapping: &M,
    size: ImageSize,
    strategy: ExecutionStrategy,
) -> Result<MappingField, WarpError>
where
    M: CoordinateMapping + ?Sized,
{
    if size.is_empty() {
        return Err(WarpError::EmptyImage("reference"));
    }

    let mut coords = vec![[0.0f64; 2]; size.area()];
    parallel::for_each_row(&mut coords, size.width, strategy, |row, row_coords| {
        row_coords
            .iter_mut()
            .enumerate()
            .for_each(|(col, c)| *c = mapping.map([row as f64, col as f64]));
    })?;

    log::debug!("evaluated mapping field on a {}x{} grid", size.height, size.width);

    Ok(MappingField { size, coords })
}
