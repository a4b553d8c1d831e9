use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),
}

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process rows in parallel.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

/// Apply `op` to every row of a row-major buffer.
///
/// # Arguments
///
/// * `data` - The buffer, `row_stride` elements per row.
/// * `row_stride` - Number of elements in one row (width * channels).
/// * `strategy` - The execution strategy.
/// * `op` - Called with the row index and the mutable row slice.
///
/// # Errors
///
/// Fails on a zero stride or when a fixed thread pool cannot be built.
pub fn for_each_row<T, F>(
    data: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            data.chunks_mut(row_stride)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
        ExecutionStrategy::ParallelRows => {
            data.par_chunks_mut(row_stride)
                .enumerate()
                .for_each(|(r, row)| op(r, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                data.par_chunks_mut(row_stride)
                    .enumerate()
                    .for_each(|(r, row)| op(r, row));
            });
        }
    }

    Ok(())
}
