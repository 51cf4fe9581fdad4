//! Separable orthonormal 2D DCT (type II forward, type III inverse).
//!
//! Works on any rectangular grid, not only 8x8 blocks. Each pass runs the 1D
//! transform over every row, then the grid is transposed so the next pass
//! covers the other axis. No quantization happens here.

use std::sync::Arc;

use rustdct::{DctPlanner, TransformType2And3};

use crate::error::TransformError;
use crate::grid::PixelGrid;

pub const BLOCK_SIZE: usize = 8;

type Kernel = Arc<dyn TransformType2And3<f64>>;

fn dct2_ortho(kernel: &Kernel, line: &mut [f64]) {
    kernel.process_dct2(line);

    let n = line.len() as f64;
    line[0] *= (1.0 / n).sqrt();
    let scale = (2.0 / n).sqrt();
    for v in &mut line[1..] {
        *v *= scale;
    }
}

fn dct3_ortho(kernel: &Kernel, line: &mut [f64]) {
    // rustdct's DCT-III halves the DC term, so it is pre-scaled by 2/sqrt(N).
    let n = line.len() as f64;
    line[0] *= 2.0 / n.sqrt();
    let scale = (2.0 / n).sqrt();
    for v in &mut line[1..] {
        *v *= scale;
    }

    kernel.process_dct3(line);
}

fn transform_rows(grid: &mut PixelGrid, planner: &mut DctPlanner<f64>, inverse: bool) {
    // A single-sample orthonormal DCT is the identity.
    if grid.width() < 2 {
        return;
    }
    let kernel = planner.plan_dct2(grid.width());
    for row in grid.rows_mut() {
        if inverse {
            dct3_ortho(&kernel, row);
        } else {
            dct2_ortho(&kernel, row);
        }
    }
}

fn transform_2d(block: &PixelGrid, inverse: bool) -> PixelGrid {
    log::debug!(
        "{} DCT on {}x{} block",
        if inverse { "inverse" } else { "forward" },
        block.width(),
        block.height()
    );

    let mut planner = DctPlanner::new();

    let mut pass = block.clone();
    transform_rows(&mut pass, &mut planner, inverse);

    let mut pass = pass.transpose();
    transform_rows(&mut pass, &mut planner, inverse);

    pass.transpose()
}

/// Forward 2D DCT-II, orthonormal. The output has the input's shape.
///
/// Any valid [`PixelGrid`] transforms; errors only arise when building the
/// grid, as in [`forward_flat`].
pub fn forward_2d(block: &PixelGrid) -> Result<PixelGrid, TransformError> {
    Ok(transform_2d(block, false))
}

/// Inverse 2D DCT (type III), orthonormal. Exact inverse of [`forward_2d`]
/// up to floating point error. Like [`forward_2d`] it cannot fail on a
/// constructed grid.
pub fn inverse_2d(coefficients: &PixelGrid) -> Result<PixelGrid, TransformError> {
    Ok(transform_2d(coefficients, true))
}

/// Forward DCT over a flat row-major coefficient buffer.
pub fn forward_flat(samples: &[f64], width: usize, height: usize) -> Result<Vec<f64>, TransformError> {
    let block = PixelGrid::from_vec(width, height, samples.to_vec())?;
    Ok(forward_2d(&block)?.into_vec())
}

/// Inverse of [`forward_flat`]. A buffer that is not `width * height` long is
/// not a rectangular grid and is rejected.
pub fn inverse_flat(coefficients: &[f64], width: usize, height: usize) -> Result<Vec<f64>, TransformError> {
    let block = PixelGrid::from_vec(width, height, coefficients.to_vec())?;
    Ok(inverse_2d(&block)?.into_vec())
}
