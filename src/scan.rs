//! Serpentine (diagonal zig-zag) scan of a 2D grid and its inverse.
//!
//! Anti-diagonal `d` holds the cells with `row + col == d`. Even diagonals are
//! walked up-right (row decreasing), odd diagonals down-left (row
//! increasing), so consecutive diagonals join into one continuous path. For an
//! 8x8 block this is the JPEG zig-zag table.

use crate::error::TransformError;
use crate::grid::{PixelGrid, checked_area};

/// Row-major cell index visited at each scan position.
///
/// The result is a permutation of `0..width * height`.
pub fn scan_order(width: usize, height: usize) -> Result<Vec<usize>, TransformError> {
    let len = checked_area(width, height)?;
    Ok(diagonal_walk(width, height, len))
}

// `len` is the validated `width * height`.
fn diagonal_walk(width: usize, height: usize, len: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(len);

    for d in 0..(width + height - 1) {
        if d % 2 == 0 {
            // Up-right: start on the lowest row that still touches the diagonal.
            let (mut row, mut col) = if d < height { (d, 0) } else { (height - 1, d - height + 1) };
            while col < width {
                order.push(row * width + col);
                if row == 0 {
                    break;
                }
                row -= 1;
                col += 1;
            }
        } else {
            // Down-left: start on the rightmost column that still touches the diagonal.
            let (mut row, mut col) = if d < width { (0, d) } else { (d - width + 1, width - 1) };
            while row < height {
                order.push(row * width + col);
                if col == 0 {
                    break;
                }
                row += 1;
                col -= 1;
            }
        }
    }

    debug_assert_eq!(order.len(), len);
    order
}

/// Linearizes `grid` along the serpentine path. The output has exactly one
/// entry per cell.
pub fn serpentine<T: Copy>(grid: &PixelGrid<T>) -> Vec<T> {
    let samples = grid.as_slice();
    diagonal_walk(grid.width(), grid.height(), samples.len())
        .into_iter()
        .map(|idx| samples[idx])
        .collect()
}

/// Rebuilds a `width` x `height` grid from a sequence produced by [`serpentine`].
pub fn unscan<T: Copy + Default>(
    sequence: &[T],
    width: usize,
    height: usize,
) -> Result<PixelGrid<T>, TransformError> {
    let len = checked_area(width, height)?;
    if sequence.len() != len {
        return Err(TransformError::InvalidSequenceLength);
    }

    let mut data = vec![T::default(); len];
    for (&value, idx) in sequence.iter().zip(diagonal_walk(width, height, len)) {
        data[idx] = value;
    }
    PixelGrid::from_vec(width, height, data)
}
