//! Row-major sample grid shared by every transform.
//!
//! Samples are `f64` internally and `u8` at the 8-bit boundary. Colour data is
//! carried either as three same-shape grids or as a grid of `[T; 3]` triples.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::constants::MAX_SAMPLE_VALUE;
use crate::error::TransformError;

#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid<T = f64> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> PixelGrid<T> {
    /// Wraps row-major `data`. Both dimensions must be non-zero and
    /// `data.len()` must equal `width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, TransformError> {
        if data.len() != checked_area(width, height)? {
            return Err(TransformError::ShapeMismatch);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a grid from a list of rows. Ragged rows are a shape mismatch.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, TransformError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(TransformError::InvalidDimension);
        }

        if rows.iter().any(|row| row.len() != width) {
            return Err(TransformError::ShapeMismatch);
        }
        Self::from_vec(width, height, rows.into_iter().flatten().collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    // Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.height && col < self.width {
            self.data.get(row * self.width + col)
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), TransformError> {
        if row >= self.height || col >= self.width {
            return Err(TransformError::IndexOutOfRange);
        }
        self.data[row * self.width + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&[T]> {
        self.rows().nth(row)
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.width)
    }

    pub fn same_shape<U>(&self, other: &PixelGrid<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Applies `f` to every sample, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> PixelGrid<U>
    where
        F: FnMut(&T) -> U,
    {
        PixelGrid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> PixelGrid<T> {
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.width {
            for row in 0..self.height {
                data.push(self.data[row * self.width + col].clone());
            }
        }
        Self {
            width: self.height,
            height: self.width,
            data,
        }
    }

    /// Keeps the top-left `width` x `height` region.
    pub fn crop(&self, width: usize, height: usize) -> Result<Self, TransformError> {
        if width == 0 || height == 0 || width > self.width || height > self.height {
            return Err(TransformError::InvalidDimension);
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let mut data = Vec::with_capacity(width * height);
        for row in self.rows().take(height) {
            data.extend_from_slice(&row[..width]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl<T: Default + Clone> PixelGrid<T> {
    pub fn new(width: usize, height: usize) -> Result<Self, TransformError> {
        let len = checked_area(width, height)?;
        Self::from_vec(width, height, vec![T::default(); len])
    }
}

impl PixelGrid<u8> {
    pub fn to_f64(&self) -> PixelGrid<f64> {
        self.map(|&v| f64::from(v))
    }
}

impl PixelGrid<f64> {
    /// Rounds and clamps every sample into the 8-bit range.
    pub fn to_u8(&self) -> PixelGrid<u8> {
        self.map(|&v| clamp_to_u8(v))
    }

    #[cfg(test)]
    pub(crate) fn max_abs_diff(&self, other: &PixelGrid<f64>) -> Result<f64, TransformError> {
        if !self.same_shape(other) {
            return Err(TransformError::ShapeMismatch);
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }
}

/// `width * height` for a grid shape. Zero or overflowing dimensions are
/// invalid.
pub fn checked_area(width: usize, height: usize) -> Result<usize, TransformError> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimension);
    }
    width
        .checked_mul(height)
        .ok_or(TransformError::InvalidDimension)
}

pub fn clamp_to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, MAX_SAMPLE_VALUE) as u8
}

impl<T: Serialize> Serialize for PixelGrid<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PixelGrid<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        PixelGrid::from_rows(rows).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            PixelGrid::<f64>::new(0, 4).unwrap_err(),
            TransformError::InvalidDimension
        );
        assert_eq!(
            PixelGrid::<f64>::new(4, 0).unwrap_err(),
            TransformError::InvalidDimension
        );
        assert_eq!(
            PixelGrid::<f64>::from_rows(vec![]).unwrap_err(),
            TransformError::InvalidDimension
        );
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let huge = 1usize << (usize::BITS - 1);
        assert_eq!(
            PixelGrid::<u8>::from_vec(huge, 2, vec![]).unwrap_err(),
            TransformError::InvalidDimension
        );
        assert_eq!(
            PixelGrid::<f64>::new(usize::MAX, 2).unwrap_err(),
            TransformError::InvalidDimension
        );
        assert_eq!(checked_area(usize::MAX, usize::MAX), Err(TransformError::InvalidDimension));
        assert_eq!(checked_area(usize::MAX, 1), Ok(usize::MAX));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut grid = PixelGrid::<u8>::new(3, 2).unwrap();
        grid.set(1, 2, 9).unwrap();
        assert_eq!(grid.get(1, 2), Some(&9));
        assert_eq!(grid.set(2, 0, 1).unwrap_err(), TransformError::IndexOutOfRange);
        assert_eq!(grid.set(0, 3, 1).unwrap_err(), TransformError::IndexOutOfRange);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            PixelGrid::from_rows(rows).unwrap_err(),
            TransformError::ShapeMismatch
        );
        assert_eq!(
            PixelGrid::from_vec(2, 2, vec![1u8, 2, 3]).unwrap_err(),
            TransformError::ShapeMismatch
        );
    }

    #[test]
    fn test_row_major_layout() {
        let grid = PixelGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.as_slice(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(grid.get(1, 0), Some(&4));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn test_transpose_and_crop() {
        let grid = PixelGrid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        let t = grid.transpose();
        assert_eq!(t.to_rows(), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(t.transpose(), grid);

        let cropped = grid.crop(2, 1).unwrap();
        assert_eq!(cropped.to_rows(), vec![vec![1, 2]]);
        assert!(grid.crop(4, 1).is_err());
    }

    #[test]
    fn test_u8_boundary() {
        let grid = PixelGrid::from_vec(4, 1, vec![-3.2, 12.5, 254.6, 300.0]).unwrap();
        assert_eq!(grid.to_u8().as_slice(), &[0, 13, 255, 255]);
        assert_eq!(grid.to_u8().to_f64().as_slice(), &[0.0, 13.0, 255.0, 255.0]);
    }

    #[test]
    fn test_serde_rows() {
        let grid = PixelGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,4.0]]");

        let back: PixelGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
        assert!(serde_json::from_str::<PixelGrid>("[[1.0],[2.0,3.0]]").is_err());
        assert!(serde_json::from_str::<PixelGrid>("[]").is_err());
    }
}
