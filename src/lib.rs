//! Reversible, deterministic pixel transforms for compression experiments.
//!
//! - [`color`]: RGB <-> YUV (BT.601)
//! - [`scan`]: serpentine diagonal scan and its inverse
//! - [`rle`]: run-length coding into `(symbol, count)` pairs
//! - [`dct`]: orthonormal 2D DCT-II / DCT-III
//! - [`dwt`]: two-band Haar subband decomposition
//!
//! Components are independent; callers chain them as they see fit. All of
//! them operate on caller-owned [`PixelGrid`]s or slices and return fresh
//! buffers.

pub mod color;
pub mod constants;
pub mod dct;
pub mod dwt;
pub mod error;
pub mod grid;
pub mod rle;
pub mod scan;

pub use color::ColorPlanes;
pub use dwt::{OddEdgePolicy, Pyramid, SubbandKind, Subbands, WaveletParameters};
pub use error::TransformError;
pub use grid::PixelGrid;
pub use rle::RunLengthSequence;
