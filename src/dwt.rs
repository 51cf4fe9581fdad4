//! Two-band Haar subband transform.
//!
//! One level splits a grid into four half-size bands:
//! ```text
//! +-------+-------+
//! |  LL   |  HL   |   L = lowpass over column pairs
//! +-------+-------+   H = highpass over column pairs
//! |  LH   |  HH   |   second letter: the same filters over row pairs
//! +-------+-------+
//! ```
//! The filter pair is `lowpass(a, b) = (a + b) / 2` and
//! `highpass(a, b) = (a - b) / 2`, inverted exactly by `a = l + h`,
//! `b = l - h`.
//!
//! The transform needs even dimensions. With [`OddEdgePolicy::Truncate`] an odd
//! last row or column is dropped before the split; that data is lost, and the
//! reconstruction has the truncated shape reported by
//! [`Subbands::output_size`].

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_DECOMPOSITION_LEVELS;
use crate::error::TransformError;
use crate::grid::PixelGrid;

/// Element-wise `(a + b) / 2`.
pub fn lowpass(a: &[f64], b: &[f64]) -> Result<Vec<f64>, TransformError> {
    if a.len() != b.len() {
        return Err(TransformError::ShapeMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x + y) / 2.0).collect())
}

/// Element-wise `(a - b) / 2`.
pub fn highpass(a: &[f64], b: &[f64]) -> Result<Vec<f64>, TransformError> {
    if a.len() != b.len() {
        return Err(TransformError::ShapeMismatch);
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x - y) / 2.0).collect())
}

/// What to do with a trailing odd row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OddEdgePolicy {
    /// Drop it (lossy).
    #[default]
    Truncate,
    /// Fail with [`TransformError::OddDimension`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SubbandKind {
    Ll = 0,
    Lh = 1,
    Hl = 2,
    Hh = 3,
}

/// The four bands of a one-level decomposition. All share one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subbands {
    pub ll: PixelGrid,
    pub lh: PixelGrid,
    pub hl: PixelGrid,
    pub hh: PixelGrid,
}

impl Subbands {
    pub fn band_width(&self) -> usize {
        self.ll.width()
    }

    pub fn band_height(&self) -> usize {
        self.ll.height()
    }

    /// `(width, height)` of the grid [`Subbands::reconstruct`] returns. This is
    /// the shape actually transformed, which is smaller than the original
    /// input when an odd edge was truncated.
    pub fn output_size(&self) -> (usize, usize) {
        (self.band_width() * 2, self.band_height() * 2)
    }

    pub fn band(&self, kind: SubbandKind) -> &PixelGrid {
        match kind {
            SubbandKind::Ll => &self.ll,
            SubbandKind::Lh => &self.lh,
            SubbandKind::Hl => &self.hl,
            SubbandKind::Hh => &self.hh,
        }
    }

    pub fn reconstruct(&self) -> Result<PixelGrid, TransformError> {
        inverse_2d(&self.ll, &self.lh, &self.hl, &self.hh)
    }
}

/// Forward 1D split of an even-length signal into low and high halves.
fn analyze(signal: &[f64], low: &mut [f64], high: &mut [f64]) {
    for (i, pair) in signal.chunks_exact(2).enumerate() {
        low[i] = (pair[0] + pair[1]) / 2.0;
        high[i] = (pair[0] - pair[1]) / 2.0;
    }
}

/// Inverse 1D merge: `output[2i] = l + h`, `output[2i + 1] = l - h`.
fn synthesize(low: &[f64], high: &[f64], output: &mut [f64]) {
    for ((pair, l), h) in output.chunks_exact_mut(2).zip(low).zip(high) {
        pair[0] = l + h;
        pair[1] = l - h;
    }
}

// Horizontal pass over every row. `grid.width()` must be even.
fn analyze_rows(grid: &PixelGrid) -> Result<(PixelGrid, PixelGrid), TransformError> {
    let half = grid.width() / 2;
    let mut low = vec![0.0; half * grid.height()];
    let mut high = vec![0.0; half * grid.height()];

    for ((row, l), h) in grid
        .rows()
        .zip(low.chunks_exact_mut(half))
        .zip(high.chunks_exact_mut(half))
    {
        analyze(row, l, h);
    }

    Ok((
        PixelGrid::from_vec(half, grid.height(), low)?,
        PixelGrid::from_vec(half, grid.height(), high)?,
    ))
}

fn synthesize_rows(low: &PixelGrid, high: &PixelGrid) -> Result<PixelGrid, TransformError> {
    if !low.same_shape(high) {
        return Err(TransformError::ShapeMismatch);
    }
    let width = low.width() * 2;
    let mut output = vec![0.0; width * low.height()];

    for ((out, l), h) in output.chunks_exact_mut(width).zip(low.rows()).zip(high.rows()) {
        synthesize(l, h, out);
    }

    PixelGrid::from_vec(width, low.height(), output)
}

// Largest extent that is a multiple of `multiple`, subject to `policy`.
fn usable_extent(
    width: usize,
    height: usize,
    multiple: usize,
    policy: OddEdgePolicy,
) -> Result<(usize, usize), TransformError> {
    if width < multiple || height < multiple {
        return Err(TransformError::InvalidDimension);
    }

    let usable = (width - width % multiple, height - height % multiple);
    if usable != (width, height) {
        match policy {
            OddEdgePolicy::Reject => return Err(TransformError::OddDimension),
            OddEdgePolicy::Truncate => log::debug!(
                "truncating {}x{} grid to {}x{} before subband split",
                width,
                height,
                usable.0,
                usable.1
            ),
        }
    }
    Ok(usable)
}

/// One-level 2D decomposition into LL, LH, HL and HH.
///
/// Each band is `height / 2` x `width / 2`. A width or height of 1 leaves
/// nothing to pair and fails with [`TransformError::InvalidDimension`].
pub fn forward_2d(grid: &PixelGrid, odd_edge: OddEdgePolicy) -> Result<Subbands, TransformError> {
    let (width, height) = usable_extent(grid.width(), grid.height(), 2, odd_edge)?;
    let grid = grid.crop(width, height)?;

    // Columns first, then rows of each half (via transpose).
    let (l, h) = analyze_rows(&grid)?;
    let (ll, lh) = analyze_rows(&l.transpose())?;
    let (hl, hh) = analyze_rows(&h.transpose())?;

    Ok(Subbands {
        ll: ll.transpose(),
        lh: lh.transpose(),
        hl: hl.transpose(),
        hh: hh.transpose(),
    })
}

/// Rebuilds a `2 * width` x `2 * height` grid from four same-shape bands.
pub fn inverse_2d(
    ll: &PixelGrid,
    lh: &PixelGrid,
    hl: &PixelGrid,
    hh: &PixelGrid,
) -> Result<PixelGrid, TransformError> {
    if !ll.same_shape(lh) || !ll.same_shape(hl) || !ll.same_shape(hh) {
        return Err(TransformError::ShapeMismatch);
    }

    // Vertical merge of each half, then the horizontal merge.
    let l = synthesize_rows(&ll.transpose(), &lh.transpose())?.transpose();
    let h = synthesize_rows(&hl.transpose(), &hh.transpose())?.transpose();
    synthesize_rows(&l, &h)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveletParameters {
    pub levels: u32,
    pub odd_edge: OddEdgePolicy,
}

impl Default for WaveletParameters {
    fn default() -> Self {
        Self {
            levels: DEFAULT_DECOMPOSITION_LEVELS,
            odd_edge: OddEdgePolicy::Truncate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailBands {
    pub lh: PixelGrid,
    pub hl: PixelGrid,
    pub hh: PixelGrid,
}

/// Multi-level decomposition. `details[0]` is the finest level; the
/// approximation is the LL band of the coarsest one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pyramid {
    pub approximation: PixelGrid,
    pub details: Vec<DetailBands>,
}

impl Pyramid {
    pub fn levels(&self) -> usize {
        self.details.len()
    }

    pub fn reconstruct(&self) -> Result<PixelGrid, TransformError> {
        let mut current = self.approximation.clone();
        for detail in self.details.iter().rev() {
            current = inverse_2d(&current, &detail.lh, &detail.hl, &detail.hh)?;
        }
        Ok(current)
    }
}

/// Splits the LL band `params.levels` times.
///
/// Both dimensions must be multiples of `2^levels`; the remainder is dropped
/// or rejected up front according to `params.odd_edge`, so every level splits
/// exactly.
pub fn decompose(grid: &PixelGrid, params: &WaveletParameters) -> Result<Pyramid, TransformError> {
    if params.levels == 0 {
        return Err(TransformError::InvalidArgumentLevels);
    }
    let multiple = 1usize
        .checked_shl(params.levels)
        .ok_or(TransformError::InvalidArgumentLevels)?;

    let (width, height) = usable_extent(grid.width(), grid.height(), multiple, params.odd_edge)?;
    let mut current = grid.crop(width, height)?;
    let mut details = Vec::with_capacity(params.levels as usize);

    for _ in 0..params.levels {
        let Subbands { ll, lh, hl, hh } = forward_2d(&current, OddEdgePolicy::Reject)?;
        details.push(DetailBands { lh, hl, hh });
        current = ll;
    }

    Ok(Pyramid {
        approximation: current,
        details,
    })
}
