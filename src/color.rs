//! RGB <-> YUV colour conversion (BT.601 analog YUV).
//!
//! Point-wise and linear: no offsets, no clamping and no rounding. Chroma
//! comes out signed. Callers that need 8-bit output round afterwards, e.g.
//! through [`ColorPlanes::to_interleaved_u8`].

use crate::constants::{RGB_TO_YUV, YUV_TO_RGB};
use crate::error::TransformError;
use crate::grid::{PixelGrid, clamp_to_u8};

#[inline]
fn apply_matrix(m: &[[f64; 3]; 3], a: f64, b: f64, c: f64) -> (f64, f64, f64) {
    (
        m[0][0] * a + m[0][1] * b + m[0][2] * c,
        m[1][0] * a + m[1][1] * b + m[1][2] * c,
        m[2][0] * a + m[2][1] * b + m[2][2] * c,
    )
}

/// Convert RGB to YUV.
#[inline]
pub fn rgb_to_yuv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    apply_matrix(&RGB_TO_YUV, r, g, b)
}

/// Convert YUV to RGB. Inverse of [`rgb_to_yuv`] up to rounding error.
#[inline]
pub fn yuv_to_rgb(y: f64, u: f64, v: f64) -> (f64, f64, f64) {
    apply_matrix(&YUV_TO_RGB, y, u, v)
}

/// Three same-shape planes (R/G/B or Y/U/V).
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPlanes {
    pub first: PixelGrid,
    pub second: PixelGrid,
    pub third: PixelGrid,
}

impl ColorPlanes {
    pub fn new(
        first: PixelGrid,
        second: PixelGrid,
        third: PixelGrid,
    ) -> Result<Self, TransformError> {
        if !first.same_shape(&second) || !first.same_shape(&third) {
            return Err(TransformError::ShapeMismatch);
        }
        Ok(Self {
            first,
            second,
            third,
        })
    }

    /// Splits an interleaved 8-bit image into three `f64` planes.
    pub fn from_interleaved(pixels: &PixelGrid<[u8; 3]>) -> Self {
        Self {
            first: pixels.map(|p| f64::from(p[0])),
            second: pixels.map(|p| f64::from(p[1])),
            third: pixels.map(|p| f64::from(p[2])),
        }
    }

    /// Re-interleaves the planes, rounding and clamping each sample to 8 bits.
    pub fn to_interleaved_u8(&self) -> Result<PixelGrid<[u8; 3]>, TransformError> {
        self.check_shape()?;
        let data = self
            .first
            .as_slice()
            .iter()
            .zip(self.second.as_slice())
            .zip(self.third.as_slice())
            .map(|((&a, &b), &c)| [clamp_to_u8(a), clamp_to_u8(b), clamp_to_u8(c)])
            .collect();
        PixelGrid::from_vec(self.width(), self.height(), data)
    }

    // Fields are public, so shapes are re-checked before every zip.
    fn check_shape(&self) -> Result<(), TransformError> {
        if !self.first.same_shape(&self.second) || !self.first.same_shape(&self.third) {
            return Err(TransformError::ShapeMismatch);
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.first.width()
    }

    pub fn height(&self) -> usize {
        self.first.height()
    }

    fn convert(&self, f: fn(f64, f64, f64) -> (f64, f64, f64)) -> Result<Self, TransformError> {
        self.check_shape()?;
        let mut out = self.clone();
        let samples = out
            .first
            .as_mut_slice()
            .iter_mut()
            .zip(out.second.as_mut_slice().iter_mut())
            .zip(out.third.as_mut_slice().iter_mut());
        for ((a, b), c) in samples {
            let (x, y, z) = f(*a, *b, *c);
            *a = x;
            *b = y;
            *c = z;
        }
        Ok(out)
    }
}

pub fn rgb_to_yuv_planes(rgb: &ColorPlanes) -> Result<ColorPlanes, TransformError> {
    rgb.convert(rgb_to_yuv)
}

pub fn yuv_to_rgb_planes(yuv: &ColorPlanes) -> Result<ColorPlanes, TransformError> {
    yuv.convert(yuv_to_rgb)
}

/// Grayscale version of an RGB image: BT.601 luma, rounded to 8 bits.
pub fn luma(pixels: &PixelGrid<[u8; 3]>) -> PixelGrid<u8> {
    pixels.map(|p| {
        let (y, _, _) = rgb_to_yuv(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]));
        clamp_to_u8(y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pure_red() {
        let (y, u, v) = rgb_to_yuv(255.0, 0.0, 0.0);
        assert_abs_diff_eq!(y, 76.245, epsilon = 1e-9);
        assert_abs_diff_eq!(u, -37.51815, epsilon = 1e-9);
        assert_abs_diff_eq!(v, 156.825, epsilon = 1e-9);

        let (r, g, b) = yuv_to_rgb(y, u, v);
        assert_abs_diff_eq!(r, 255.0, epsilon = 1.0);
        assert_abs_diff_eq!(g, 0.0, epsilon = 1.0);
        assert_abs_diff_eq!(b, 0.0, epsilon = 1.0);
    }

    #[test]
    fn test_roundtrip_cube() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let (y, u, v) = rgb_to_yuv(r as f64, g as f64, b as f64);
                    let (r2, g2, b2) = yuv_to_rgb(y, u, v);
                    assert!((r as f64 - r2).abs() <= 1.0, "r {} -> {}", r, r2);
                    assert!((g as f64 - g2).abs() <= 1.0, "g {} -> {}", g, g2);
                    assert!((b as f64 - b2).abs() <= 1.0, "b {} -> {}", b, b2);
                }
            }
        }
    }

    #[test]
    fn test_gray_has_no_chroma() {
        let (y, u, v) = rgb_to_yuv(128.0, 128.0, 128.0);
        assert_abs_diff_eq!(y, 128.0, epsilon = 1e-9);
        assert_abs_diff_eq!(u, 0.0, epsilon = 1e-2);
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_planes_roundtrip() {
        let pixels = PixelGrid::from_rows(vec![
            vec![[255, 0, 0], [0, 255, 0]],
            vec![[0, 0, 255], [12, 200, 99]],
        ])
        .unwrap();

        let rgb = ColorPlanes::from_interleaved(&pixels);
        let yuv = rgb_to_yuv_planes(&rgb).unwrap();
        assert_eq!(yuv.width(), 2);
        assert_eq!(yuv.height(), 2);
        assert!(yuv.second.as_slice().iter().any(|&u| u < 0.0));

        let back = yuv_to_rgb_planes(&yuv).unwrap().to_interleaved_u8().unwrap();
        for (a, b) in pixels.as_slice().iter().zip(back.as_slice()) {
            for c in 0..3 {
                assert!((a[c] as i32 - b[c] as i32).abs() <= 1, "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_planes_shape_mismatch() {
        let a = PixelGrid::new(2, 2).unwrap();
        let b = PixelGrid::new(2, 3).unwrap();
        assert_eq!(
            ColorPlanes::new(a.clone(), a.clone(), b.clone()).unwrap_err(),
            TransformError::ShapeMismatch
        );

        let planes = ColorPlanes {
            first: a.clone(),
            second: a,
            third: b,
        };
        assert_eq!(
            rgb_to_yuv_planes(&planes).unwrap_err(),
            TransformError::ShapeMismatch
        );
    }

    #[test]
    fn test_luma() {
        let pixels = PixelGrid::from_vec(3, 1, vec![[255, 255, 255], [0, 0, 0], [255, 0, 0]]).unwrap();
        assert_eq!(luma(&pixels).as_slice(), &[255, 0, 76]);
    }
}
