use nalgebra::Matrix3;

use crate::types::{Real, Vector};

/// Pinhole intrinsics normalized by image size.
///
/// `fx`, `cx` are fractions of the image width and `fy`, `cy` fractions of its height, so
/// the same intrinsics can drive any output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intrinsics {
    pub fx: Real,
    pub fy: Real,
    pub cx: Real,
    pub cy: Real,
}

impl Intrinsics {
    pub fn new(fx: Real, fy: Real, cx: Real, cy: Real) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Reads a normalized camera matrix `K`:
    ///
    /// ```text
    /// | fx  0  cx |
    /// |  0 fy  cy |
    /// |  0  0   1 |
    /// ```
    pub fn from_matrix(k: &Matrix3<Real>) -> Self {
        Self::new(k[(0, 0)], k[(1, 1)], k[(0, 2)], k[(1, 2)])
    }

    /// Scales the intrinsics to a `width × height` image.
    ///
    /// The principal point is shifted by half a pixel so that pixel `(u, v)` is sampled
    /// at its centre.
    pub fn denormalize(&self, width: usize, height: usize) -> PixelIntrinsics {
        let (w, h) = (width as Real, height as Real);
        PixelIntrinsics {
            fx: self.fx * w,
            fy: self.fy * h,
            cx: self.cx * w - 0.5,
            cy: self.cy * h - 0.5,
        }
    }
}

/// Intrinsics in pixel units for one output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelIntrinsics {
    pub fx: Real,
    pub fy: Real,
    pub cx: Real,
    pub cy: Real,
}

impl PixelIntrinsics {
    /// Camera-space direction of the ray through pixel `(u, v)`.
    ///
    /// The direction has `z = 1` and is not normalized, so a parametric length along it
    /// equals depth along the optical axis.
    #[inline]
    pub fn ray_direction(&self, u: usize, v: usize) -> Vector {
        Vector::new(
            (u as Real - self.cx) / self.fx,
            (v as Real - self.cy) / self.fy,
            1.0,
        )
    }
}
