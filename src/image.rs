use ndarray::Array2;

use crate::error::{RaycastError, Result};

/// Value written to every depth and normal channel of a pixel whose ray found no surface.
pub const NO_HIT: f32 = f32::NEG_INFINITY;

/// Normal-map entry for a pixel whose ray found no surface.
pub const NO_HIT_NORMAL: [f32; 3] = [NO_HIT; 3];

/// Result of tracing a single pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelSample {
    /// The ray crossed the surface at `depth` (along the optical axis) with a unit
    /// camera-space `normal`.
    Hit { depth: f32, normal: [f32; 3] },
    /// The ray missed the grid, or left it without crossing the surface.
    Miss,
}

impl PixelSample {
    pub fn is_hit(&self) -> bool {
        matches!(self, PixelSample::Hit { .. })
    }

    /// Depth channel value, [`NO_HIT`] for a miss.
    pub fn depth(&self) -> f32 {
        match self {
            PixelSample::Hit { depth, .. } => *depth,
            PixelSample::Miss => NO_HIT,
        }
    }

    /// Normal channel values, [`NO_HIT_NORMAL`] for a miss.
    pub fn normal(&self) -> [f32; 3] {
        match self {
            PixelSample::Hit { normal, .. } => *normal,
            PixelSample::Miss => NO_HIT_NORMAL,
        }
    }
}

/// Depth and normal maps for one rendered view, both indexed `[[v, u]]` (row, column).
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffers {
    /// One depth value per pixel.
    pub depth: Array2<f32>,
    /// One camera-space normal per pixel.
    pub normal: Array2<[f32; 3]>,
}

impl FrameBuffers {
    /// Allocates `width × height` buffers with every pixel set to the no-hit sentinel.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: Array2::from_elem((height, width), NO_HIT),
            normal: Array2::from_elem((height, width), NO_HIT_NORMAL),
        }
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    /// Checks that both buffers are `height × width`.
    pub fn check_shape(&self, width: usize, height: usize) -> Result<()> {
        let expected = [height, width];
        for found in [self.depth.dim(), self.normal.dim()] {
            let found = [found.0, found.1];
            if found != expected {
                return Err(RaycastError::BufferShapeMismatch { expected, found });
            }
        }
        Ok(())
    }

    /// Writes both channels of pixel `(u, v)`.
    #[inline]
    pub fn write(&mut self, u: usize, v: usize, sample: PixelSample) {
        self.depth[[v, u]] = sample.depth();
        self.normal[[v, u]] = sample.normal();
    }

    /// Reads pixel `(u, v)` back as a [`PixelSample`].
    ///
    /// A pixel counts as a miss only if its depth is the sentinel.
    pub fn sample(&self, u: usize, v: usize) -> PixelSample {
        let depth = self.depth[[v, u]];
        if depth == NO_HIT {
            PixelSample::Miss
        } else {
            PixelSample::Hit {
                depth,
                normal: self.normal[[v, u]],
            }
        }
    }

    /// Number of pixels holding a surface hit.
    pub fn hit_count(&self) -> usize {
        self.depth.iter().filter(|&&d| d != NO_HIT).count()
    }
}
