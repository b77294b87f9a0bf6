use derive_more::Display;

pub type Result<T> = core::result::Result<T, RaycastError>;

#[derive(Debug, Display, Clone, PartialEq)]
#[display("{self:?}")]
pub enum RaycastError {
    /// Width or height is zero.
    InvalidResolution,
    /// Marching step (in voxels) is not a positive finite number.
    InvalidStepSize,
    /// Bisection epsilon is not a positive finite number.
    InvalidEpsilon,
    InvalidBisectionWidth,
    InvalidVoxelSize,
    /// Replacement values do not match the grid's corner count.
    GridShapeMismatch {
        expected: [usize; 3],
        found: [usize; 3],
    },
    /// Output buffers are not sized `height × width`.
    BufferShapeMismatch {
        expected: [usize; 2],
        found: [usize; 2],
    },
}

impl std::error::Error for RaycastError {}
