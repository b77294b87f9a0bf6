use crate::{
    error::{RaycastError, Result},
    search::ZeroCrossingSearch,
    types::Real,
};

/// Bracket width below which bisection stops, in world units.
pub const DEFAULT_BISECTION_WIDTH: Real = 1e-2;

/// Tunable parameters for rendering one view.
///
/// ```rust,ignore
/// let config = RaycastConfig::default()
///     .with_resolution(320, 240)
///     .with_step_size_voxel(0.5)
///     .with_epsilon(1e-3);
/// config.validate()?;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastConfig {
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
    /// Coarse marching step as a multiple of the grid's voxel size. Default: `0.5`.
    pub step_size_voxel: Real,
    /// Field magnitude at which bisection accepts a crossing. Default: `1e-3`.
    pub epsilon: Real,
    /// Bracket width at which bisection stops regardless of the field value.
    /// Default: [`DEFAULT_BISECTION_WIDTH`].
    pub bisection_width: Real,
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            step_size_voxel: 0.5,
            epsilon: 1e-3,
            bisection_width: DEFAULT_BISECTION_WIDTH,
        }
    }
}

impl RaycastConfig {
    pub fn with_resolution(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_step_size_voxel(mut self, step_size_voxel: Real) -> Self {
        self.step_size_voxel = step_size_voxel;
        self
    }

    pub fn with_epsilon(mut self, epsilon: Real) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_bisection_width(mut self, bisection_width: Real) -> Self {
        self.bisection_width = bisection_width;
        self
    }

    /// Checks that the resolution is non-empty and every tolerance is positive and finite.
    pub fn validate(&self) -> Result<()> {
        let positive = |x: Real| x.is_finite() && x > 0.0;

        if self.width == 0 || self.height == 0 {
            return Err(RaycastError::InvalidResolution);
        }
        if !positive(self.step_size_voxel) {
            return Err(RaycastError::InvalidStepSize);
        }
        if !positive(self.epsilon) {
            return Err(RaycastError::InvalidEpsilon);
        }
        if !positive(self.bisection_width) {
            return Err(RaycastError::InvalidBisectionWidth);
        }
        Ok(())
    }

    /// The per-ray search these settings describe.
    pub fn search(&self) -> ZeroCrossingSearch {
        ZeroCrossingSearch {
            step_size_voxel: self.step_size_voxel,
            epsilon: self.epsilon,
            bisection_width: self.bisection_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(RaycastConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_each_bad_parameter() {
        let base = RaycastConfig::default();
        assert_eq!(
            base.with_resolution(0, 10).validate(),
            Err(RaycastError::InvalidResolution)
        );
        assert_eq!(
            base.with_step_size_voxel(-1.0).validate(),
            Err(RaycastError::InvalidStepSize)
        );
        assert_eq!(
            base.with_epsilon(0.0).validate(),
            Err(RaycastError::InvalidEpsilon)
        );
        assert_eq!(
            base.with_bisection_width(Real::INFINITY).validate(),
            Err(RaycastError::InvalidBisectionWidth)
        );
    }

    #[test]
    fn search_carries_tolerances() {
        let search = RaycastConfig::default()
            .with_step_size_voxel(0.25)
            .with_epsilon(1e-4)
            .search();
        assert_eq!(search.step_size_voxel, 0.25);
        assert_eq!(search.epsilon, 1e-4);
        assert_eq!(search.bisection_width, DEFAULT_BISECTION_WIDTH);
    }
}
