use crate::{
    config::DEFAULT_BISECTION_WIDTH,
    grid::VoxelField,
    types::{Point, Real, Vector},
};

/// Locates where a ray crosses the zero level of a [`VoxelField`].
///
/// ```text
/// entry                      crossing
///   |----|----|----|----|----|-x--|        coarse march: fixed steps of voxel_size * step_size_voxel
///                            [  ^  ]       bisection inside the last step
/// ```
///
/// Only a strict positive-to-negative transition between two consecutive samples counts
/// as a crossing. Rays that start behind the surface, or that touch zero without going
/// negative, are reported as misses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZeroCrossingSearch {
    /// Coarse marching step as a multiple of the field's voxel size.
    pub step_size_voxel: Real,
    /// Field magnitude at which a bisection midpoint is accepted as the crossing.
    pub epsilon: Real,
    /// Bracket width at which bisection stops regardless of the field value.
    pub bisection_width: Real,
}

impl ZeroCrossingSearch {
    pub fn new(step_size_voxel: Real, epsilon: Real) -> Self {
        Self {
            step_size_voxel,
            epsilon,
            bisection_width: DEFAULT_BISECTION_WIDTH,
        }
    }

    pub fn with_bisection_width(mut self, bisection_width: Real) -> Self {
        self.bisection_width = bisection_width;
        self
    }

    /// Searches `origin + length * direction` for a zero crossing, starting at
    /// `entry_length`, which must already lie inside the field.
    ///
    /// Returns the refined crossing length, or `None` if the ray leaves the field first.
    pub fn search<F>(
        &self,
        field: &F,
        origin: &Point,
        direction: &Vector,
        entry_length: Real,
    ) -> Option<Real>
    where
        F: VoxelField + ?Sized,
    {
        let (low, high) = self.march(field, origin, direction, entry_length)?;
        Some(self.bisect(field, origin, direction, low, high))
    }

    /// Steps along the ray until a sample goes from positive to negative.
    ///
    /// Returns the lengths of the last two samples, which bracket the crossing.
    fn march<F>(
        &self,
        field: &F,
        origin: &Point,
        direction: &Vector,
        entry_length: Real,
    ) -> Option<(Real, Real)>
    where
        F: VoxelField + ?Sized,
    {
        let step = field.voxel_size() * self.step_size_voxel;
        if !(step > 0.0) {
            // A non-advancing march would never leave the grid.
            return None;
        }

        let mut length = entry_length;
        let mut value = field.value_at_point(&(origin + direction * length));

        loop {
            let previous_length = length;
            length += step;
            if length == previous_length {
                // Step below the precision of `length`: the march cannot advance.
                return None;
            }

            let point = origin + direction * length;
            if !field.within_grid(&point) {
                return None;
            }

            let previous_value = value;
            value = field.value_at_point(&point);

            if previous_value > 0.0 && value < 0.0 {
                return Some((previous_length, length));
            }
        }
    }

    /// Narrows `[low, high]` around the crossing.
    ///
    /// Stops when a midpoint sample lies within `epsilon` of zero, returning that
    /// midpoint, or when the bracket is narrower than `bisection_width` (or than one
    /// float step), returning the far (negative) end.
    fn bisect<F>(
        &self,
        field: &F,
        origin: &Point,
        direction: &Vector,
        mut low: Real,
        mut high: Real,
    ) -> Real
    where
        F: VoxelField + ?Sized,
    {
        loop {
            let middle = (low + high) / 2.0;
            if middle <= low || middle >= high {
                // Bracket is down to adjacent floats and cannot shrink further.
                return high;
            }
            let value = field.value_at_point(&(origin + direction * middle)) as Real;

            if value > self.epsilon {
                low = middle;
            } else if value < -self.epsilon {
                high = middle;
            } else {
                return middle;
            }

            if (high - low).abs() < self.bisection_width {
                return high;
            }
        }
    }
}
