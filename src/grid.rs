use ndarray::Array3;

use crate::{
    error::{RaycastError, Result},
    interp::trilinear,
    types::{FieldFunction, Point, Real, Value, Vector},
};

/// A signed field that rays can be marched through.
///
/// Implementors own their storage and indexing; the raytracer only ever asks for
/// samples at world-space points.
pub trait VoxelField {
    /// World-space edge length of one voxel. Marching steps and gradient offsets are
    /// expressed in multiples of this.
    fn voxel_size(&self) -> Real;

    /// Returns `true` if `point` lies inside the volume.
    fn within_grid(&self, point: &Point) -> bool;

    /// Samples the field at `point`.
    ///
    /// Behaviour for points outside the volume is up to the implementor.
    fn value_at_point(&self, point: &Point) -> Value;

    /// Returns the parametric length at which `origin + length * direction` first enters
    /// the volume, or `None` if the ray never does.
    fn project_ray_to_voxel_point(&self, origin: &Point, direction: &Vector) -> Option<Real>;

    /// Central-difference gradient of the field at `point`, using offsets of one voxel
    /// along each axis.
    ///
    /// ```text
    /// g = ((f(p+x) - f(p-x)) / 2, (f(p+y) - f(p-y)) / 2, (f(p+z) - f(p-z)) / 2)
    /// ```
    ///
    /// The result is not normalized and may be zero on a flat region of the field.
    fn gradient(&self, point: &Point) -> Vector {
        let h = self.voxel_size();
        let diff = |offset: Vector| {
            let forward = self.value_at_point(&(point + offset));
            let backward = self.value_at_point(&(point - offset));
            (forward as Real - backward as Real) / 2.0
        };
        Vector::new(
            diff(Vector::new(h, 0.0, 0.0)),
            diff(Vector::new(0.0, h, 0.0)),
            diff(Vector::new(0.0, 0.0, h)),
        )
    }
}

/// A dense, axis-aligned voxel grid of signed field samples.
///
/// The grid has `(size_x + 1) × (size_y + 1) × (size_z + 1)` corner samples
/// and `size_x × size_y × size_z` voxels. Corner `(x, y, z)` sits at
/// `min_point + voxel_size * (x, y, z)` in world space.
///
/// Values are stored as `values[[z, y, x]]`.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    /// Number of voxels along X.
    pub size_x: usize,
    /// Number of voxels along Y.
    pub size_y: usize,
    /// Number of voxels along Z.
    pub size_z: usize,
    /// World-space size of each voxel edge.
    pub voxel_size: Real,
    /// World-space position of corner `(0, 0, 0)`.
    pub min_point: Point,
    values: Array3<Value>,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self {
            size_x: 0,
            size_y: 0,
            size_z: 0,
            voxel_size: 1.,
            min_point: Point::origin(),
            values: Array3::zeros((1, 1, 1)),
        }
    }
}

impl VoxelGrid {
    /// Creates a new grid with the given voxel dimensions.
    ///
    /// All values are initialised to `0.0`.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            values: Array3::zeros((size_z + 1, size_y + 1, size_x + 1)),
            ..Default::default()
        }
    }

    /// Sets the world-space size of each voxel edge.
    ///
    /// Returns [`RaycastError::InvalidVoxelSize`] unless `voxel_size` is positive and finite.
    pub fn with_voxel_size(mut self, voxel_size: Real) -> Result<Self> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(RaycastError::InvalidVoxelSize);
        }
        self.voxel_size = voxel_size;
        Ok(self)
    }

    /// Moves the grid so that corner `(0, 0, 0)` sits at `min_point`.
    pub fn with_min_point(mut self, min_point: Point) -> Self {
        self.min_point = min_point;
        self
    }

    /// Replaces the field values.
    ///
    /// `values` must have shape `(size_z + 1, size_y + 1, size_x + 1)`.
    pub fn with_values(mut self, values: Array3<Value>) -> Result<Self> {
        let expected = [self.size_z + 1, self.size_y + 1, self.size_x + 1];
        let (z, y, x) = values.dim();
        if [z, y, x] != expected {
            return Err(RaycastError::GridShapeMismatch {
                expected,
                found: [z, y, x],
            });
        }
        self.values = values;
        Ok(self)
    }

    /// Read-only view of the stored samples, indexed `[[z, y, x]]`.
    pub fn values(&self) -> &Array3<Value> {
        &self.values
    }

    /// World-space position of the corner opposite [`min_point`](VoxelGrid::min_point).
    pub fn max_point(&self) -> Point {
        self.min_point
            + Vector::new(
                self.size_x as Real,
                self.size_y as Real,
                self.size_z as Real,
            ) * self.voxel_size
    }

    /// Returns the scalar field value at corner `(x, y, z)`.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Value {
        self.values[[z, y, x]]
    }

    /// Sets the scalar field value at corner `(x, y, z)`.
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: Value) {
        self.values[[z, y, x]] = v
    }

    /// Calls `f(position, &mut value)` for every corner in the grid, where `position`
    /// is the corner's world-space location.
    pub fn for_each_corner<F>(&mut self, mut f: F)
    where
        F: FnMut(Point, &mut Value),
    {
        let (min_point, voxel_size) = (self.min_point, self.voxel_size);
        for ((z, y, x), value) in self.values.indexed_iter_mut() {
            let position = min_point + Vector::new(x as Real, y as Real, z as Real) * voxel_size;
            f(position, value);
        }
    }

    /// Fills the grid by evaluating `function` at every corner's world-space position.
    pub fn fill(mut self, function: &FieldFunction) -> Self {
        self.for_each_corner(|position, value| *value = function(position));
        self
    }

    /// Splits a world-space coordinate into a cell index and the fraction inside it,
    /// clamping onto the grid.
    #[inline]
    fn cell(&self, coordinate: Real, min: Real, size: usize) -> (usize, Real) {
        let local = ((coordinate - min) / self.voxel_size).clamp(0.0, size as Real);
        let index = (local.floor() as usize).min(size.saturating_sub(1));
        (index, (local - index as Real).min(1.0))
    }
}

impl VoxelField for VoxelGrid {
    fn voxel_size(&self) -> Real {
        self.voxel_size
    }

    fn within_grid(&self, point: &Point) -> bool {
        let max = self.max_point();
        (0..3).all(|axis| point[axis] >= self.min_point[axis] && point[axis] <= max[axis])
    }

    /// Trilinearly interpolates the eight corners around `point`.
    ///
    /// Points outside the grid are clamped onto its boundary.
    fn value_at_point(&self, point: &Point) -> Value {
        let (x, tx) = self.cell(point.x, self.min_point.x, self.size_x);
        let (y, ty) = self.cell(point.y, self.min_point.y, self.size_y);
        let (z, tz) = self.cell(point.z, self.min_point.z, self.size_z);

        let xs = [x, (x + 1).min(self.size_x)];
        let ys = [y, (y + 1).min(self.size_y)];
        let zs = [z, (z + 1).min(self.size_z)];

        let mut corners = [[[0.0; 2]; 2]; 2];
        for (k, &cz) in zs.iter().enumerate() {
            for (j, &cy) in ys.iter().enumerate() {
                for (i, &cx) in xs.iter().enumerate() {
                    corners[k][j][i] = self.values[[cz, cy, cx]];
                }
            }
        }

        trilinear(corners, [tx, ty, tz]) as Value
    }

    /// Slab test of the forward half-line against the grid's bounding box.
    ///
    /// Returns `Some(0.0)` when `origin` is already inside the grid.
    fn project_ray_to_voxel_point(&self, origin: &Point, direction: &Vector) -> Option<Real> {
        let max = self.max_point();
        let mut t_min: Real = 0.0;
        let mut t_max = Real::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min_point[axis], max[axis]);

            if d == 0.0 {
                // Parallel to this slab: either always inside it or never.
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (mut t0, mut t1) = ((lo - o) * inv, (hi - o) * inv);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);

            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }
}
