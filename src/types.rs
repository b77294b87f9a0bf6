use nalgebra::{Point3, Vector3};

/// Scalar used for geometry: ray lengths, positions, voxel sizes.
pub type Real = f64;

/// Signed field sample stored in a voxel grid.
///
/// Positive values lie in front of (outside) the surface, negative values behind it.
pub type Value = f32;

/// A 3D point with [`Real`] components.
pub type Point = Point3<Real>;

/// A 3D vector with [`Real`] components.
pub type Vector = Vector3<Real>;

/// A scalar field function: maps a world-space [`Point`] to a [`Value`].
pub type FieldFunction = dyn Fn(Point) -> Value + Sync;
