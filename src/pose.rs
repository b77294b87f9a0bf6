use nalgebra::{Matrix3, Rotation3};

use crate::types::{Point, Real, Vector};

/// Rigid camera pose: where the camera sits and how it is oriented in world space.
///
/// `orientation` maps camera-space vectors to world space. The camera frame follows the
/// pinhole convention: +x right, +y down, +z along the optical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World-space position of the camera centre. Every primary ray starts here.
    pub translation: Point,
    /// Camera-to-world rotation.
    pub orientation: Rotation3<Real>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    pub fn new(translation: Point, orientation: Rotation3<Real>) -> Self {
        Self {
            translation,
            orientation,
        }
    }

    /// Camera at the world origin looking down +z.
    pub fn identity() -> Self {
        Self::new(Point::origin(), Rotation3::identity())
    }

    /// Builds a pose from a camera-to-world rotation matrix.
    ///
    /// The matrix is assumed orthonormal and is not re-orthogonalized.
    pub fn from_matrix(translation: Point, orientation: Matrix3<Real>) -> Self {
        Self::new(translation, Rotation3::from_matrix_unchecked(orientation))
    }

    /// Places the camera at `eye` with its optical axis pointing at `target`.
    ///
    /// Image rows run opposite to `up`. `up` must not be parallel to `target - eye`.
    pub fn look_at(eye: Point, target: Point, up: Vector) -> Self {
        Self::new(eye, Rotation3::face_towards(&(target - eye), &(-up)))
    }

    /// Rotates a camera-space vector into world space. Translation is not applied.
    #[inline]
    pub fn transform_vector(&self, v: &Vector) -> Vector {
        self.orientation * v
    }

    /// Rotates a world-space vector into camera space using the transposed orientation.
    #[inline]
    pub fn inverse_transform_vector(&self, v: &Vector) -> Vector {
        self.orientation.transpose() * v
    }

    /// Maps a camera-space point into world space.
    #[inline]
    pub fn transform_point(&self, p: &Point) -> Point {
        self.translation + self.orientation * p.coords
    }
}
