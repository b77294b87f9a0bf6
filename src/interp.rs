use crate::types::{Real, Value};

// Linear interpolation
pub fn lerp(a: Value, b: Value, t: Real) -> Real {
    a as Real + (b as Real - a as Real) * t
}

/// Trilinear interpolation over the 8 corners of a cell, indexed `[z][y][x]`.
///
/// `t` holds the fractional position inside the cell along x, y and z, each in `[0, 1]`.
pub fn trilinear(corners: [[[Value; 2]; 2]; 2], t: [Real; 3]) -> Real {
    let [tx, ty, tz] = t;
    let along_x = |z: usize, y: usize| lerp(corners[z][y][0], corners[z][y][1], tx);

    let near = along_x(0, 0) + (along_x(0, 1) - along_x(0, 0)) * ty;
    let far = along_x(1, 0) + (along_x(1, 1) - along_x(1, 0)) * ty;
    near + (far - near) * tz
}
