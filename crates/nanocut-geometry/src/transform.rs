//! Rotations used to bring periodic structures into the standard frame.
//!
//! A 1D structure is rotated so that its periodicity axis points along +z,
//! a 2D structure so that its surface normal does. The rotation is always
//! proper (determinant +1); an axis pointing along -z is turned over by a
//! half-turn about x rather than mirrored.

use std::f64::consts::PI;

use nalgebra::{Rotation3, Vector3};

/// The proper rotation taking `direction` onto the +z axis.
pub fn align_with_z(direction: &Vector3<f64>) -> Rotation3<f64> {
    Rotation3::rotation_between(direction, &Vector3::z())
        .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI))
}

/// Apply `rotation` to every vector of a slice.
pub fn rotate_all(rotation: &Rotation3<f64>, vs: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    vs.iter().map(|v| rotation * v).collect()
}
