//! Canonical form of the selected structure.
//!
//! After selection the atoms of a periodic structure are folded into a
//! single repeat unit and rotated into the standard frame. For output
//! formats that need a full cell, the periodicity axes can be completed with
//! orthogonal vectors of a chosen length.

use nalgebra::Vector3;
use nanocut_geometry::{AtomSet, Periodicity};

/// Fold every atom into the periodic repeat unit, in place.
pub fn fold_to_unitcell(periodicity: &Periodicity, atoms: &mut AtomSet) {
    periodicity.fold_to_unitcell(&mut atoms.coords);
}

/// Rotate the atoms into the standard frame; returns the rotated axes.
pub fn rotate_coordsys(periodicity: &Periodicity, atoms: AtomSet) -> (Vec<Vector3<f64>>, AtomSet) {
    let (axis, coords) = periodicity.rotate_coordsys(&atoms.coords);
    (
        axis,
        AtomSet {
            coords,
            indices: atoms.indices,
        },
    )
}

/// Complete the axes to three vectors.
///
/// The missing directions are filled with `length` along x and y (wires,
/// whose axis is along z) or along z (slabs, whose normal is along z).
/// A full set of three is returned unchanged.
pub fn extend_axis(axis: Vec<Vector3<f64>>, length: f64) -> Vec<Vector3<f64>> {
    let x = Vector3::x() * length;
    let y = Vector3::y() * length;
    let z = Vector3::z() * length;
    match axis.as_slice() {
        [] => vec![x, y, z],
        [v] => vec![x, y, *v],
        [v1, v2] => vec![*v1, *v2, z],
        _ => axis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_axis_set_is_unchanged() {
        let full = vec![Vector3::x(), Vector3::y() * 2.0, Vector3::new(0.0, 1.0, 3.0)];
        assert_eq!(extend_axis(full.clone(), 10.0), full);
    }

    #[test]
    fn test_rotate_keeps_indices() {
        let mut atoms = AtomSet::default();
        atoms.push(Vector3::new(1.0, 2.0, 3.0), 4);
        let (axis, rotated) = rotate_coordsys(&Periodicity::cluster(), atoms.clone());
        assert!(axis.is_empty());
        assert_eq!(rotated, atoms);
    }
}
