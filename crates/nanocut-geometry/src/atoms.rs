//! Index-aligned atom coordinates.

use nalgebra::Vector3;

/// Cartesian atom positions paired index-for-index with species indices.
///
/// The two vectors always have the same length; every transformation in the
/// pipeline keeps them aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomSet {
    pub coords: Vec<Vector3<f64>>,
    /// Index into [`Geometry::species`](crate::Geometry::species).
    pub indices: Vec<usize>,
}

impl AtomSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            coords: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, coord: Vector3<f64>, index: usize) {
        self.coords.push(coord);
        self.indices.push(index);
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Keep the atoms whose mask entry is `true`, preserving their order.
    pub fn filter(&self, mask: &[bool]) -> AtomSet {
        assert_eq!(mask.len(), self.len(), "mask length must match atom count");
        let mut kept = AtomSet::with_capacity(mask.iter().filter(|&&m| m).count());
        for (i, &keep) in mask.iter().enumerate() {
            if keep {
                kept.push(self.coords[i], self.indices[i]);
            }
        }
        kept
    }
}
