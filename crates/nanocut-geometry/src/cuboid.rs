//! Axis-aligned cuboids used to bound the atom search.

use nalgebra::Vector3;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl Cuboid {
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest cuboid containing every point, or `None` for no points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f64>>,
    {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Cuboid::new(p, p)),
            Some(c) => Some(Cuboid::new(c.min.inf(&p), c.max.sup(&p))),
        })
    }

    /// Component-wise union of two cuboids.
    pub fn union(&self, other: &Cuboid) -> Cuboid {
        Cuboid::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Grow the cuboid by `margin` on every side.
    pub fn padded(&self, margin: f64) -> Cuboid {
        let m = Vector3::repeat(margin);
        Cuboid::new(self.min - m, self.max + m)
    }

    pub fn contains(&self, p: &Vector3<f64>) -> bool {
        (0..3).all(|k| p[k] >= self.min[k] && p[k] <= self.max[k])
    }

    /// The eight corners, `min` first and `max` last.
    pub fn corners(&self) -> [Vector3<f64>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_is_componentwise() {
        let a = Cuboid::new(Vector3::new(0.0, -1.0, 2.0), Vector3::new(1.0, 1.0, 3.0));
        let b = Cuboid::new(Vector3::new(-2.0, 0.0, 2.5), Vector3::new(0.5, 4.0, 2.6));
        let u = a.union(&b);
        assert_eq!(u.min, Vector3::new(-2.0, -1.0, 2.0));
        assert_eq!(u.max, Vector3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_from_points() {
        assert!(Cuboid::from_points(Vec::new()).is_none());
        let c = Cuboid::from_points(vec![
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-1.0, 5.0, 0.0),
        ])
        .unwrap();
        assert_eq!(c.min, Vector3::new(-1.0, 2.0, 0.0));
        assert_eq!(c.max, Vector3::new(1.0, 5.0, 3.0));
        assert!(c.contains(&Vector3::new(0.0, 3.0, 1.5)));
        assert!(!c.contains(&Vector3::new(0.0, 6.0, 1.5)));
    }
}
