use nalgebra::Vector3;
use nanocut_geometry::section::parse_section;
use nanocut_geometry::{ConfigError, CoordSys, Cuboid, Geometry, Section};
use serde::Deserialize;

use super::sphere::rename;
use super::TOLERANCE;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CylinderSection {
    point1: [f64; 3],
    point2: [f64; 3],
    radius: f64,
    #[serde(default)]
    points_coordsys: CoordSys,
}

/// A finite right circular cylinder between two end-cap centres.
#[derive(Debug, Clone)]
pub struct Cylinder {
    start: Vector3<f64>,
    end: Vector3<f64>,
    /// Unit axis from `start` to `end`.
    direction: Vector3<f64>,
    length: f64,
    radius: f64,
}

impl Cylinder {
    pub fn new(start: Vector3<f64>, end: Vector3<f64>, radius: f64) -> Result<Self, ConfigError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::invalid(
                "cylinder",
                format!("radius must be positive, got {}", radius),
            ));
        }
        let axis = end - start;
        let length = axis.norm();
        if !(length.is_finite() && length > TOLERANCE) {
            return Err(ConfigError::invalid(
                "cylinder",
                "end points must be distinct",
            ));
        }
        Ok(Self {
            start,
            end,
            direction: axis / length,
            length,
            radius,
        })
    }

    pub fn from_section(
        geometry: &Geometry,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: CylinderSection = parse_section(name, section)?;
        let start = geometry.to_cartesian(Vector3::from(raw.point1), raw.points_coordsys);
        let end = geometry.to_cartesian(Vector3::from(raw.point2), raw.points_coordsys);
        Self::new(start, end, raw.radius).map_err(|e| rename(e, name))
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Position along the axis, in `[0, length]` for points between the caps.
    pub fn axial(&self, point: &Vector3<f64>) -> f64 {
        (point - self.start).dot(&self.direction)
    }

    /// Distance from the axis line.
    pub fn radial(&self, point: &Vector3<f64>) -> f64 {
        let rel = point - self.start;
        (rel - self.direction * rel.dot(&self.direction)).norm()
    }

    /// The end caps are discs; their extent along axis `k` is
    /// `r·√(1 − dₖ²)` around the cap centre.
    pub fn containing_cuboid(&self) -> Cuboid {
        let r = self.radius + TOLERANCE;
        let reach = self.direction.map(|d| r * (1.0 - d * d).max(0.0).sqrt());
        Cuboid::new(
            self.start.inf(&self.end) - reach,
            self.start.sup(&self.end) + reach,
        )
        .padded(TOLERANCE)
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let t = self.axial(point);
        t >= -TOLERANCE
            && t <= self.length + TOLERANCE
            && self.radial(point) <= self.radius + TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axis_aligned_cylinder() {
        let c = Cylinder::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 4.0), 1.0).unwrap();
        assert!(c.contains(&Vector3::new(1.0, 0.0, 0.0)));
        assert!(c.contains(&Vector3::new(0.0, 0.0, 4.0)));
        assert!(!c.contains(&Vector3::new(0.0, 0.0, 4.1)));
        assert!(!c.contains(&Vector3::new(0.8, 0.8, 2.0)));

        let bounds = c.containing_cuboid();
        assert_abs_diff_eq!(bounds.min, Vector3::new(-1.0, -1.0, 0.0), epsilon = 1e-6);
        assert_abs_diff_eq!(bounds.max, Vector3::new(1.0, 1.0, 4.0), epsilon = 1e-6);
    }

    #[test]
    fn test_tilted_cylinder_bounds() {
        let c = Cylinder::new(Vector3::zeros(), Vector3::new(3.0, 3.0, 0.0), 1.0).unwrap();
        let bounds = c.containing_cuboid();
        let reach = 0.5_f64.sqrt();
        assert_abs_diff_eq!(bounds.max, Vector3::new(3.0 + reach, 3.0 + reach, 1.0), epsilon = 1e-6);
        assert!(c.contains(&Vector3::new(1.5 + reach, 1.5 - reach, 0.0)));
    }

    #[test]
    fn test_degenerate_cylinder() {
        let err = Cylinder::new(Vector3::zeros(), Vector3::zeros(), 1.0).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_from_section() {
        let geometry = Geometry::new(
            [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
            &[("Pt", [0.0; 3])],
            CoordSys::Lattice,
            1.0,
        )
        .unwrap();
        let section: Section =
            toml::from_str("point1 = [0, 0, -1]\npoint2 = [0, 0, 1]\nradius = 1.5").unwrap();
        let c = Cylinder::from_section(&geometry, "cylinder:rod", &section).unwrap();
        assert!(c.contains(&Vector3::new(1.5, 0.0, -2.0)));
        assert_abs_diff_eq!(c.radius(), 1.5);
    }
}
