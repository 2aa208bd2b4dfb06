//! Bodies describing one periodic repeat unit.
//!
//! A periodic body selects exactly one image of every atom of the repeat
//! unit: along each periodicity axis it accepts the half-open fractional
//! interval `[-TOLERANCE, 1 - TOLERANCE)`, matching the convention used when
//! folding atoms into the unit cell. Across the non-periodic directions the
//! boundaries are closed, as for the finite bodies.

use nalgebra::{Matrix3, Vector3};
use nanocut_geometry::section::parse_section;
use nanocut_geometry::{ConfigError, CoordSys, Cuboid, Geometry, Periodicity, Section};
use serde::Deserialize;

use super::cylinder::Cylinder;
use super::polyhedron::{resolve_planes, Plane, Polyhedron};
use super::sphere::rename;
use super::TOLERANCE;

fn in_period(fraction: f64) -> bool {
    (-TOLERANCE..1.0 - TOLERANCE).contains(&fraction)
}

/// The periodicity axes, checked against the number the body needs.
fn periodic_axes<'a>(
    periodicity: &'a Periodicity,
    count: usize,
    name: &str,
) -> Result<&'a [Vector3<f64>], ConfigError> {
    let axes = periodicity.axis_cartesian();
    if axes.len() != count {
        return Err(ConfigError::invalid(
            name,
            format!(
                "body needs {} periodicity axis vector(s), periodicity has {}",
                count,
                axes.len()
            ),
        ));
    }
    Ok(axes)
}

/// Tight bounds of `origin + Σ fⱼ·eⱼ` for every `fⱼ ∈ [lo, hi]`.
pub fn parallelepiped_bounds(origin: &Vector3<f64>, edges: &Matrix3<f64>, lo: f64, hi: f64) -> Cuboid {
    let mut min = *origin;
    let mut max = *origin;
    for j in 0..3 {
        let edge = edges.column(j);
        for k in 0..3 {
            let (a, b) = (lo * edge[k], hi * edge[k]);
            min[k] += a.min(b);
            max[k] += a.max(b);
        }
    }
    Cuboid::new(min, max)
}

/// The half-open cell `origin + Σ fⱼ·eⱼ`, `fⱼ ∈ [-TOLERANCE, 1 - TOLERANCE)`.
#[derive(Debug, Clone)]
pub struct Parallelepiped {
    origin: Vector3<f64>,
    /// Edge vectors as columns.
    edges: Matrix3<f64>,
    inverse: Matrix3<f64>,
}

impl Parallelepiped {
    pub fn new(origin: Vector3<f64>, edges: [Vector3<f64>; 3]) -> Result<Self, ConfigError> {
        let edges = Matrix3::from_columns(&edges);
        let inverse = edges
            .try_inverse()
            .filter(|_| edges.determinant().abs() > TOLERANCE)
            .ok_or_else(|| ConfigError::InvalidPeriodicity("cell edges are linearly dependent".to_string()))?;
        Ok(Self {
            origin,
            edges,
            inverse,
        })
    }

    /// Coordinates of `point` along the edges.
    pub fn fractional(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * (point - self.origin)
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        parallelepiped_bounds(&self.origin, &self.edges, -TOLERANCE, 1.0).padded(TOLERANCE)
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        self.fractional(point).iter().all(|&f| in_period(f))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeriodicCylinderSection {
    radius: f64,
    #[serde(default)]
    shift_vector: [f64; 3],
    #[serde(default)]
    shift_vector_coordsys: CoordSys,
}

/// One period of an infinite cylinder around the wire axis.
#[derive(Debug, Clone)]
pub struct PeriodicCylinder {
    axis: Vector3<f64>,
    shift: Vector3<f64>,
    /// Finite cylinder over one period, used for the radial test and bounds.
    envelope: Cylinder,
}

impl PeriodicCylinder {
    pub fn new(axis: Vector3<f64>, shift: Vector3<f64>, radius: f64) -> Result<Self, ConfigError> {
        let envelope = Cylinder::new(shift - axis * TOLERANCE, shift + axis, radius)?;
        Ok(Self {
            axis,
            shift,
            envelope,
        })
    }

    pub fn from_section(
        geometry: &Geometry,
        periodicity: &Periodicity,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: PeriodicCylinderSection = parse_section(name, section)?;
        let axes = periodic_axes(periodicity, 1, name)?;
        let shift = geometry.to_cartesian(Vector3::from(raw.shift_vector), raw.shift_vector_coordsys);
        Self::new(axes[0], shift, raw.radius).map_err(|e| rename(e, name))
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        self.envelope.containing_cuboid()
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let t = (point - self.shift).dot(&self.axis) / self.axis.norm_squared();
        in_period(t) && self.envelope.radial(point) <= self.envelope.radius() + TOLERANCE
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeriodicPrismSection {
    #[serde(default)]
    planes_normal: Vec<[f64; 4]>,
    #[serde(default)]
    planes_normal_coordsys: CoordSys,
    #[serde(default)]
    planes_miller: Vec<[f64; 4]>,
    #[serde(default)]
    shift_vector: [f64; 3],
    #[serde(default)]
    shift_vector_coordsys: CoordSys,
}

/// One period of an infinite prism whose side faces are parallel to the
/// wire axis.
#[derive(Debug, Clone)]
pub struct PeriodicPrism {
    sides: Vec<Plane>,
    axis: Vector3<f64>,
    shift: Vector3<f64>,
    /// The side faces closed by two caps one period apart.
    envelope: Polyhedron,
}

impl PeriodicPrism {
    pub fn new(sides: Vec<Plane>, axis: Vector3<f64>, shift: Vector3<f64>) -> Result<Self, ConfigError> {
        let length = axis.norm();
        let direction = axis / length;
        if let Some(tilted) = sides
            .iter()
            .find(|p| p.normal.dot(&direction).abs() > TOLERANCE)
        {
            return Err(ConfigError::invalid(
                "periodic_1D_prism",
                format!(
                    "plane normal {:?} is not perpendicular to the periodicity axis",
                    tilted.normal.as_slice()
                ),
            ));
        }

        let mut planes = sides.clone();
        planes.push(Plane::new(direction, length)?);
        planes.push(Plane::new(-direction, TOLERANCE * length)?);
        let envelope = Polyhedron::new(planes, shift)?;

        Ok(Self {
            sides,
            axis,
            shift,
            envelope,
        })
    }

    pub fn from_section(
        geometry: &Geometry,
        periodicity: &Periodicity,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: PeriodicPrismSection = parse_section(name, section)?;
        let axes = periodic_axes(periodicity, 1, name)?;
        let sides = resolve_planes(
            geometry,
            name,
            &raw.planes_normal,
            raw.planes_normal_coordsys,
            &raw.planes_miller,
        )?;
        let shift = geometry.to_cartesian(Vector3::from(raw.shift_vector), raw.shift_vector_coordsys);
        Self::new(sides, axes[0], shift).map_err(|e| rename(e, name))
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        self.envelope.containing_cuboid()
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let rel = point - self.shift;
        let t = rel.dot(&self.axis) / self.axis.norm_squared();
        in_period(t)
            && self
                .sides
                .iter()
                .all(|p| p.normal.dot(&rel) <= p.distance + TOLERANCE)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeriodicPlaneSection {
    thickness: f64,
    #[serde(default)]
    shift_vector: [f64; 3],
    #[serde(default)]
    shift_vector_coordsys: CoordSys,
}

/// One in-plane cell of a slab of given thickness above the shift point.
#[derive(Debug, Clone)]
pub struct PeriodicPlane {
    cell: Parallelepiped,
}

impl PeriodicPlane {
    pub fn new(
        axes: [Vector3<f64>; 2],
        shift: Vector3<f64>,
        thickness: f64,
    ) -> Result<Self, ConfigError> {
        if !(thickness.is_finite() && thickness > 0.0) {
            return Err(ConfigError::invalid(
                "periodic_2D_plane",
                format!("thickness must be positive, got {}", thickness),
            ));
        }
        let normal = axes[0].cross(&axes[1]).normalize();
        let cell = Parallelepiped::new(shift, [axes[0], axes[1], normal * thickness])?;
        Ok(Self { cell })
    }

    pub fn from_section(
        geometry: &Geometry,
        periodicity: &Periodicity,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: PeriodicPlaneSection = parse_section(name, section)?;
        let axes = periodic_axes(periodicity, 2, name)?;
        let shift = geometry.to_cartesian(Vector3::from(raw.shift_vector), raw.shift_vector_coordsys);
        Self::new([axes[0], axes[1]], shift, raw.thickness).map_err(|e| rename(e, name))
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        self.cell.containing_cuboid()
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        self.cell.contains(point)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SupercellSection {
    #[serde(default)]
    shift_vector: [f64; 3],
    #[serde(default)]
    shift_vector_coordsys: CoordSys,
}

/// The supercell spanned by the three periodicity axes.
#[derive(Debug, Clone)]
pub struct Supercell {
    cell: Parallelepiped,
}

impl Supercell {
    pub fn new(axes: [Vector3<f64>; 3], shift: Vector3<f64>) -> Result<Self, ConfigError> {
        Ok(Self {
            cell: Parallelepiped::new(shift, axes)?,
        })
    }

    pub fn from_section(
        geometry: &Geometry,
        periodicity: &Periodicity,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: SupercellSection = parse_section(name, section)?;
        let axes = periodic_axes(periodicity, 3, name)?;
        let shift = geometry.to_cartesian(Vector3::from(raw.shift_vector), raw.shift_vector_coordsys);
        Self::new([axes[0], axes[1], axes[2]], shift)
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        self.cell.containing_cuboid()
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        self.cell.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nanocut_geometry::PeriodType;

    fn cubic() -> Geometry {
        Geometry::new(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &[("Si", [0.0; 3])],
            CoordSys::Lattice,
            2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_parallelepiped_is_half_open() {
        let cell = Parallelepiped::new(
            Vector3::zeros(),
            [Vector3::x() * 2.0, Vector3::y() * 2.0, Vector3::z() * 2.0],
        )
        .unwrap();
        assert!(cell.contains(&Vector3::new(0.0, 0.0, 0.0)));
        assert!(cell.contains(&Vector3::new(1.999, 1.0, 0.5)));
        assert!(!cell.contains(&Vector3::new(2.0, 1.0, 0.5)));
        assert!(!cell.contains(&Vector3::new(-0.01, 1.0, 0.5)));
    }

    #[test]
    fn test_parallelepiped_bounds_of_sheared_cell() {
        let edges = Matrix3::from_columns(&[
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-0.5, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]);
        let b = parallelepiped_bounds(&Vector3::zeros(), &edges, 0.0, 1.0);
        assert_abs_diff_eq!(b.min, Vector3::new(-0.5, 0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(b.max, Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_periodic_cylinder_selects_one_period() {
        let g = cubic();
        let p = Periodicity::new(&g, PeriodType::Wire, &[[0, 0, 1]]).unwrap();
        let section: Section = toml::from_str("radius = 2.5").unwrap();
        let body = PeriodicCylinder::from_section(&g, &p, "periodic_1D_cylinder:w", &section).unwrap();

        assert!(body.contains(&Vector3::new(2.0, 0.0, 0.0)));
        assert!(!body.contains(&Vector3::new(0.0, 0.0, 2.0)));
        assert!(!body.contains(&Vector3::new(2.0, 2.0, 0.0)));

        let bounds = body.containing_cuboid();
        assert!(bounds.min.z < 0.0 && bounds.max.z >= 2.0);
    }

    #[test]
    fn test_periodic_prism() {
        let g = cubic();
        let p = Periodicity::new(&g, PeriodType::Wire, &[[0, 0, 1]]).unwrap();
        let section: Section = toml::from_str(
            r#"
            planes_normal = [[1, 0, 0, 3], [-1, 0, 0, 3], [0, 1, 0, 3], [0, -1, 0, 3]]
            planes_normal_coordsys = "cartesian"
            "#,
        )
        .unwrap();
        let body = PeriodicPrism::from_section(&g, &p, "periodic_1D_prism:w", &section).unwrap();
        assert!(body.contains(&Vector3::new(3.0, -3.0, 0.0)));
        assert!(!body.contains(&Vector3::new(3.0, -3.0, 2.0)));
        assert!(!body.contains(&Vector3::new(4.0, 0.0, 0.0)));

        let bounds = body.containing_cuboid();
        assert_abs_diff_eq!(bounds.max, Vector3::new(3.0, 3.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_prism_rejects_tilted_planes() {
        let g = cubic();
        let p = Periodicity::new(&g, PeriodType::Wire, &[[0, 0, 1]]).unwrap();
        let section: Section = toml::from_str("planes_normal = [[1, 0, 1, 3]]").unwrap();
        let err = PeriodicPrism::from_section(&g, &p, "periodic_1D_prism:w", &section).unwrap_err();
        assert!(err.to_string().contains("perpendicular"));
        assert!(err.to_string().contains("periodic_1D_prism:w"));
    }

    #[test]
    fn test_periodic_plane() {
        let g = cubic();
        let p = Periodicity::new(&g, PeriodType::Slab, &[[1, 0, 0], [0, 1, 0]]).unwrap();
        let section: Section = toml::from_str("thickness = 3.0").unwrap();
        let body = PeriodicPlane::from_section(&g, &p, "periodic_2D_plane:s", &section).unwrap();
        assert!(body.contains(&Vector3::new(0.0, 0.0, 2.0)));
        assert!(!body.contains(&Vector3::new(0.0, 0.0, 3.0)));
        assert!(!body.contains(&Vector3::new(2.0, 0.0, 0.0)));
        assert!(body.containing_cuboid().contains(&Vector3::new(1.9, 1.9, 2.9)));
    }

    #[test]
    fn test_supercell_needs_three_axes() {
        let g = cubic();
        let wire = Periodicity::new(&g, PeriodType::Wire, &[[0, 0, 1]]).unwrap();
        let section = Section::new();
        assert!(Supercell::from_section(&g, &wire, "periodic_3D_supercell:c", &section).is_err());

        let bulk = Periodicity::new(&g, PeriodType::Bulk, &[[1, 1, 0], [-1, 1, 0], [0, 0, 1]]).unwrap();
        let cell = Supercell::from_section(&g, &bulk, "periodic_3D_supercell:c", &section).unwrap();
        assert!(cell.contains(&Vector3::new(0.0, 1.0, 0.0)));
        assert!(!cell.contains(&Vector3::new(0.0, -1.0, 0.0)));
    }
}
