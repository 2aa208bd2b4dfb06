//! Geometric bodies.
//!
//! Each body is a closed (or, for periodic bodies, half-open) region of
//! space with an analytic inside test and a conservative axis-aligned
//! bounding cuboid. Bodies are built once from their configuration section,
//! after the geometry and periodicity are known, and are immutable for the
//! rest of the run.
//!
//! The set of body types is closed. [`BodyKind`] is the registry mapping
//! configuration names to constructors, keyed by the periodicity class under
//! which each type is meaningful.

mod cylinder;
mod periodic;
mod polyhedron;
mod sphere;

pub use cylinder::Cylinder;
pub use periodic::{Parallelepiped, PeriodicCylinder, PeriodicPlane, PeriodicPrism, Supercell};
pub use polyhedron::{Plane, Polyhedron};
pub use sphere::Sphere;

use nalgebra::Vector3;
use nanocut_geometry::{ConfigError, Cuboid, Geometry, PeriodType, Periodicity, Section};
use rayon::prelude::*;

/// Tolerance on closed boundaries. Bounding cuboids are padded by it.
pub const TOLERANCE: f64 = 1e-8;

/// The registry of body types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Sphere,
    Polyhedron,
    Cylinder,
    Periodic1DCylinder,
    Periodic1DPrism,
    Periodic2DPlane,
    Periodic3DSupercell,
}

impl BodyKind {
    pub const ALL: [BodyKind; 7] = [
        BodyKind::Sphere,
        BodyKind::Polyhedron,
        BodyKind::Cylinder,
        BodyKind::Periodic1DCylinder,
        BodyKind::Periodic1DPrism,
        BodyKind::Periodic2DPlane,
        BodyKind::Periodic3DSupercell,
    ];

    /// The name used in `["<name>:<label>"]` section headers.
    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Sphere => "sphere",
            BodyKind::Polyhedron => "polyhedron",
            BodyKind::Cylinder => "cylinder",
            BodyKind::Periodic1DCylinder => "periodic_1D_cylinder",
            BodyKind::Periodic1DPrism => "periodic_1D_prism",
            BodyKind::Periodic2DPlane => "periodic_2D_plane",
            BodyKind::Periodic3DSupercell => "periodic_3D_supercell",
        }
    }

    /// The periodicity class this body type is allowed under.
    pub fn period_type(self) -> PeriodType {
        match self {
            BodyKind::Sphere | BodyKind::Polyhedron | BodyKind::Cylinder => PeriodType::Cluster,
            BodyKind::Periodic1DCylinder | BodyKind::Periodic1DPrism => PeriodType::Wire,
            BodyKind::Periodic2DPlane => PeriodType::Slab,
            BodyKind::Periodic3DSupercell => PeriodType::Bulk,
        }
    }

    /// Find the body type called `name` that is allowed under `period_type`.
    pub fn lookup(name: &str, period_type: PeriodType) -> Option<BodyKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name && kind.period_type() == period_type)
    }

    /// Construct a body of this kind from its section.
    pub fn build(
        self,
        geometry: &Geometry,
        periodicity: &Periodicity,
        section_name: &str,
        section: &Section,
    ) -> Result<Body, ConfigError> {
        let body = match self {
            BodyKind::Sphere => Body::Sphere(Sphere::from_section(geometry, section_name, section)?),
            BodyKind::Polyhedron => {
                Body::Polyhedron(Polyhedron::from_section(geometry, section_name, section)?)
            }
            BodyKind::Cylinder => {
                Body::Cylinder(Cylinder::from_section(geometry, section_name, section)?)
            }
            BodyKind::Periodic1DCylinder => Body::Periodic1DCylinder(
                PeriodicCylinder::from_section(geometry, periodicity, section_name, section)?,
            ),
            BodyKind::Periodic1DPrism => Body::Periodic1DPrism(PeriodicPrism::from_section(
                geometry,
                periodicity,
                section_name,
                section,
            )?),
            BodyKind::Periodic2DPlane => Body::Periodic2DPlane(PeriodicPlane::from_section(
                geometry,
                periodicity,
                section_name,
                section,
            )?),
            BodyKind::Periodic3DSupercell => Body::Periodic3DSupercell(Supercell::from_section(
                geometry,
                periodicity,
                section_name,
                section,
            )?),
        };
        Ok(body)
    }
}

/// A user-declared shape, resolved against the active geometry and
/// periodicity.
#[derive(Debug, Clone)]
pub enum Body {
    Sphere(Sphere),
    Polyhedron(Polyhedron),
    Cylinder(Cylinder),
    Periodic1DCylinder(PeriodicCylinder),
    Periodic1DPrism(PeriodicPrism),
    Periodic2DPlane(PeriodicPlane),
    Periodic3DSupercell(Supercell),
}

impl Body {
    pub fn kind(&self) -> BodyKind {
        match self {
            Body::Sphere(_) => BodyKind::Sphere,
            Body::Polyhedron(_) => BodyKind::Polyhedron,
            Body::Cylinder(_) => BodyKind::Cylinder,
            Body::Periodic1DCylinder(_) => BodyKind::Periodic1DCylinder,
            Body::Periodic1DPrism(_) => BodyKind::Periodic1DPrism,
            Body::Periodic2DPlane(_) => BodyKind::Periodic2DPlane,
            Body::Periodic3DSupercell(_) => BodyKind::Periodic3DSupercell,
        }
    }

    /// Axis-aligned cuboid containing every point this body accepts.
    pub fn containing_cuboid(&self) -> Cuboid {
        match self {
            Body::Sphere(b) => b.containing_cuboid(),
            Body::Polyhedron(b) => b.containing_cuboid(),
            Body::Cylinder(b) => b.containing_cuboid(),
            Body::Periodic1DCylinder(b) => b.containing_cuboid(),
            Body::Periodic1DPrism(b) => b.containing_cuboid(),
            Body::Periodic2DPlane(b) => b.containing_cuboid(),
            Body::Periodic3DSupercell(b) => b.containing_cuboid(),
        }
    }

    /// Check whether a single point lies inside this body.
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        match self {
            Body::Sphere(b) => b.contains(point),
            Body::Polyhedron(b) => b.contains(point),
            Body::Cylinder(b) => b.contains(point),
            Body::Periodic1DCylinder(b) => b.contains(point),
            Body::Periodic1DPrism(b) => b.contains(point),
            Body::Periodic2DPlane(b) => b.contains(point),
            Body::Periodic3DSupercell(b) => b.contains(point),
        }
    }

    /// One inclusion flag per point, in input order.
    pub fn atoms_inside(&self, points: &[Vector3<f64>]) -> Vec<bool> {
        points.par_iter().map(|p| self.contains(p)).collect()
    }
}

/// A body together with its combination mode.
#[derive(Debug, Clone)]
pub struct BodySpec {
    pub body: Body,
    /// Additive bodies add atoms to the selection; the others remove them.
    pub additive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_respects_periodicity() {
        assert_eq!(BodyKind::lookup("sphere", PeriodType::Cluster), Some(BodyKind::Sphere));
        assert_eq!(BodyKind::lookup("sphere", PeriodType::Wire), None);
        assert_eq!(
            BodyKind::lookup("periodic_2D_plane", PeriodType::Slab),
            Some(BodyKind::Periodic2DPlane)
        );
        assert_eq!(BodyKind::lookup("periodic_2D_plane", PeriodType::Bulk), None);
        assert_eq!(BodyKind::lookup("cube", PeriodType::Cluster), None);
    }

    #[test]
    fn test_registry_names_are_unique() {
        for a in BodyKind::ALL {
            let same = BodyKind::ALL.iter().filter(|b| b.name() == a.name()).count();
            assert_eq!(same, 1, "{}", a.name());
        }
    }

    #[test]
    fn test_atoms_inside_keeps_order() {
        let sphere = Body::Sphere(Sphere::new(Vector3::zeros(), 1.0).unwrap());
        let points = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(sphere.atoms_inside(&points), [true, false, true]);
        assert_eq!(sphere.kind(), BodyKind::Sphere);
    }
}
