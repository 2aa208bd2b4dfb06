//! Convex polyhedra bounded by half-spaces.
//!
//! A polyhedron is the intersection of half-spaces `n̂ᵢ·(p − s) ≤ dᵢ` around
//! a shift point `s`. Its bounding cuboid is spanned by its vertices, found
//! by intersecting every triple of planes; this requires the polyhedron to
//! be bounded, which is checked on construction.

use nalgebra::{Matrix3, Vector3};
use nanocut_geometry::section::parse_section;
use nanocut_geometry::{ConfigError, CoordSys, Cuboid, Geometry, Section};
use serde::Deserialize;

use super::sphere::rename;
use super::TOLERANCE;

/// Slack when accepting a plane-triple intersection as a vertex.
const VERTEX_EPS: f64 = 1e-6;
/// Below this a plane triple is treated as having no unique intersection.
const SINGULAR_EPS: f64 = 1e-12;

/// Resolve `planes_normal` and `planes_miller` rows into cartesian planes,
/// normals first.
pub(super) fn resolve_planes(
    geometry: &Geometry,
    name: &str,
    planes_normal: &[[f64; 4]],
    planes_normal_coordsys: CoordSys,
    planes_miller: &[[f64; 4]],
) -> Result<Vec<Plane>, ConfigError> {
    let normals = planes_normal.iter().map(|row| {
        let n = geometry.to_cartesian(Vector3::new(row[0], row[1], row[2]), planes_normal_coordsys);
        (n, row[3])
    });
    let millers = planes_miller
        .iter()
        .map(|row| (geometry.miller_normal(Vector3::new(row[0], row[1], row[2])), row[3]));
    normals
        .chain(millers)
        .map(|(n, d)| Plane::new(n, d).map_err(|e| rename(e, name)))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolyhedronSection {
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

/// A half-space `n̂·x ≤ d` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub distance: f64,
}

impl Plane {
    /// Normalise `normal`; `distance` is measured along the unit normal.
    pub fn new(normal: Vector3<f64>, distance: f64) -> Result<Self, ConfigError> {
        let norm = normal.norm();
        if !(norm.is_finite() && norm > SINGULAR_EPS) || !distance.is_finite() {
            return Err(ConfigError::invalid(
                "polyhedron",
                format!("invalid plane normal {:?}", normal.as_slice()),
            ));
        }
        Ok(Self {
            normal: normal / norm,
            distance,
        })
    }

    fn accepts(&self, x: &Vector3<f64>, slack: f64) -> bool {
        self.normal.dot(x) <= self.distance + slack
    }
}

/// A bounded convex polyhedron.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    planes: Vec<Plane>,
    shift: Vector3<f64>,
    bounds: Cuboid,
}

impl Polyhedron {
    pub fn new(planes: Vec<Plane>, shift: Vector3<f64>) -> Result<Self, ConfigError> {
        if planes.is_empty() {
            return Err(ConfigError::invalid(
                "polyhedron",
                "at least one plane is required",
            ));
        }
        if !is_bounded(&planes) {
            return Err(ConfigError::invalid("polyhedron", "planes do not enclose a bounded region"));
        }

        let vertices = vertices(&planes);
        let bounds = Cuboid::from_points(vertices.into_iter().map(|v| v + shift))
            .ok_or_else(|| ConfigError::invalid("polyhedron", "planes enclose an empty region"))?
            .padded(TOLERANCE);

        Ok(Self {
            planes,
            shift,
            bounds,
        })
    }

    pub fn from_section(
        geometry: &Geometry,
        name: &str,
        section: &Section,
    ) -> Result<Self, ConfigError> {
        let raw: PolyhedronSection = parse_section(name, section)?;
        let planes = resolve_planes(
            geometry,
            name,
            &raw.planes_normal,
            raw.planes_normal_coordsys,
            &raw.planes_miller,
        )?;
        let shift = geometry.to_cartesian(Vector3::from(raw.shift_vector), raw.shift_vector_coordsys);
        Self::new(planes, shift).map_err(|e| rename(e, name))
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn containing_cuboid(&self) -> Cuboid {
        self.bounds
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let x = point - self.shift;
        self.planes.iter().all(|plane| plane.accepts(&x, TOLERANCE))
    }
}

/// A convex polyhedron is bounded iff its recession cone `{u : n̂ᵢ·u ≤ 0}`
/// is trivial. With full-rank normals the cone is pointed, so it is
/// non-trivial iff one of its extreme rays `±(n̂ᵢ × n̂ⱼ)` lies in it.
fn is_bounded(planes: &[Plane]) -> bool {
    let mut rank_three = false;
    for (i, a) in planes.iter().enumerate() {
        for b in &planes[i + 1..] {
            for c in planes {
                if a.normal.cross(&b.normal).dot(&c.normal).abs() > SINGULAR_EPS {
                    rank_three = true;
                }
            }
        }
    }
    if !rank_three {
        return false;
    }

    for (i, a) in planes.iter().enumerate() {
        for b in &planes[i + 1..] {
            let ray = a.normal.cross(&b.normal);
            let norm = ray.norm();
            if norm <= SINGULAR_EPS {
                continue;
            }
            for u in [ray / norm, -ray / norm] {
                if planes.iter().all(|p| p.normal.dot(&u) <= SINGULAR_EPS) {
                    return false;
                }
            }
        }
    }
    true
}

/// Vertices of the polyhedron relaxed by `TOLERANCE`, relative to the shift.
fn vertices(planes: &[Plane]) -> Vec<Vector3<f64>> {
    let mut found = Vec::new();
    let n = planes.len();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let (a, b, c) = (&planes[i], &planes[j], &planes[k]);
                let m = Matrix3::from_rows(&[
                    a.normal.transpose(),
                    b.normal.transpose(),
                    c.normal.transpose(),
                ]);
                if m.determinant().abs() <= SINGULAR_EPS {
                    continue;
                }
                let Some(inv) = m.try_inverse() else {
                    continue;
                };
                let rhs = Vector3::new(a.distance, b.distance, c.distance)
                    .add_scalar(TOLERANCE);
                let x = inv * rhs;
                let slack = TOLERANCE + VERTEX_EPS * (1.0 + x.norm());
                if planes.iter().all(|p| p.accepts(&x, slack)) {
                    found.push(x);
                }
            }
        }
    }
    found
}
