//! Crystal lattice geometry and atom generation.
//!
//! A [`Geometry`] is an infinite crystal: three lattice vectors (scaled by a
//! length unit) and a basis of atoms repeated at every lattice point. The
//! selection engine never enumerates the crystal itself; it asks the geometry
//! for the lattice points around a bounding cuboid ([`Geometry::gen_cuboid`])
//! and for the atoms sitting on those points ([`Geometry::gen_atoms`]).

use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;

use crate::atoms::AtomSet;
use crate::cuboid::Cuboid;
use crate::error::ConfigError;
use crate::section::{parse_section, CoordSys, Section};

/// A lattice point in integer lattice coordinates.
pub type LatticePoint = [i64; 3];

const SECTION: &str = "geometry";
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Largest number of lattice points generated for one selection region.
pub const MAX_LATTICE_POINTS: u64 = 50_000_000;

/// Fractional coordinates beyond this magnitude are not enumerated.
const MAX_LATTICE_INDEX: f64 = 1e12;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeometrySection {
    /// Rows are the lattice vectors, before scaling.
    lattice_vectors: [[f64; 3]; 3],
    basis: Vec<BasisEntry>,
    #[serde(default)]
    basis_coordsys: CoordSys,
    #[serde(default = "default_lengthunit")]
    lengthunit: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BasisEntry {
    species: String,
    position: [f64; 3],
}

fn default_lengthunit() -> f64 {
    1.0
}

/// One atom of the lattice basis.
#[derive(Debug, Clone)]
pub struct BasisAtom {
    /// Index into [`Geometry::species`].
    pub species: usize,
    /// Cartesian offset from the lattice point.
    pub position: Vector3<f64>,
}

/// An infinite crystal lattice with its atomic basis.
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Lattice vectors as columns, already scaled by the length unit.
    lattice: Matrix3<f64>,
    inverse: Matrix3<f64>,
    species: Vec<String>,
    basis: Vec<BasisAtom>,
}

impl Geometry {
    /// Build a geometry from unscaled lattice vectors (rows) and a basis.
    ///
    /// `lengthunit` scales the lattice vectors only. Basis positions in
    /// lattice coordinates therefore follow the scaling, while cartesian
    /// positions are taken as given.
    pub fn new(
        lattice_vectors: [[f64; 3]; 3],
        basis: &[(&str, [f64; 3])],
        basis_coordsys: CoordSys,
        lengthunit: f64,
    ) -> Result<Self, ConfigError> {
        if !(lengthunit.is_finite() && lengthunit > 0.0) {
            return Err(ConfigError::invalid(
                SECTION,
                format!("lengthunit must be positive, got {}", lengthunit),
            ));
        }

        let lattice = Matrix3::from_columns(&[
            Vector3::from(lattice_vectors[0]),
            Vector3::from(lattice_vectors[1]),
            Vector3::from(lattice_vectors[2]),
        ]) * lengthunit;

        if lattice.determinant().abs() < SINGULAR_TOLERANCE {
            return Err(ConfigError::invalid(
                SECTION,
                "lattice vectors are linearly dependent",
            ));
        }
        let inverse = lattice
            .try_inverse()
            .ok_or_else(|| ConfigError::invalid(SECTION, "lattice matrix is not invertible"))?;

        if basis.is_empty() {
            return Err(ConfigError::invalid(
                SECTION,
                "basis must contain at least one atom",
            ));
        }

        let mut species: Vec<String> = Vec::new();
        let mut atoms = Vec::with_capacity(basis.len());
        for &(name, position) in basis {
            let index = match species.iter().position(|s| s == name) {
                Some(i) => i,
                None => {
                    species.push(name.to_string());
                    species.len() - 1
                }
            };
            let position = Vector3::from(position);
            let position = match basis_coordsys {
                CoordSys::Lattice => lattice * position,
                CoordSys::Cartesian => position,
            };
            atoms.push(BasisAtom {
                species: index,
                position,
            });
        }

        Ok(Self {
            lattice,
            inverse,
            species,
            basis: atoms,
        })
    }

    /// Build the geometry from the `[geometry]` configuration section.
    pub fn from_section(section: &Section) -> Result<Self, ConfigError> {
        let raw: GeometrySection = parse_section(SECTION, section)?;
        let basis: Vec<(&str, [f64; 3])> = raw
            .basis
            .iter()
            .map(|b| (b.species.as_str(), b.position))
            .collect();
        Self::new(raw.lattice_vectors, &basis, raw.basis_coordsys, raw.lengthunit)
    }

    /// The `i`-th scaled lattice vector.
    pub fn lattice_vector(&self, i: usize) -> Vector3<f64> {
        self.lattice.column(i).into_owned()
    }

    /// Species names in order of first appearance in the basis.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn basis(&self) -> &[BasisAtom] {
        &self.basis
    }

    /// Convert a configured vector to cartesian coordinates.
    pub fn to_cartesian(&self, v: Vector3<f64>, coordsys: CoordSys) -> Vector3<f64> {
        match coordsys {
            CoordSys::Lattice => self.lattice * v,
            CoordSys::Cartesian => v,
        }
    }

    /// Convert cartesian coordinates to fractional lattice coordinates.
    pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> {
        self.inverse * cart
    }

    /// Reciprocal vectors `bᵢ` as columns, normalised so that `aᵢ·bⱼ = δᵢⱼ`.
    pub fn reciprocal_vectors(&self) -> Matrix3<f64> {
        self.inverse.transpose()
    }

    /// Cartesian normal of the lattice plane family with Miller indices `hkl`.
    pub fn miller_normal(&self, hkl: Vector3<f64>) -> Vector3<f64> {
        self.reciprocal_vectors() * hkl
    }

    /// Every lattice point that may carry an atom inside `region`.
    ///
    /// The region, shifted by each basis offset, is mapped into fractional
    /// coordinates; since the map is linear, the extreme fractional values
    /// are attained at the corners. The returned box of integer points is a
    /// superset of the points actually needed. Boxes with more than
    /// [`MAX_LATTICE_POINTS`] points are rejected.
    pub fn gen_cuboid(&self, region: &Cuboid) -> Result<Vec<LatticePoint>, ConfigError> {
        if (0..3).any(|k| region.min[k] > region.max[k]) {
            return Ok(Vec::new());
        }

        let mut lo = Vector3::repeat(f64::INFINITY);
        let mut hi = Vector3::repeat(f64::NEG_INFINITY);
        for atom in &self.basis {
            for corner in region.corners() {
                let frac = self.to_fractional(&(corner - atom.position));
                lo = lo.inf(&frac);
                hi = hi.sup(&frac);
            }
        }

        let too_large = || ConfigError::RegionTooLarge {
            region: format!("{:?}..{:?}", region.min.as_slice(), region.max.as_slice()),
            limit: MAX_LATTICE_POINTS,
        };
        let mut bounds = [(0_i64, 0_i64); 3];
        let mut count: u64 = 1;
        for k in 0..3 {
            let (first, last) = (lo[k].floor(), hi[k].ceil());
            if !(first.abs() <= MAX_LATTICE_INDEX && last.abs() <= MAX_LATTICE_INDEX) {
                return Err(too_large());
            }
            let (first, last) = (first as i64, last as i64);
            let extent = last
                .checked_sub(first)
                .and_then(|d| d.checked_add(1))
                .ok_or_else(too_large)? as u64;
            count = count
                .checked_mul(extent)
                .filter(|&c| c <= MAX_LATTICE_POINTS)
                .ok_or_else(too_large)?;
            bounds[k] = (first, last);
        }

        let mut points = Vec::with_capacity(count as usize);
        for i in bounds[0].0..=bounds[0].1 {
            for j in bounds[1].0..=bounds[1].1 {
                for k in bounds[2].0..=bounds[2].1 {
                    points.push([i, j, k]);
                }
            }
        }

        log::debug!(
            "Lattice points for region {:?}..{:?}: {} ({:?})",
            region.min.as_slice(),
            region.max.as_slice(),
            points.len(),
            bounds
        );
        Ok(points)
    }

    /// Place the basis at every lattice point, lattice-point-major.
    pub fn gen_atoms(&self, points: &[LatticePoint]) -> AtomSet {
        let mut atoms = AtomSet::with_capacity(points.len() * self.basis.len());
        for p in points {
            let origin = self.lattice * Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64);
            for atom in &self.basis {
                atoms.push(origin + atom.position, atom.species);
            }
        }
        atoms
    }
}
