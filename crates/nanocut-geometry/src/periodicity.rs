//! Periodicity class and axes of the structure being cut.
//!
//! The periodicity decides which bodies are meaningful (a bare sphere only
//! makes sense for a finite cluster), how selected atoms are folded back
//! into one periodic repeat unit, and how the result is oriented:
//!
//! | Class | Axes | Folding | Standard frame |
//! |-------|------|---------|----------------|
//! | `0D`  | none | none | unchanged |
//! | `1D`  | `a₁` | along `a₁` | `a₁` along +z |
//! | `2D`  | `a₁, a₂` | in the `a₁, a₂` plane | `a₁ × a₂` along +z |
//! | `3D`  | `a₁, a₂, a₃` | all directions | unchanged |
//!
//! Axes are given as integer vectors in lattice coordinates. Wire and slab
//! axes are reduced by the greatest common divisor of their components, so
//! they always describe the primitive period along their direction;
//! supercell axes are kept as given.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::lattice::Geometry;
use crate::section::{parse_section, CoordSys, Section};
use crate::transform::{align_with_z, rotate_all};

const SECTION: &str = "periodicity";

/// Fractional tolerance for folding: coordinates within this distance below
/// a cell boundary are treated as lying on it.
pub const FOLD_TOLERANCE: f64 = 1e-8;

/// The periodicity class of the output structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum PeriodType {
    /// Finite cluster (`0D`).
    #[default]
    #[serde(rename = "0D")]
    Cluster,
    /// Wire, periodic along one axis (`1D`).
    #[serde(rename = "1D")]
    Wire,
    /// Slab, periodic along two axes (`2D`).
    #[serde(rename = "2D")]
    Slab,
    /// Supercell, periodic along three axes (`3D`).
    #[serde(rename = "3D")]
    Bulk,
}

impl PeriodType {
    /// Number of periodic directions.
    pub fn dimension(self) -> usize {
        match self {
            PeriodType::Cluster => 0,
            PeriodType::Wire => 1,
            PeriodType::Slab => 2,
            PeriodType::Bulk => 3,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.dimension())
    }
}

/// `axis = [1, 1, 0]` or `axis = [[1, 0, 0], [0, 1, 0]]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AxisSpec {
    Single([i64; 3]),
    Many(Vec<[i64; 3]>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PeriodicitySection {
    #[serde(default)]
    period_type: PeriodType,
    axis: Option<AxisSpec>,
}

/// Periodicity of the structure: class, axes, folding, and orientation.
#[derive(Debug, Clone)]
pub struct Periodicity {
    period_type: PeriodType,
    /// Reduced axes in lattice coordinates.
    axis: Vec<[i64; 3]>,
    /// The same axes in cartesian coordinates.
    axis_cart: Vec<Vector3<f64>>,
    /// Inverse of the folding basis `[a₁, a₂, a₁×a₂]` (2D) or
    /// `[a₁, a₂, a₃]` (3D). Identity for the other classes.
    fold_inverse: Matrix3<f64>,
}

impl Periodicity {
    /// A finite cluster.
    pub fn cluster() -> Self {
        Self {
            period_type: PeriodType::Cluster,
            axis: Vec::new(),
            axis_cart: Vec::new(),
            fold_inverse: Matrix3::identity(),
        }
    }

    /// Validate the axes for `period_type` and resolve them against `geometry`.
    pub fn new(
        geometry: &Geometry,
        period_type: PeriodType,
        axis: &[[i64; 3]],
    ) -> Result<Self, ConfigError> {
        let dim = period_type.dimension();
        if axis.len() != dim {
            return Err(ConfigError::InvalidPeriodicity(format!(
                "{} periodicity needs {} axis vector(s), got {}",
                period_type,
                dim,
                axis.len()
            )));
        }

        let axis = axis
            .iter()
            .map(|a| match period_type {
                PeriodType::Bulk => nonzero_axis(*a),
                _ => reduce_axis(*a),
            })
            .collect::<Result<Vec<_>, _>>()?;

        match period_type {
            PeriodType::Slab if int_cross(&axis[0], &axis[1]) == [0, 0, 0] => {
                return Err(ConfigError::InvalidPeriodicity(
                    "axes are parallel".to_string(),
                ));
            }
            PeriodType::Bulk if int_det(&axis[0], &axis[1], &axis[2]) == 0 => {
                return Err(ConfigError::InvalidPeriodicity(
                    "axes are coplanar".to_string(),
                ));
            }
            _ => {}
        }

        let axis_cart: Vec<Vector3<f64>> = axis
            .iter()
            .map(|a| {
                geometry.to_cartesian(
                    Vector3::new(a[0] as f64, a[1] as f64, a[2] as f64),
                    CoordSys::Lattice,
                )
            })
            .collect();

        let fold_basis = match period_type {
            PeriodType::Slab => Some(Matrix3::from_columns(&[
                axis_cart[0],
                axis_cart[1],
                axis_cart[0].cross(&axis_cart[1]),
            ])),
            PeriodType::Bulk => Some(Matrix3::from_columns(&[
                axis_cart[0],
                axis_cart[1],
                axis_cart[2],
            ])),
            _ => None,
        };
        let fold_inverse = match fold_basis {
            Some(basis) => basis.try_inverse().ok_or_else(|| {
                ConfigError::InvalidPeriodicity("axes do not span a cell".to_string())
            })?,
            None => Matrix3::identity(),
        };

        Ok(Self {
            period_type,
            axis,
            axis_cart,
            fold_inverse,
        })
    }

    /// Build from the optional `[periodicity]` section; absent means `0D`.
    pub fn from_section(
        geometry: &Geometry,
        section: Option<&Section>,
    ) -> Result<Self, ConfigError> {
        let Some(section) = section else {
            return Ok(Self::cluster());
        };
        let raw: PeriodicitySection = parse_section(SECTION, section)?;
        let axis = match raw.axis {
            None => Vec::new(),
            Some(AxisSpec::Single(a)) => vec![a],
            Some(AxisSpec::Many(list)) => list,
        };
        Self::new(geometry, raw.period_type, &axis)
    }

    pub fn period_type(&self) -> PeriodType {
        self.period_type
    }

    /// Reduced axes in lattice coordinates.
    pub fn axis(&self) -> &[[i64; 3]] {
        &self.axis
    }

    /// Axes in cartesian coordinates.
    pub fn axis_cartesian(&self) -> &[Vector3<f64>] {
        &self.axis_cart
    }

    /// Map every coordinate onto its representative in the periodic repeat
    /// unit, in place.
    ///
    /// Fractional coordinates along the periodic directions end up in
    /// `[-FOLD_TOLERANCE, 1 - FOLD_TOLERANCE)`, so folding twice is the same
    /// as folding once. The non-periodic component of a slab is untouched.
    pub fn fold_to_unitcell(&self, coords: &mut [Vector3<f64>]) {
        match self.period_type {
            PeriodType::Cluster => {}
            PeriodType::Wire => {
                let a = self.axis_cart[0];
                let norm_sq = a.norm_squared();
                for p in coords.iter_mut() {
                    let n = (p.dot(&a) / norm_sq + FOLD_TOLERANCE).floor();
                    *p -= a * n;
                }
            }
            PeriodType::Slab | PeriodType::Bulk => {
                let periodic = self.period_type.dimension();
                for p in coords.iter_mut() {
                    let frac = self.fold_inverse * *p;
                    let mut shift = Vector3::zeros();
                    for k in 0..periodic {
                        shift += self.axis_cart[k] * (frac[k] + FOLD_TOLERANCE).floor();
                    }
                    *p -= shift;
                }
            }
        }
    }

    /// Rotate coordinates and axes into the standard frame.
    ///
    /// Returns `(axes, coordinates)`; the number of axes equals the
    /// periodicity dimension.
    pub fn rotate_coordsys(&self, coords: &[Vector3<f64>]) -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
        let z_axis = match self.period_type {
            PeriodType::Cluster | PeriodType::Bulk => {
                return (self.axis_cart.clone(), coords.to_vec());
            }
            PeriodType::Wire => self.axis_cart[0],
            PeriodType::Slab => self.axis_cart[0].cross(&self.axis_cart[1]),
        };

        let rotation = align_with_z(&z_axis);
        log::debug!("Rotation into standard frame: {}", rotation.matrix());
        (rotate_all(&rotation, &self.axis_cart), rotate_all(&rotation, coords))
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn nonzero_axis(v: [i64; 3]) -> Result<[i64; 3], ConfigError> {
    if v == [0, 0, 0] {
        return Err(ConfigError::InvalidPeriodicity(
            "axis vector must not be zero".to_string(),
        ));
    }
    Ok(v)
}

fn reduce_axis(v: [i64; 3]) -> Result<[i64; 3], ConfigError> {
    let v = nonzero_axis(v)?;
    let g = gcd(gcd(v[0], v[1]), v[2]);
    Ok(v.map(|c| c / g))
}

fn int_cross(a: &[i64; 3], b: &[i64; 3]) -> [i64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn int_det(a: &[i64; 3], b: &[i64; 3], c: &[i64; 3]) -> i64 {
    let axb = int_cross(a, b);
    axb[0] * c[0] + axb[1] * c[1] + axb[2] * c[2]
}
