//! # nanocut Geometry
//!
//! Lattice-side collaborators of the nanocut pipeline. This crate provides:
//!
//! - **Configuration sections** ([`section`]) — Ordered TOML sections and
//!   the [`ConfigError`](error::ConfigError) taxonomy shared by every crate.
//! - **Lattice geometry** ([`lattice`]) — Lattice vectors, basis atoms, and
//!   generation of lattice points and atoms inside a bounding cuboid.
//! - **Periodicity** ([`periodicity`]) — Periodicity class and axes, folding
//!   into the unit cell, and rotation into the standard frame.
//! - **Transformations** ([`transform`]) — Rotations used to reorient
//!   periodic structures.
//! - **Output** ([`output`]) — XYZ and DFTB+ gen writers.

pub mod atoms;
pub mod cuboid;
pub mod error;
pub mod lattice;
pub mod output;
pub mod periodicity;
pub mod section;
pub mod transform;

pub use atoms::AtomSet;
pub use cuboid::Cuboid;
pub use error::ConfigError;
pub use lattice::{Geometry, LatticePoint};
pub use periodicity::{PeriodType, Periodicity};
pub use section::{CoordSys, Section, Sections};
