//! # nanocut Core
//!
//! The shape-composition and atom-selection engine of nanocut. This crate
//! provides:
//!
//! - **Bodies** ([`body`]) — Spheres, polyhedra, cylinders and their
//!   periodic counterparts, each with an inside test and a bounding cuboid.
//! - **Resolver** ([`resolver`]) — Builds bodies from configuration sections,
//!   checking each type against the periodicity class.
//! - **Selection** ([`selection`]) — Composes additive and subtractive bodies
//!   into the final atom set.
//! - **Canonicalisation** ([`axis`]) — Folding into the unit cell, rotation
//!   into the standard frame, and axis extension.
//! - **Run context** ([`context`]) — Verbosity shared by the pipeline.

pub mod axis;
pub mod body;
pub mod context;
pub mod resolver;
pub mod selection;

pub use axis::{extend_axis, fold_to_unitcell, rotate_coordsys};
pub use body::{Body, BodyKind, BodySpec};
pub use context::RunContext;
pub use resolver::resolve_bodies;
pub use selection::select_atoms;
