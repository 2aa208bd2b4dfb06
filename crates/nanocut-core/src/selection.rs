//! Atom selection: the boolean composition of all bodies applied to the
//! lattice atoms around them.
//!
//! The selection proceeds in four steps:
//!
//! 1. The search region is the union of the bounding cuboids of the
//!    additive bodies. Subtractive bodies can only remove atoms, so they do
//!    not enlarge it.
//! 2. The geometry generates every lattice atom that may lie in the region.
//! 3. Each body tests every candidate. An atom is kept when at least one
//!    additive body contains it and no subtractive body does, independent of
//!    the order in which the bodies were declared.
//! 4. The kept atoms are returned in candidate order.

use log::Level;
use nalgebra::Vector3;
use nanocut_geometry::{AtomSet, ConfigError, Cuboid, Geometry};
use rayon::prelude::*;

use crate::body::BodySpec;
use crate::context::RunContext;

/// Union of the bounding cuboids of the additive bodies.
pub fn selection_region(specs: &[BodySpec]) -> Result<Cuboid, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::NoBodies);
    }
    specs
        .iter()
        .filter(|spec| spec.additive)
        .map(|spec| spec.body.containing_cuboid())
        .reduce(|a, b| a.union(&b))
        .ok_or(ConfigError::EmptySelectionRegion)
}

/// Inclusion mask of `coords` under the composition of `specs`.
pub fn compose_mask(specs: &[BodySpec], coords: &[Vector3<f64>]) -> Vec<bool> {
    let masks: Vec<(bool, Vec<bool>)> = specs
        .par_iter()
        .map(|spec| (spec.additive, spec.body.atoms_inside(coords)))
        .collect();

    let mut added = vec![false; coords.len()];
    let mut removed = vec![false; coords.len()];
    for (additive, mask) in &masks {
        let target = if *additive { &mut added } else { &mut removed };
        for (t, &m) in target.iter_mut().zip(mask) {
            *t |= m;
        }
    }

    added
        .iter()
        .zip(&removed)
        .map(|(&a, &r)| a && !r)
        .collect()
}

/// Select the lattice atoms inside the composition of `specs`.
pub fn select_atoms(
    specs: &[BodySpec],
    geometry: &Geometry,
    ctx: &RunContext,
) -> Result<AtomSet, ConfigError> {
    let region = selection_region(specs)?;

    if specs.iter().any(|spec| !spec.additive) {
        log::warn!(
            "Non-additive bodies are subtracted from the union of all additive bodies, \
             independent of their position in the configuration"
        );
    }

    let points = geometry.gen_cuboid(&region)?;
    let candidates = geometry.gen_atoms(&points);
    ctx.log(
        Level::Info,
        format_args!(
            "Testing {} candidate atoms against {} bodies",
            candidates.len(),
            specs.len()
        ),
    );

    let mask = compose_mask(specs, &candidates.coords);
    let selected = candidates.filter(&mask);
    ctx.log(Level::Info, format_args!("Selected {} atoms", selected.len()));
    Ok(selected)
}
