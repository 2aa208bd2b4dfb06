//! Pipeline driver: ties together geometry, periodicity, bodies and output.

use anyhow::{Context, Result};
use log::Level;
use nalgebra::Vector3;

use nanocut_core::{
    extend_axis, fold_to_unitcell, resolve_bodies, rotate_coordsys, select_atoms, RunContext,
};
use nanocut_geometry::output::{write_structure, OutputOptions};
use nanocut_geometry::{AtomSet, Geometry, Periodicity, Sections};

/// A cut structure, ready to be written.
pub struct Structure {
    pub geometry: Geometry,
    pub atoms: AtomSet,
    /// Axes in the standard frame, possibly extended to three.
    pub axis: Vec<Vector3<f64>>,
}

/// Cut the structure described by `sections`.
pub fn cut(sections: &Sections, extension: Option<f64>, ctx: &RunContext) -> Result<Structure> {
    let geometry = Geometry::from_section(sections.require("geometry")?)?;
    let periodicity = Periodicity::from_section(&geometry, sections.get("periodicity"))?;
    ctx.log(
        Level::Info,
        format_args!(
            "Lattice with {} basis atoms ({}), {} periodicity",
            geometry.basis().len(),
            geometry.species().join(", "),
            periodicity.period_type()
        ),
    );

    let specs = resolve_bodies(sections, &geometry, &periodicity)?;
    let mut atoms = select_atoms(&specs, &geometry, ctx)?;

    fold_to_unitcell(&periodicity, &mut atoms);
    let (axis, atoms) = rotate_coordsys(&periodicity, atoms);

    if !axis.is_empty() && ctx.enabled(Level::Info) {
        let listed: Vec<String> = axis
            .iter()
            .map(|v| format!("({:.6}, {:.6}, {:.6})", v.x, v.y, v.z))
            .collect();
        log::info!("Periodicity axes: {}", listed.join(" "));
    }

    let axis = match extension {
        Some(length) => extend_axis(axis, length),
        None => axis,
    };

    Ok(Structure {
        geometry,
        atoms,
        axis,
    })
}

/// Cut the structure and write it out.
pub fn run(
    sections: &Sections,
    options: &OutputOptions,
    extension: Option<f64>,
    ctx: &RunContext,
) -> Result<()> {
    let structure = cut(sections, extension, ctx)?;
    write_structure(&structure.geometry, &structure.atoms, &structure.axis, options)
        .with_context(|| format!("Failed to write '{}'", options.destination.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const WIRE: &str = r#"
        [geometry]
        lattice_vectors = [[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]]
        basis = [
            { species = "Ga", position = [0.0, 0.0, 0.0] },
            { species = "As", position = [0.25, 0.25, 0.25] },
        ]
        lengthunit = 5.65

        [periodicity]
        period_type = "1D"
        axis = [1, 1, 0]

        ["periodic_1D_cylinder:wire"]
        radius = 6.0
    "#;

    #[test]
    fn test_wire_is_folded_and_rotated() {
        let sections = Sections::from_toml_str(WIRE).unwrap();
        let structure = cut(&sections, None, &RunContext::default()).unwrap();

        assert_eq!(structure.axis.len(), 1);
        let period = structure.axis[0].z;
        assert_abs_diff_eq!(structure.axis[0].xy().norm(), 0.0, epsilon = 1e-9);
        assert!(!structure.atoms.is_empty());
        for c in &structure.atoms.coords {
            assert!(c.z > -1e-6 && c.z < period, "z = {}", c.z);
        }
        assert_eq!(structure.atoms.len(), structure.atoms.indices.len());
    }

    #[test]
    fn test_extension_completes_the_axes() {
        let sections = Sections::from_toml_str(WIRE).unwrap();
        let structure = cut(&sections, Some(40.0), &RunContext::default()).unwrap();
        assert_eq!(structure.axis.len(), 3);
        assert_abs_diff_eq!(structure.axis[0], Vector3::new(40.0, 0.0, 0.0));
        assert_abs_diff_eq!(structure.axis[1], Vector3::new(0.0, 40.0, 0.0));
    }

    #[test]
    fn test_missing_geometry() {
        let sections = Sections::from_toml_str("[\"sphere:a\"]\nradius = 1.0").unwrap();
        let err = cut(&sections, None, &RunContext::default()).err().unwrap();
        assert!(err.to_string().contains("geometry"));
    }
}
