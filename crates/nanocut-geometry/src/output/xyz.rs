//! XYZ writer.

use std::io::{self, Write};

use nalgebra::Vector3;

use crate::atoms::AtomSet;

/// Write one XYZ frame: atom count, comment line, then `species x y z` rows.
///
/// When axes are present the comment line carries them as
/// `Lattice="x1 y1 z1 x2 ..."`; otherwise it is left empty.
pub fn write_xyz<W: Write>(
    out: &mut W,
    species: &[String],
    atoms: &AtomSet,
    axis: &[Vector3<f64>],
) -> io::Result<()> {
    writeln!(out, "{}", atoms.len())?;

    if axis.is_empty() {
        writeln!(out)?;
    } else {
        let components: Vec<String> = axis
            .iter()
            .flat_map(|v| v.iter().map(|c| format!("{:.8}", c)).collect::<Vec<_>>())
            .collect();
        writeln!(out, "Lattice=\"{}\"", components.join(" "))?;
    }

    for (coord, &index) in atoms.coords.iter().zip(&atoms.indices) {
        writeln!(
            out,
            "{:<4} {:16.8} {:16.8} {:16.8}",
            species[index], coord.x, coord.y, coord.z
        )?;
    }
    Ok(())
}
