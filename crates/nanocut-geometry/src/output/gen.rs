//! DFTB+ gen writer.
//!
//! A gen file starts with the atom count and a type flag (`C` cluster, `S`
//! supercell in cartesian coordinates), lists the species names, then one
//! row per atom: `serial species x y z`, both indices 1-based. Supercells
//! end with the origin and the three lattice vectors.

use std::io::{self, Write};

use nalgebra::Vector3;

use crate::atoms::AtomSet;

/// Write a gen structure. `cell` selects the `S` form.
pub fn write_gen<W: Write>(
    out: &mut W,
    species: &[String],
    atoms: &AtomSet,
    cell: Option<&[Vector3<f64>; 3]>,
) -> io::Result<()> {
    let flag = if cell.is_some() { "S" } else { "C" };
    writeln!(out, "{:5} {}", atoms.len(), flag)?;
    writeln!(out, "{}", species.join(" "))?;

    for (serial, (coord, &index)) in atoms.coords.iter().zip(&atoms.indices).enumerate() {
        writeln!(
            out,
            "{:5} {:3} {:16.8} {:16.8} {:16.8}",
            serial + 1,
            index + 1,
            coord.x,
            coord.y,
            coord.z
        )?;
    }

    if let Some(cell) = cell {
        writeln!(out, "{:16.8} {:16.8} {:16.8}", 0.0, 0.0, 0.0)?;
        for v in cell {
            writeln!(out, "{:16.8} {:16.8} {:16.8}", v.x, v.y, v.z)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<String>, AtomSet) {
        let mut atoms = AtomSet::default();
        atoms.push(Vector3::new(0.0, 0.0, 0.0), 0);
        atoms.push(Vector3::new(1.0, 1.0, 1.0), 1);
        (vec!["Ga".to_string(), "As".to_string()], atoms)
    }

    #[test]
    fn test_cluster_form() {
        let (species, atoms) = sample();
        let mut buf = Vec::new();
        write_gen(&mut buf, &species, &atoms, None).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["2", "C"]);
        assert_eq!(lines[1], "Ga As");
        let row: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(&row[..2], ["2", "2"]);
    }

    #[test]
    fn test_supercell_form() {
        let (species, atoms) = sample();
        let cell = [
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ];
        let mut buf = Vec::new();
        write_gen(&mut buf, &species, &atoms, Some(&cell)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert!(lines[0].ends_with('S'));
        let last: Vec<f64> = lines[7]
            .split_whitespace()
            .map(|f| f.parse().unwrap())
            .collect();
        assert_eq!(last, [0.0, 0.0, 2.0]);
    }
}
