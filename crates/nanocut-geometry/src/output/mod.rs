//! Structure output.
//!
//! The selected atoms are written once per run, either as XYZ or as DFTB+
//! gen. An optional second file receives the periodicity axes, one vector per
//! line.

pub mod gen;
pub mod xyz;

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use nalgebra::Vector3;

use crate::atoms::AtomSet;
use crate::error::ConfigError;
use crate::lattice::Geometry;

pub use gen::write_gen;
pub use xyz::write_xyz;

/// File format of the result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xyz,
    Gen,
}

/// Where and how the result is written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub destination: PathBuf,
    /// Append to `destination` instead of truncating it.
    pub append: bool,
    pub format: OutputFormat,
    /// Optional file receiving the axis vectors.
    pub lattice_file: Option<PathBuf>,
}

impl OutputOptions {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            append: false,
            format: OutputFormat::default(),
            lattice_file: None,
        }
    }
}

/// Write the selected atoms and their axes.
///
/// The gen format needs either no axes (cluster) or a full set of three;
/// one or two axes must first be completed with an orthogonal extension.
///
/// Both files are rendered in memory and every destination is opened before
/// the first byte is written, so a destination that cannot be opened leaves
/// the other one untouched.
pub fn write_structure(
    geometry: &Geometry,
    atoms: &AtomSet,
    axis: &[Vector3<f64>],
    options: &OutputOptions,
) -> Result<(), ConfigError> {
    let cell = match (options.format, axis.len()) {
        (OutputFormat::Gen, 0) => None,
        (OutputFormat::Gen, 3) => Some([axis[0], axis[1], axis[2]]),
        (OutputFormat::Gen, n) => {
            return Err(ConfigError::Output(format!(
                "gen format needs 0 or 3 axis vectors, got {}; pass --orthogonal-extension",
                n
            )))
        }
        _ => None,
    };

    let path = options.destination.as_path();
    let mut frame = Vec::new();
    let rendered = match options.format {
        OutputFormat::Xyz => write_xyz(&mut frame, geometry.species(), atoms, axis),
        OutputFormat::Gen => write_gen(&mut frame, geometry.species(), atoms, cell.as_ref()),
    };
    rendered.map_err(|e| ConfigError::io(path, e))?;

    let lattice = match &options.lattice_file {
        Some(lattice_path) => {
            let mut lines = Vec::new();
            write_lattice_lines(&mut lines, axis).map_err(|e| ConfigError::io(lattice_path, e))?;
            Some((Destination::open(lattice_path)?, lines))
        }
        None => None,
    };
    let written = Destination::open(path).and_then(|result| result.commit(&frame, options.append));
    if let Err(e) = written {
        if let Some((destination, _)) = lattice {
            destination.discard();
        }
        return Err(e);
    }
    log::info!(
        "Wrote {} atoms to {} ({:?})",
        atoms.len(),
        path.display(),
        options.format
    );

    if let Some((destination, lines)) = lattice {
        let lattice_path = destination.path;
        destination.commit(&lines, false)?;
        log::debug!("Wrote {} axis vectors to {}", axis.len(), lattice_path.display());
    }
    Ok(())
}

/// Axis vectors, one per line.
fn write_lattice_lines<W: Write>(out: &mut W, axis: &[Vector3<f64>]) -> io::Result<()> {
    axis.iter()
        .try_for_each(|v| writeln!(out, "{:.10} {:.10} {:.10}", v.x, v.y, v.z))
}

/// An output file opened for writing with its content still intact.
struct Destination<'a> {
    path: &'a Path,
    file: File,
    created: bool,
}

impl<'a> Destination<'a> {
    fn open(path: &'a Path) -> Result<Self, ConfigError> {
        let created = !path.exists();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| ConfigError::io(path, e))?;
        Ok(Self { path, file, created })
    }

    /// Close the file, removing it if this run created it.
    fn discard(self) {
        drop(self.file);
        if self.created {
            if let Err(e) = std::fs::remove_file(self.path) {
                log::warn!("Could not remove {}: {}", self.path.display(), e);
            }
        }
    }

    /// Replace the content with `content`, or append it.
    fn commit(mut self, content: &[u8], append: bool) -> Result<(), ConfigError> {
        let positioned = if append {
            self.file.seek(SeekFrom::End(0)).map(|_| ())
        } else {
            self.file.set_len(0)
        };
        positioned
            .and_then(|_| self.file.write_all(content))
            .and_then(|_| self.file.flush())
            .map_err(|e| ConfigError::io(self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::CoordSys;

    fn geometry() -> Geometry {
        Geometry::new(
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &[("C", [0.0; 3])],
            CoordSys::Lattice,
            1.5,
        )
        .unwrap()
    }

    fn two_atoms() -> AtomSet {
        let mut atoms = AtomSet::default();
        atoms.push(Vector3::new(0.0, 0.0, 0.0), 0);
        atoms.push(Vector3::new(1.5, 0.0, 0.0), 0);
        atoms
    }

    #[test]
    fn test_append_keeps_previous_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OutputOptions::new(dir.path().join("out.xyz"));
        let (g, atoms) = (geometry(), two_atoms());

        write_structure(&g, &atoms, &[], &options).unwrap();
        write_structure(&g, &atoms, &[], &options).unwrap();
        let content = std::fs::read_to_string(&options.destination).unwrap();
        assert_eq!(content.lines().count(), 4);

        options.append = true;
        write_structure(&g, &atoms, &[], &options).unwrap();
        let content = std::fs::read_to_string(&options.destination).unwrap();
        assert_eq!(content.lines().count(), 8);
    }

    #[test]
    fn test_lattice_file_lists_axes() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OutputOptions::new(dir.path().join("out.xyz"));
        options.lattice_file = Some(dir.path().join("lattice.txt"));
        let axis = [Vector3::new(0.0, 0.0, 1.5)];

        write_structure(&geometry(), &two_atoms(), &axis, &options).unwrap();
        let lattice = std::fs::read_to_string(dir.path().join("lattice.txt")).unwrap();
        assert_eq!(lattice, "0.0000000000 0.0000000000 1.5000000000\n");
    }

    #[test]
    fn test_gen_rejects_partial_axes() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OutputOptions::new(dir.path().join("out.gen"));
        options.format = OutputFormat::Gen;
        let axis = [Vector3::new(0.0, 0.0, 1.5)];

        let err = write_structure(&geometry(), &two_atoms(), &axis, &options).unwrap_err();
        assert!(err.to_string().contains("--orthogonal-extension"));
        assert!(!options.destination.exists());
    }

    #[test]
    fn test_failed_lattice_file_leaves_result_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OutputOptions::new(dir.path().join("out.xyz"));
        options.lattice_file = Some(dir.path().join("missing").join("lattice.txt"));
        let axis = [Vector3::new(0.0, 0.0, 1.5)];
        let (g, atoms) = (geometry(), two_atoms());

        let err = write_structure(&g, &atoms, &axis, &options).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(!options.destination.exists());

        std::fs::write(&options.destination, "previous frame\n").unwrap();
        options.append = true;
        assert!(write_structure(&g, &atoms, &axis, &options).is_err());
        let content = std::fs::read_to_string(&options.destination).unwrap();
        assert_eq!(content, "previous frame\n");
    }

    #[test]
    fn test_failed_result_file_removes_new_lattice_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = OutputOptions::new(dir.path().join("missing").join("out.xyz"));
        options.lattice_file = Some(dir.path().join("lattice.txt"));

        assert!(write_structure(&geometry(), &two_atoms(), &[], &options).is_err());
        assert!(!dir.path().join("lattice.txt").exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let options = OutputOptions::new(dir.path().join("missing").join("out.xyz"));
        let err = write_structure(&geometry(), &two_atoms(), &[], &options).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
