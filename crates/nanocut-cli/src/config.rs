//! Configuration file loading.

use std::path::Path;

use anyhow::{Context, Result};
use nanocut_geometry::Sections;

/// Read a TOML configuration file into its ordered sections.
pub fn load_config(path: &Path) -> Result<Sections> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'", path.display()))?;
    let sections = Sections::from_toml_str(&content)
        .with_context(|| format!("Invalid configuration file '{}'", path.display()))?;
    log::debug!("Loaded {} sections from {}", sections.len(), path.display());
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[geometry]\nlengthunit = 2.0\n\n[\"sphere:a\"]\nradius = 1.0").unwrap();
        let sections = load_config(file.path()).unwrap();
        assert_eq!(sections.len(), 2);
        assert!(sections.get("sphere:a").is_some());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let err = load_config(Path::new("/nonexistent/nanocut.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/nanocut.toml"));
    }
}
