//! Ordered configuration sections.
//!
//! A nanocut configuration is a TOML document whose top-level entries are all
//! tables: `[geometry]`, an optional `[periodicity]`, and one
//! `["<bodytype>:<label>"]` table per body. Body names contain a colon, so
//! they must be written as quoted keys. Section order is the document order
//! (the workspace enables `toml/preserve_order`), which fixes the order in
//! which bodies are applied.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ConfigError;

/// The key/value table of a single configuration section.
pub type Section = toml::Table;

/// Coordinate system in which a configured vector is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordSys {
    /// Components along the lattice vectors.
    #[default]
    Lattice,
    /// Plain cartesian components, in the unit of the scaled lattice.
    Cartesian,
}

/// All sections of a configuration document, in document order.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    entries: Vec<(String, Section)>,
}

impl Sections {
    /// Parse a TOML document into its sections.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Syntax(e.to_string()))?;

        let mut entries = Vec::with_capacity(table.len());
        for (name, value) in table {
            match value {
                toml::Value::Table(section) => entries.push((name, section)),
                other => {
                    return Err(ConfigError::Syntax(format!(
                        "top-level key '{}' must be a section, found {}",
                        name,
                        other.type_str()
                    )))
                }
            }
        }
        Ok(Self { entries })
    }

    /// Look up an optional section.
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, section)| section)
    }

    /// Look up a section that must be present.
    pub fn require(&self, name: &str) -> Result<&Section, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::MissingSection(name.to_string()))
    }

    /// Iterate over `(name, section)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.entries
            .iter()
            .map(|(name, section)| (name.as_str(), section))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deserialize a section into its typed parameter struct.
///
/// Missing keys, wrong value types, and (for structs declared with
/// `deny_unknown_fields`) misspelled keys are reported against the section
/// name.
pub fn parse_section<T: DeserializeOwned>(name: &str, section: &Section) -> Result<T, ConfigError> {
    toml::Value::Table(section.clone())
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::invalid(name, e.to_string().trim()))
}
