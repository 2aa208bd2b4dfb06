//! The single error taxonomy of a nanocut run.
//!
//! Every failure, from a malformed configuration file to an unwritable
//! output path, is reported as a [`ConfigError`] and aborts the run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or executing a cut.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Syntax(String),

    #[error("Missing required section [{0}]")]
    MissingSection(String),

    #[error("Section [{section}]: {message}")]
    InvalidSection { section: String, message: String },

    #[error("Section [{section}]: unknown or incompatible body type '{body_type}' for {period_type} periodicity")]
    UnknownBodyType {
        section: String,
        body_type: String,
        period_type: String,
    },

    #[error("No bodies specified")]
    NoBodies,

    #[error("Empty selection region: at least one additive body is required")]
    EmptySelectionRegion,

    #[error("Selection region {region} needs more than {limit} lattice points")]
    RegionTooLarge { region: String, limit: u64 },

    #[error("Invalid periodicity: {0}")]
    InvalidPeriodicity(String),

    #[error("Cannot write output: {0}")]
    Output(String),
}

impl ConfigError {
    /// Shorthand for an [`InvalidSection`](ConfigError::InvalidSection) error.
    pub fn invalid(section: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidSection {
            section: section.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
