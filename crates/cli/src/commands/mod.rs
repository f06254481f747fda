//! CLI command implementations.

pub mod catalog;
pub mod customer;
pub mod discover;
pub mod recommend;

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use style_mingle_assistant::state::{StateError, load_catalog};
use style_mingle_core::{Catalog, CatalogError, LookupError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog could not be read or is invalid.
    #[error(transparent)]
    Catalog(#[from] StateError),

    /// No customer matched.
    #[error("{0}")]
    Lookup(#[from] LookupError),

    /// An argument could not be interpreted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Serializing output failed.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogError> for CommandError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(StateError::Catalog(err))
    }
}

/// Load the catalog at `file`, or the bundled one.
pub fn open_catalog(file: Option<&Path>) -> Result<Catalog, CommandError> {
    let catalog = match file {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog");
            load_catalog(path)?
        }
        None => Catalog::seed()?,
    };
    Ok(catalog)
}

/// Write a value to stdout as pretty JSON.
pub fn emit(value: &impl Serialize) -> Result<(), CommandError> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
