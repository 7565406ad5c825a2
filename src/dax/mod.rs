//! Wire document: types, reading, and reconstruction of the workflow graph.

pub mod arguments;
pub mod reverse;
pub mod types;
pub mod xml;

use std::path::Path;

pub use reverse::parse_document;
pub use types::*;

use crate::error::DaxError;

/// Wire document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    /// Native DAX XML.
    Xml,
}

impl Encoding {
    /// `.json` files are JSON; everything else is DAX XML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Encoding::Json,
            _ => Encoding::Xml,
        }
    }
}

pub fn from_json(input: &str) -> Result<DaxDocument, DaxError> {
    serde_json::from_str(input).map_err(|e| DaxError::malformed("DAX JSON", e))
}

pub fn from_xml(input: &str) -> Result<DaxDocument, DaxError> {
    xml::read(input)
}

pub fn read_document(path: &Path) -> Result<DaxDocument, DaxError> {
    let input = std::fs::read_to_string(path)?;
    match Encoding::from_path(path) {
        Encoding::Json => from_json(&input),
        Encoding::Xml => from_xml(&input),
    }
}
