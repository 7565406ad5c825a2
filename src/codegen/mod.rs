//! Serialize pass: CompiledWorkflow → wire document.
//!
//! Public API: `serialize(compiled, builder)` and `to_document(compiled, name)`

pub mod builder;
pub mod writer;

use std::path::Path;

pub use builder::{DaxBuilder, DocumentBuilder};

use crate::dax::{self, DaxDocument, Encoding};
use crate::error::DaxError;
use crate::ir::types::CompiledWorkflow;

/// Drive `builder` through the compiled workflow: files by logical name, jobs
/// by node id, then one dependency per (parent, job) pair.
pub fn serialize<B: DocumentBuilder>(
    compiled: &CompiledWorkflow,
    mut builder: B,
) -> Result<B::Document, DaxError> {
    for file in compiled.catalog.iter() {
        builder.add_file(file)?;
    }

    for job in &compiled.jobs {
        builder.add_job(job)?;
    }

    for job in &compiled.jobs {
        let child = job.job_id();
        for parent in &job.parents {
            builder.add_dependency(&parent.to_string(), &child)?;
        }
    }

    Ok(builder.finish())
}

/// Serialize into a [`DaxDocument`] named `name`.
pub fn to_document(compiled: &CompiledWorkflow, name: &str) -> Result<DaxDocument, DaxError> {
    serialize(compiled, DaxBuilder::new(name))
}

/// Write `doc` atomically, as JSON for `.json` targets and DAX XML otherwise.
pub fn write_document(doc: &DaxDocument, path: &Path) -> Result<(), DaxError> {
    match Encoding::from_path(path) {
        Encoding::Json => writer::write_json(doc, path),
        Encoding::Xml => writer::write_text(&dax::xml::write(doc)?, path),
    }
}
