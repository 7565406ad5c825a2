//! Document builder interface and the wire-document implementation.

use std::collections::BTreeSet;

use crate::dax::types::{
    ArgumentToken, Arguments, DaxDocument, DaxFile, DaxJob, Dependency, Link, Pfn, Uses,
};
use crate::error::DaxError;
use crate::ir::types::{Argument, FileDescriptor, JobCatalogEntry};

/// Operations the serializer drives. Implementations decide the concrete
/// document; correctness depends only on the declared relations, not on the
/// order they arrive in.
pub trait DocumentBuilder {
    type Document;

    fn add_file(&mut self, file: &FileDescriptor) -> Result<(), DaxError>;

    fn add_job(&mut self, job: &JobCatalogEntry) -> Result<(), DaxError>;

    /// Declare that `child` runs after `parent`. Both must already be added.
    fn add_dependency(&mut self, parent: &str, child: &str) -> Result<(), DaxError>;

    fn finish(self) -> Self::Document;
}

/// Builds a [`DaxDocument`].
#[derive(Debug)]
pub struct DaxBuilder {
    doc: DaxDocument,
    job_ids: BTreeSet<String>,
}

impl DaxBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        DaxBuilder {
            doc: DaxDocument::new(name),
            job_ids: BTreeSet::new(),
        }
    }
}

impl DocumentBuilder for DaxBuilder {
    type Document = DaxDocument;

    fn add_file(&mut self, file: &FileDescriptor) -> Result<(), DaxError> {
        self.doc.files.push(DaxFile {
            name: file.logical_name.clone(),
            pfns: file
                .locations
                .iter()
                .map(|l| Pfn {
                    url: l.url.clone(),
                    site: Some(l.site.clone()),
                })
                .collect(),
        });
        Ok(())
    }

    fn add_job(&mut self, job: &JobCatalogEntry) -> Result<(), DaxError> {
        let id = job.job_id();

        let mut uses: Vec<Uses> = job
            .inputs
            .iter()
            .map(|name| Uses {
                name: name.clone(),
                link: Link::Input,
            })
            .collect();
        uses.extend(job.outputs.iter().map(|name| Uses {
            name: name.clone(),
            link: Link::Output,
        }));

        self.doc.jobs.push(DaxJob {
            id: id.clone(),
            name: job.executable_name.clone(),
            arguments: encode_arguments(&job.arguments),
            uses,
            stdout: job.stdout.clone(),
            stderr: job.stderr.clone(),
        });
        self.job_ids.insert(id);
        Ok(())
    }

    fn add_dependency(&mut self, parent: &str, child: &str) -> Result<(), DaxError> {
        for id in [parent, child] {
            if !self.job_ids.contains(id) {
                return Err(DaxError::UnknownJob(id.to_string()));
            }
        }
        self.doc.dependencies.push(Dependency {
            parent: parent.to_string(),
            child: child.to_string(),
        });
        Ok(())
    }

    fn finish(self) -> DaxDocument {
        self.doc
    }
}

/// Plain text when no argument references a file, positional tokens otherwise.
pub fn encode_arguments(arguments: &[Argument]) -> Option<Arguments> {
    if arguments.is_empty() {
        return None;
    }
    if !arguments.iter().any(Argument::is_file) {
        let text: Vec<&str> = arguments.iter().map(Argument::as_token).collect();
        return Some(Arguments::Text(text.join(" ")));
    }
    Some(Arguments::Tokens(
        arguments
            .iter()
            .map(|a| match a {
                Argument::Literal(s) => ArgumentToken::Literal(s.clone()),
                Argument::File(name) => ArgumentToken::File { file: name.clone() },
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_arguments_encode_as_text() {
        let args = vec![Argument::Literal("--opt".into()), Argument::Literal("val".into())];
        assert_eq!(encode_arguments(&args), Some(Arguments::Text("--opt val".into())));
        assert_eq!(encode_arguments(&[]), None);
    }

    #[test]
    fn file_arguments_keep_their_position() {
        let args = vec![Argument::Literal("-i".into()), Argument::File("in".into())];
        assert_eq!(
            encode_arguments(&args),
            Some(Arguments::Tokens(vec![
                ArgumentToken::Literal("-i".into()),
                ArgumentToken::File { file: "in".into() },
            ]))
        );
    }

    #[test]
    fn dependency_on_missing_job_is_rejected() {
        let mut builder = DaxBuilder::new("dax");
        let err = builder.add_dependency("1", "2").unwrap_err();
        assert_eq!(err.code(), "S001");
    }
}
