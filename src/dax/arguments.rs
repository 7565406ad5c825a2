//! Rebuild a task's flat argument tokens from a job's argument representation.

use crate::error::DaxError;

use super::types::{ArgumentToken, Arguments};

/// Options that take a file as their value. Detached file references are put
/// back right after these, in declaration order.
pub const FILE_OPTIONS: &[&str] = &["-C"];

pub fn reconstruct(job_id: &str, arguments: &Arguments) -> Result<Vec<String>, DaxError> {
    match arguments {
        Arguments::Text(text) => Ok(tokenize(text)),
        Arguments::Tokens(tokens) => Ok(tokens
            .iter()
            .map(|t| match t {
                ArgumentToken::Literal(s) => s.clone(),
                ArgumentToken::File { file } => file.clone(),
            })
            .collect()),
        Arguments::Mixed(mixed) => reinsert(job_id, &tokenize(&mixed.text), &mixed.files),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Assumes file references were declared in the same order as the options
/// owning them appear in the text; the counts must agree.
fn reinsert(job_id: &str, tokens: &[String], files: &[String]) -> Result<Vec<String>, DaxError> {
    let options = tokens
        .iter()
        .filter(|t| FILE_OPTIONS.contains(&t.as_str()))
        .count();
    if options != files.len() {
        return Err(DaxError::ArgumentReconstruction {
            job_id: job_id.to_string(),
            reason: format!(
                "{} file-consuming option(s) in the text but {} file reference(s)",
                options,
                files.len()
            ),
        });
    }

    let mut files = files.iter();
    let mut out = Vec::with_capacity(tokens.len() + options);
    for token in tokens {
        out.push(token.clone());
        if FILE_OPTIONS.contains(&token.as_str()) {
            if let Some(file) = files.next() {
                out.push(file.clone());
            }
        }
    }
    Ok(out)
}
