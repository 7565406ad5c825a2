//! DAX XML, the planner's native document encoding.
//!
//! `<adag>` holds `<file>` declarations with their `<pfn>` locations, then
//! `<job>` entries, then `<child>` elements listing each job's `<parent>`s.
//! File references inside `<argument>` are `<file name=".."/>` elements in
//! place, so reading keeps their positions.

use std::collections::BTreeMap;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::types::{
    ArgumentToken, Arguments, DaxDocument, DaxFile, DaxJob, Dependency, Link, Pfn, Uses,
};
use crate::error::DaxError;
use crate::parse::graphml::{required_attribute, xml_attributes};

const FORMAT: &str = "DAX XML";
const NAMESPACE: &str = "http://pegasus.isi.edu/schema/DAX";
const VERSION: &str = "3.6";

// =============================================================================
// Reading
// =============================================================================

pub fn read(input: &str) -> Result<DaxDocument, DaxError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut doc: Option<DaxDocument> = None;
    let mut file: Option<DaxFile> = None;
    let mut job: Option<DaxJob> = None;
    let mut argument: Option<Vec<ArgumentToken>> = None;
    let mut child: Option<String> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DaxError::malformed(FORMAT, e))?;
        let (element, open) = match &event {
            Event::Start(e) => (e, true),
            Event::Empty(e) => (e, false),
            Event::Text(t) => {
                if let Some(tokens) = argument.as_mut() {
                    let text = t.unescape().map_err(|e| DaxError::malformed(FORMAT, e))?;
                    tokens.extend(
                        text.split_whitespace()
                            .map(|s| ArgumentToken::Literal(s.to_string())),
                    );
                }
                continue;
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"file" if argument.is_none() => {
                        if let (Some(entry), Some(doc)) = (file.take(), doc.as_mut()) {
                            doc.files.push(entry);
                        }
                    }
                    b"argument" => {
                        if let (Some(tokens), Some(job)) = (argument.take(), job.as_mut()) {
                            job.arguments = arguments(tokens);
                        }
                    }
                    b"job" => {
                        if let (Some(entry), Some(doc)) = (job.take(), doc.as_mut()) {
                            doc.jobs.push(entry);
                        }
                    }
                    b"child" => child = None,
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let attrs = xml_attributes(FORMAT, element)?;
        let name = element.local_name();
        if name.as_ref() == b"adag" {
            doc = Some(DaxDocument::new(attrs.get("name").cloned().unwrap_or_default()));
            continue;
        }
        let Some(doc) = doc.as_mut() else {
            continue;
        };

        match name.as_ref() {
            b"file" | b"filename" if argument.is_some() => {
                let lfn = file_reference(&attrs, "file")?;
                if let Some(tokens) = argument.as_mut() {
                    tokens.push(ArgumentToken::File { file: lfn });
                }
            }
            b"file" if job.is_none() => {
                let entry = DaxFile {
                    name: required_attribute(FORMAT, &attrs, "name", "file")?,
                    pfns: Vec::new(),
                };
                if open {
                    file = Some(entry);
                } else {
                    doc.files.push(entry);
                }
            }
            b"pfn" => {
                if let Some(entry) = file.as_mut() {
                    entry.pfns.push(Pfn {
                        url: required_attribute(FORMAT, &attrs, "url", "pfn")?,
                        site: attrs.get("site").cloned(),
                    });
                }
            }
            b"job" => {
                let entry = DaxJob {
                    id: required_attribute(FORMAT, &attrs, "id", "job")?,
                    name: required_attribute(FORMAT, &attrs, "name", "job")?,
                    arguments: None,
                    uses: Vec::new(),
                    stdout: None,
                    stderr: None,
                };
                if open {
                    job = Some(entry);
                } else {
                    doc.jobs.push(entry);
                }
            }
            b"argument" if open && job.is_some() => argument = Some(Vec::new()),
            b"uses" => {
                if let Some(entry) = job.as_mut() {
                    entry.uses.push(Uses {
                        name: file_reference(&attrs, "uses")?,
                        link: link(attrs.get("link").map(String::as_str)),
                    });
                }
            }
            b"stdout" => {
                if let Some(entry) = job.as_mut() {
                    entry.stdout = Some(file_reference(&attrs, "stdout")?);
                }
            }
            b"stderr" => {
                if let Some(entry) = job.as_mut() {
                    entry.stderr = Some(file_reference(&attrs, "stderr")?);
                }
            }
            b"child" if open => child = Some(required_attribute(FORMAT, &attrs, "ref", "child")?),
            b"parent" => {
                if let Some(child) = &child {
                    doc.dependencies.push(Dependency {
                        parent: required_attribute(FORMAT, &attrs, "ref", "parent")?,
                        child: child.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    doc.ok_or_else(|| DaxError::malformed(FORMAT, "no <adag> root element"))
}

/// Logical file name of a reference: `name`, or `file` in older documents.
fn file_reference(
    attrs: &BTreeMap<String, String>,
    element: &str,
) -> Result<String, DaxError> {
    match attrs.get("name").or_else(|| attrs.get("file")) {
        Some(lfn) => Ok(lfn.clone()),
        None => required_attribute(FORMAT, attrs, "name", element),
    }
}

fn link(value: Option<&str>) -> Link {
    match value {
        Some("input") => Link::Input,
        Some("output") => Link::Output,
        _ => Link::Other,
    }
}

fn arguments(tokens: Vec<ArgumentToken>) -> Option<Arguments> {
    if tokens.is_empty() {
        return None;
    }
    if tokens.iter().any(|t| matches!(t, ArgumentToken::File { .. })) {
        return Some(Arguments::Tokens(tokens));
    }
    let words: Vec<String> = tokens
        .into_iter()
        .filter_map(|t| match t {
            ArgumentToken::Literal(s) => Some(s),
            ArgumentToken::File { .. } => None,
        })
        .collect();
    Some(Arguments::Text(words.join(" ")))
}

// =============================================================================
// Writing
// =============================================================================

/// Render `doc` as indented DAX XML, without a trailing newline.
pub fn write(doc: &DaxDocument) -> Result<String, DaxError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("adag").with_attributes([
        ("xmlns", NAMESPACE),
        ("version", VERSION),
        ("name", doc.name.as_str()),
    ])))?;

    for file in &doc.files {
        write_file(&mut writer, file)?;
    }
    for job in &doc.jobs {
        write_job(&mut writer, job)?;
    }

    // One <child> per run of dependencies sharing the child job.
    let mut dependencies = doc.dependencies.iter().peekable();
    while let Some(first) = dependencies.next() {
        writer.write_event(Event::Start(
            BytesStart::new("child").with_attributes([("ref", first.child.as_str())]),
        ))?;
        writer.write_event(Event::Empty(
            BytesStart::new("parent").with_attributes([("ref", first.parent.as_str())]),
        ))?;
        while let Some(next) = dependencies.next_if(|d| d.child == first.child) {
            writer.write_event(Event::Empty(
                BytesStart::new("parent").with_attributes([("ref", next.parent.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("child")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("adag")))?;
    String::from_utf8(writer.into_inner()).map_err(|e| DaxError::malformed(FORMAT, e))
}

fn write_file<W: Write>(writer: &mut Writer<W>, file: &DaxFile) -> Result<(), DaxError> {
    let start = BytesStart::new("file").with_attributes([("name", file.name.as_str())]);
    if file.pfns.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for pfn in &file.pfns {
        let mut element = BytesStart::new("pfn").with_attributes([("url", pfn.url.as_str())]);
        if let Some(site) = &pfn.site {
            element.push_attribute(("site", site.as_str()));
        }
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("file")))?;
    Ok(())
}

fn write_job<W: Write>(writer: &mut Writer<W>, job: &DaxJob) -> Result<(), DaxError> {
    writer.write_event(Event::Start(BytesStart::new("job").with_attributes([
        ("id", job.id.as_str()),
        ("name", job.name.as_str()),
    ])))?;

    if let Some(arguments) = &job.arguments {
        writer.write_event(Event::Start(BytesStart::new("argument")))?;
        for piece in pieces(arguments) {
            match piece {
                Piece::Text(text) => writer.write_event(Event::Text(BytesText::new(&text)))?,
                Piece::File(lfn) => writer.write_event(Event::Empty(
                    BytesStart::new("file").with_attributes([("name", lfn)]),
                ))?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new("argument")))?;
    }

    for (element, target) in [("stdout", &job.stdout), ("stderr", &job.stderr)] {
        if let Some(lfn) = target {
            writer.write_event(Event::Empty(
                BytesStart::new(element).with_attributes([("name", lfn.as_str()), ("link", "output")]),
            ))?;
        }
    }

    for uses in &job.uses {
        let link = match uses.link {
            Link::Input => "input",
            Link::Output => "output",
            Link::Other => continue,
        };
        writer.write_event(Event::Empty(
            BytesStart::new("uses").with_attributes([("name", uses.name.as_str()), ("link", link)]),
        ))?;
    }

    writer.write_event(Event::End(BytesEnd::new("job")))?;
    Ok(())
}

/// Content of an `<argument>` element.
enum Piece<'a> {
    Text(String),
    File(&'a str),
}

/// Split arguments into text runs and file references, one space between tokens.
fn pieces(arguments: &Arguments) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut text = String::new();

    match arguments {
        Arguments::Text(s) => text.push_str(s),
        Arguments::Tokens(tokens) => {
            for (i, token) in tokens.iter().enumerate() {
                if i > 0 {
                    text.push(' ');
                }
                match token {
                    ArgumentToken::Literal(s) => text.push_str(s),
                    ArgumentToken::File { file } => push_file(&mut out, &mut text, file.as_str()),
                }
            }
        }
        Arguments::Mixed(mixed) => {
            text.push_str(&mixed.text);
            for lfn in &mixed.files {
                text.push(' ');
                push_file(&mut out, &mut text, lfn.as_str());
            }
        }
    }

    if !text.is_empty() {
        out.push(Piece::Text(text));
    }
    out
}

fn push_file<'a>(out: &mut Vec<Piece<'a>>, text: &mut String, lfn: &'a str) {
    if !text.is_empty() {
        out.push(Piece::Text(std::mem::take(text)));
    }
    out.push(Piece::File(lfn));
}
