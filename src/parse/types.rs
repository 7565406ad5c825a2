//! Node model of the canonical workflow graph.
//!
//! Persisted documents carry untyped string attributes (`lfn`, `urls`, `sites`,
//! `streams`, `name`, `args`). They are mapped onto [`FileNode`] / [`TaskNode`]
//! here, and mapped back by [`Node::to_attributes`] when a graph is written.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DaxError;

/// Untyped attribute set of a persisted node.
pub type Attributes = BTreeMap<String, String>;

/// Persisted attribute keys.
pub mod attr {
    pub const LFN: &str = "lfn";
    pub const URLS: &str = "urls";
    pub const SITES: &str = "sites";
    pub const STREAMS: &str = "streams";
    pub const NAME: &str = "name";
    pub const ARGS: &str = "args";
}

/// Attributes that only file nodes carry. Used to tell which coloring is which.
pub const FILE_ATTRIBUTES: &[&str] = &[attr::LFN];

// =============================================================================
// NODE IDS
// =============================================================================

/// Opaque, totally ordered node identifier.
///
/// Numeric strings are normalized to [`NodeId::Num`], so `"3"` read from GraphML
/// and `3` read from node-link JSON denote the same node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawNodeId", into = "RawNodeId")]
pub enum NodeId {
    Num(u64),
    Name(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawNodeId {
    Num(u64),
    Name(String),
}

impl From<RawNodeId> for NodeId {
    fn from(raw: RawNodeId) -> Self {
        match raw {
            RawNodeId::Num(n) => NodeId::Num(n),
            RawNodeId::Name(s) => NodeId::from(s),
        }
    }
}

impl From<NodeId> for RawNodeId {
    fn from(id: NodeId) -> Self {
        match id {
            NodeId::Num(n) => RawNodeId::Num(n),
            NodeId::Name(s) => RawNodeId::Name(s),
        }
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        let numeric = !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        match s.parse::<u64>() {
            Ok(n) if numeric && (s == "0" || !s.starts_with('0')) => NodeId::Num(n),
            _ => NodeId::Name(s),
        }
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::from(s.to_string())
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        NodeId::Num(n)
    }
}

impl NodeId {
    /// Numeric value, for ids that are numbers.
    pub fn as_num(&self) -> Option<u64> {
        match self {
            NodeId::Num(n) => Some(*n),
            NodeId::Name(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Name(s) => write!(f, "{s}"),
        }
    }
}

// =============================================================================
// STREAM FLAGS
// =============================================================================

/// Standard streams redirected into a file. Bit 0 is stdout, bit 1 is stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamFlags(u8);

impl StreamFlags {
    pub const NONE: StreamFlags = StreamFlags(0);
    pub const STDOUT: StreamFlags = StreamFlags(1);
    pub const STDERR: StreamFlags = StreamFlags(2);

    /// Keeps the stdout/stderr bits and drops the rest.
    pub fn from_bits_truncate(bits: u64) -> Self {
        StreamFlags((bits & 0b11) as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: StreamFlags) -> bool {
        self.0 & other.0 == other.0 && !other.is_empty()
    }

    pub fn insert(&mut self, other: StreamFlags) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for StreamFlags {
    type Output = StreamFlags;

    fn bitor(self, rhs: StreamFlags) -> StreamFlags {
        StreamFlags(self.0 | rhs.0)
    }
}

// =============================================================================
// NODES
// =============================================================================

/// A physical location of a file. `site` is unset when the source did not name one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub url: String,
    pub site: Option<String>,
}

impl Location {
    pub fn new(url: impl Into<String>, site: impl Into<String>) -> Self {
        Location {
            url: url.into(),
            site: Some(site.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub logical_name: String,
    pub locations: Vec<Location>,
    pub stream_flags: StreamFlags,
}

impl FileNode {
    pub fn new(logical_name: impl Into<String>) -> Self {
        FileNode {
            logical_name: logical_name.into(),
            locations: Vec::new(),
            stream_flags: StreamFlags::NONE,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_streams(mut self, flags: StreamFlags) -> Self {
        self.stream_flags = flags;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    pub executable_name: String,
    pub argument_tokens: Vec<String>,
}

impl TaskNode {
    pub fn new(executable_name: impl Into<String>) -> Self {
        TaskNode {
            executable_name: executable_name.into(),
            argument_tokens: Vec::new(),
        }
    }

    /// Tokenizes `args` on whitespace.
    pub fn with_args(mut self, args: &str) -> Self {
        self.argument_tokens = args.split_whitespace().map(str::to_string).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    File(FileNode),
    Task(TaskNode),
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Node::File(file)
    }
}

impl From<TaskNode> for Node {
    fn from(task: TaskNode) -> Self {
        Node::Task(task)
    }
}

impl Node {
    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Task(_) => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskNode> {
        match self {
            Node::Task(t) => Some(t),
            Node::File(_) => None,
        }
    }

    /// Persisted attribute keys this node carries.
    pub fn attribute_names(&self) -> Vec<&'static str> {
        match self {
            Node::File(f) => {
                let mut names = vec![attr::LFN];
                if !f.locations.is_empty() {
                    names.push(attr::URLS);
                    names.push(attr::SITES);
                }
                if !f.stream_flags.is_empty() {
                    names.push(attr::STREAMS);
                }
                names
            }
            Node::Task(t) => {
                let mut names = vec![attr::NAME];
                if !t.argument_tokens.is_empty() {
                    names.push(attr::ARGS);
                }
                names
            }
        }
    }

    /// Build a typed node from persisted attributes.
    pub fn from_attributes(id: &NodeId, attrs: &Attributes) -> Result<Node, DaxError> {
        if let Some(lfn) = attrs.get(attr::LFN) {
            let mut file = FileNode::new(lfn.clone());
            file.locations = parse_locations(id, attrs)?;
            if let Some(raw) = attrs.get(attr::STREAMS) {
                let bits = raw.trim().parse::<u64>().map_err(|_| DaxError::InvalidAttribute {
                    node_id: id.clone(),
                    attribute: attr::STREAMS,
                    value: raw.clone(),
                })?;
                file.stream_flags = StreamFlags::from_bits_truncate(bits);
            }
            return Ok(Node::File(file));
        }

        if let Some(name) = attrs.get(attr::NAME) {
            let args = attrs.get(attr::ARGS).map(String::as_str).unwrap_or("");
            return Ok(Node::Task(TaskNode::new(name.clone()).with_args(args)));
        }

        Err(DaxError::MissingAttribute {
            node_id: id.clone(),
            attribute: "lfn|name",
        })
    }

    /// Persisted attributes of this node, the inverse of [`Node::from_attributes`].
    ///
    /// `sites` is written only when every location names its site.
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        match self {
            Node::File(f) => {
                attrs.insert(attr::LFN.into(), f.logical_name.clone());
                if !f.locations.is_empty() {
                    let urls: Vec<&str> = f.locations.iter().map(|l| l.url.as_str()).collect();
                    attrs.insert(attr::URLS.into(), urls.join(","));
                    let sites: Option<Vec<&str>> =
                        f.locations.iter().map(|l| l.site.as_deref()).collect();
                    if let Some(sites) = sites {
                        attrs.insert(attr::SITES.into(), sites.join(","));
                    }
                }
                if !f.stream_flags.is_empty() {
                    attrs.insert(attr::STREAMS.into(), f.stream_flags.bits().to_string());
                }
            }
            Node::Task(t) => {
                attrs.insert(attr::NAME.into(), t.executable_name.clone());
                if !t.argument_tokens.is_empty() {
                    attrs.insert(attr::ARGS.into(), t.argument_tokens.join(" "));
                }
            }
        }
        attrs
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_locations(id: &NodeId, attrs: &Attributes) -> Result<Vec<Location>, DaxError> {
    let Some(raw_urls) = attrs.get(attr::URLS) else {
        return Ok(Vec::new());
    };
    let urls = split_list(raw_urls);

    let sites = match attrs.get(attr::SITES) {
        Some(raw_sites) => {
            let sites = split_list(raw_sites);
            if sites.len() != urls.len() {
                return Err(DaxError::InvalidAttribute {
                    node_id: id.clone(),
                    attribute: attr::SITES,
                    value: raw_sites.clone(),
                });
            }
            sites.into_iter().map(Some).collect()
        }
        None => vec![None; urls.len()],
    };

    Ok(urls
        .into_iter()
        .zip(sites)
        .map(|(url, site)| Location { url, site })
        .collect())
}
