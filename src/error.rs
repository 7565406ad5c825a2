//! Unified error type used across all phases.

use thiserror::Error;

use crate::parse::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Load,
    Classify,
    Compile,
    Serialize,
    Parse,
    Wrap,
    Io,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Load => write!(f, "Load"),
            Phase::Classify => write!(f, "Classify"),
            Phase::Compile => write!(f, "Compile"),
            Phase::Serialize => write!(f, "Serialize"),
            Phase::Parse => write!(f, "Parse"),
            Phase::Wrap => write!(f, "Wrap"),
            Phase::Io => write!(f, "I/O"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DaxError {
    #[error("format '{extension}' is not supported yet")]
    UnsupportedFormat { extension: String },

    #[error("failed to parse {format} document: {message}")]
    Malformed { format: &'static str, message: String },

    #[error("node '{node_id}' is missing required attribute '{attribute}'")]
    MissingAttribute { node_id: NodeId, attribute: &'static str },

    #[error("node '{node_id}' has invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute {
        node_id: NodeId,
        attribute: &'static str,
        value: String,
    },

    #[error("node '{0}' is defined more than once")]
    DuplicateNode(NodeId),

    #[error("edge references unknown node '{0}'")]
    UnknownNode(NodeId),

    #[error("graph is not bipartite: {reason}")]
    Structure {
        reason: String,
        node_id: Option<NodeId>,
    },

    #[error("logical file name '{logical_name}' is used by both node '{first}' and node '{second}'")]
    DuplicateLogicalName {
        logical_name: String,
        first: NodeId,
        second: NodeId,
    },

    #[error("task '{node_id}' redirects {stream} into both '{first}' and '{second}'")]
    StreamConflict {
        node_id: NodeId,
        stream: &'static str,
        first: String,
        second: String,
    },

    #[error("file '{logical_name}' (node '{node_id}') is marked as a redirected stream but no task writes it")]
    UnproducedStream { node_id: NodeId, logical_name: String },

    #[error("dependency references job '{0}' which is not in the document")]
    UnknownJob(String),

    #[error("job '{job_id}' references unknown file '{logical_name}'")]
    UnknownFile { job_id: String, logical_name: String },

    #[error("cannot reconstruct arguments of job '{job_id}': {reason}")]
    ArgumentReconstruction { job_id: String, reason: String },

    #[error("no file has '{marker}' in its logical name, cannot locate the dataset root")]
    MissingMarker { marker: String },

    #[error("failed to render wrapper configuration: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DaxError {
    /// Stable error code, e.g. `B001`.
    pub fn code(&self) -> &'static str {
        match self {
            DaxError::UnsupportedFormat { .. } => "L001",
            DaxError::Malformed { .. } => "L002",
            DaxError::MissingAttribute { .. } => "L003",
            DaxError::InvalidAttribute { .. } => "L004",
            DaxError::DuplicateNode(_) => "L005",
            DaxError::UnknownNode(_) => "L006",
            DaxError::Structure { .. } => "B001",
            DaxError::DuplicateLogicalName { .. } => "C001",
            DaxError::StreamConflict { .. } => "C002",
            DaxError::UnproducedStream { .. } => "C003",
            DaxError::UnknownJob(_) => "S001",
            DaxError::UnknownFile { .. } => "R001",
            DaxError::ArgumentReconstruction { .. } => "R002",
            DaxError::MissingMarker { .. } => "W001",
            DaxError::Template(_) => "W002",
            DaxError::Io(_) => "IO01",
            DaxError::Json(_) => "IO02",
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            DaxError::UnsupportedFormat { .. }
            | DaxError::Malformed { .. }
            | DaxError::MissingAttribute { .. }
            | DaxError::InvalidAttribute { .. }
            | DaxError::DuplicateNode(_)
            | DaxError::UnknownNode(_) => Phase::Load,
            DaxError::Structure { .. } => Phase::Classify,
            DaxError::DuplicateLogicalName { .. }
            | DaxError::StreamConflict { .. }
            | DaxError::UnproducedStream { .. } => Phase::Compile,
            DaxError::UnknownJob(_) => Phase::Serialize,
            DaxError::UnknownFile { .. } | DaxError::ArgumentReconstruction { .. } => Phase::Parse,
            DaxError::MissingMarker { .. } | DaxError::Template(_) => Phase::Wrap,
            DaxError::Io(_) | DaxError::Json(_) => Phase::Io,
        }
    }

    /// The node the error was found at, if applicable.
    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            DaxError::MissingAttribute { node_id, .. }
            | DaxError::InvalidAttribute { node_id, .. }
            | DaxError::StreamConflict { node_id, .. }
            | DaxError::UnproducedStream { node_id, .. } => Some(node_id),
            DaxError::DuplicateNode(id) | DaxError::UnknownNode(id) => Some(id),
            DaxError::Structure { node_id, .. } => node_id.as_ref(),
            DaxError::DuplicateLogicalName { second, .. } => Some(second),
            _ => None,
        }
    }

    pub(crate) fn structure(reason: impl Into<String>, node_id: Option<NodeId>) -> Self {
        DaxError::Structure {
            reason: reason.into(),
            node_id,
        }
    }

    pub(crate) fn malformed(format: &'static str, message: impl std::fmt::Display) -> Self {
        DaxError::Malformed {
            format,
            message: message.to_string(),
        }
    }

    /// `[Phase:CODE] message`, the form the binaries print.
    pub fn report(&self) -> String {
        format!("[{}:{}] {}", self.phase(), self.code(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_includes_phase_and_code() {
        let err = DaxError::UnsupportedFormat {
            extension: "xml".into(),
        };
        assert_eq!(err.report(), "[Load:L001] format 'xml' is not supported yet");
    }

    #[test]
    fn structure_error_carries_node() {
        let err = DaxError::structure("odd cycle", Some(NodeId::Num(3)));
        assert_eq!(err.phase(), Phase::Classify);
        assert_eq!(err.node_id(), Some(&NodeId::Num(3)));
    }
}
