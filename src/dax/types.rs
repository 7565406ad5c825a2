//! Wire document consumed by the workflow planner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaxDocument {
    pub name: String,
    #[serde(default)]
    pub files: Vec<DaxFile>,
    #[serde(default)]
    pub jobs: Vec<DaxJob>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl DaxDocument {
    pub fn new(name: impl Into<String>) -> Self {
        DaxDocument {
            name: name.into(),
            files: Vec::new(),
            jobs: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn job(&self, id: &str) -> Option<&DaxJob> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn file(&self, name: &str) -> Option<&DaxFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Physical file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pfn {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaxFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pfns: Vec<Pfn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaxJob {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uses: Vec<Uses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uses {
    pub name: String,
    pub link: Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    Input,
    Output,
    /// Any other link kind; ignored when reading.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub parent: String,
    pub child: String,
}

/// Job argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arguments {
    /// Whitespace-separated text with no file references.
    Text(String),
    /// Tokens in order, file references in place.
    Tokens(Vec<ArgumentToken>),
    /// Text with file references detached from their positions.
    Mixed(MixedArguments),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentToken {
    Literal(String),
    File { file: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedArguments {
    pub text: String,
    #[serde(default)]
    pub files: Vec<String>,
}
