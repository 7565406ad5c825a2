//! Executor configuration generation for wrapped tasks.

use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;

use crate::error::DaxError;

/// What a wrapped task needs in order to be run by the wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigRequest<'a> {
    pub executable: &'a str,
    pub arguments: &'a [String],
    pub source_root: &'a Path,
    pub destination_root: &'a Path,
}

pub trait ConfigGenerator {
    /// Create the configuration artifact and return its path.
    fn generate(&mut self, request: &ConfigRequest<'_>) -> Result<PathBuf, DaxError>;
}

const EXECUTOR_TEMPLATE: &str = r#"{
  "executable": {{ executable|tojson }},
  "arguments": {{ arguments|tojson }},
  "source": {{ source_root|tojson }},
  "destination": {{ destination_root|tojson }}
}
"#;

/// Renders one JSON executor configuration per task into `output_dir`.
pub struct TemplateConfigGenerator {
    output_dir: PathBuf,
    env: Environment<'static>,
    count: usize,
}

impl TemplateConfigGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, DaxError> {
        let mut env = Environment::new();
        env.add_template("executor", EXECUTOR_TEMPLATE)?;
        Ok(TemplateConfigGenerator {
            output_dir: output_dir.into(),
            env,
            count: 0,
        })
    }

    fn file_name(&self, executable: &str) -> String {
        let stem: String = Path::new(executable)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        let stem = if stem.is_empty() { "task".to_string() } else { stem };
        format!("{}-{:03}.json", stem, self.count)
    }
}

impl ConfigGenerator for TemplateConfigGenerator {
    fn generate(&mut self, request: &ConfigRequest<'_>) -> Result<PathBuf, DaxError> {
        let rendered = self.env.get_template("executor")?.render(request)?;
        let path = self.output_dir.join(self.file_name(request.executable));
        std::fs::write(&path, rendered)?;
        self.count += 1;
        tracing::debug!(path = %path.display(), executable = request.executable, "generated executor config");
        Ok(path)
    }
}
