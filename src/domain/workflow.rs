use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// File name of the auto-merge workflow inside `.github/workflows`
pub const WORKFLOW_FILE_NAME: &str = "dependabot-auto-merge.yml";

/// Errors that can occur when installing a workflow file
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("failed to read workflow: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML in workflow template {name}")]
    Template {
        name: &'static str,
        #[source]
        source: Box<serde_saphyr::Error>,
    },

    #[error("failed to write workflow: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of installing a workflow into a work tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// No file existed; the template was written.
    Installed,
    /// An equivalent file already existed and was left untouched.
    AlreadyPresent,
    /// A different (or unparsable) file existed and was overwritten.
    Updated,
}

/// A parsed YAML workflow.
///
/// Two documents are equal when their parsed trees are equal, regardless of
/// formatting, comments, quoting or mapping key order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument(Value);

impl WorkflowDocument {
    /// Parse YAML content into a document.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the content is not a valid YAML document.
    pub fn parse(content: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(content).map(Self)
    }
}

/// A workflow file shipped with the tool, installed verbatim.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowTemplate {
    file_name: &'static str,
    content: &'static str,
}

impl WorkflowTemplate {
    #[must_use]
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    /// Workflow that approves and auto-merges Dependabot patch and minor updates
    #[must_use]
    pub const fn dependabot_auto_merge() -> Self {
        Self::new(
            WORKFLOW_FILE_NAME,
            include_str!("../../templates/dependabot-auto-merge.yml"),
        )
    }

    #[must_use]
    pub const fn file_name(&self) -> &'static str {
        self.file_name
    }

    #[must_use]
    pub const fn content(&self) -> &'static str {
        self.content
    }

    /// Parsed form of the template, used for equivalence checks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Template`] if the template itself is not valid YAML.
    pub fn document(&self) -> Result<WorkflowDocument, WorkflowError> {
        WorkflowDocument::parse(self.content).map_err(|source| WorkflowError::Template {
            name: self.file_name,
            source: Box::new(source),
        })
    }
}
