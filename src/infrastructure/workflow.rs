use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{InstallOutcome, WorkflowDocument, WorkflowError, WorkflowTemplate};

/// Installs workflow templates into a work tree's `.github/workflows` folder
pub struct WorkflowInstaller {
    workflows_dir: PathBuf,
}

impl WorkflowInstaller {
    #[must_use]
    pub fn new(work_tree: &Path) -> Self {
        Self {
            workflows_dir: work_tree.join(".github").join("workflows"),
        }
    }

    /// Where `template` lands in the work tree.
    #[must_use]
    pub fn destination(&self, template: &WorkflowTemplate) -> PathBuf {
        self.workflows_dir.join(template.file_name())
    }

    /// Install `template` unless an equivalent workflow is already present.
    ///
    /// An existing file is compared by its parsed YAML, so formatting, comments
    /// and key order are ignored. A file that cannot be read as YAML counts as
    /// different and is overwritten. When the outcome is
    /// [`InstallOutcome::AlreadyPresent`] nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing file cannot be read, the template is not
    /// valid YAML, or the workflow cannot be written.
    pub fn install(&self, template: &WorkflowTemplate) -> Result<InstallOutcome, WorkflowError> {
        let destination = self.destination(template);

        let outcome = match fs::read_to_string(&destination) {
            Ok(existing) => {
                if is_equivalent(&existing, template, &destination)? {
                    info!("{} is already up to date", destination.display());
                    return Ok(InstallOutcome::AlreadyPresent);
                }
                InstallOutcome::Updated
            }
            Err(err) if err.kind() == ErrorKind::NotFound => InstallOutcome::Installed,
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(
                    "{} is not valid UTF-8, replacing it",
                    destination.display()
                );
                InstallOutcome::Updated
            }
            Err(source) => {
                return Err(WorkflowError::Read {
                    path: destination,
                    source,
                });
            }
        };

        fs::create_dir_all(&self.workflows_dir).map_err(|source| WorkflowError::Write {
            path: self.workflows_dir.clone(),
            source,
        })?;
        fs::write(&destination, template.content()).map_err(|source| WorkflowError::Write {
            path: destination.clone(),
            source,
        })?;

        debug!("wrote {}", destination.display());
        Ok(outcome)
    }
}

/// Compare an existing workflow with the template by parsed content.
fn is_equivalent(
    existing: &str,
    template: &WorkflowTemplate,
    path: &Path,
) -> Result<bool, WorkflowError> {
    let wanted = template.document()?;
    match WorkflowDocument::parse(existing) {
        Ok(document) => Ok(document == wanted),
        Err(err) => {
            warn!("{} is not valid YAML, replacing it: {err}", path.display());
            Ok(false)
        }
    }
}
