use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

const WORKSPACE_PREFIX: &str = "automerge-enabler-";
const CHECKOUT_DIR: &str = "repo";

/// Error when the temporary workspace cannot be created
#[derive(Debug, Error)]
#[error("failed to create temporary workspace")]
pub struct WorkspaceError(#[source] std::io::Error);

/// Exclusively owned temporary directory holding one checkout.
///
/// The directory and everything below it is removed when the value is dropped,
/// whichever way the run ends.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    checkout: PathBuf,
}

impl Workspace {
    /// Create a fresh, empty workspace in the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError`] if the directory cannot be created.
    pub fn acquire() -> Result<Self, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(WorkspaceError)?;
        let checkout = dir.path().join(CHECKOUT_DIR);
        debug!("acquired workspace {}", dir.path().display());
        Ok(Self { dir, checkout })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Location of the checkout; does not exist until something clones into it.
    #[must_use]
    pub fn checkout(&self) -> &Path {
        &self.checkout
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        debug!("releasing workspace {}", self.dir.path().display());
    }
}
