use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when checking a local checkout
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("repository has no work tree")]
    BareRepository,

    #[error("no valid git repository could be found")]
    GitRepository(#[source] gix_discover::upwards::Error),

    #[error("directory belongs to the repository at {}", .0.display())]
    EnclosingRepository(PathBuf),
}

/// Ensure `path` is the root of a non-bare git work tree.
///
/// # Errors
///
/// Returns an error if no git repository is found, the repository is bare, or
/// `path` is only a subdirectory of another repository's work tree.
pub fn ensure_work_tree(path: &Path) -> Result<PathBuf, RepoError> {
    let (repo_path, _trust) = gix_discover::upwards(path).map_err(RepoError::GitRepository)?;

    let (_git_dir, work_tree) = repo_path.into_repository_and_work_tree_directories();

    let root = work_tree.ok_or(RepoError::BareRepository)?;

    if is_same_dir(&root, path) {
        Ok(root)
    } else {
        Err(RepoError::EnclosingRepository(root))
    }
}

/// Whether both paths resolve to the same directory.
fn is_same_dir(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn git_init(dir: &Path, extra: &[&str]) {
        let output = Command::new("git")
            .arg("init")
            .args(extra)
            .arg(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git init failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    #[test]
    fn accepts_work_tree_root() {
        let dir = tempfile::tempdir().unwrap();
        git_init(dir.path(), &[]);

        let root = ensure_work_tree(dir.path()).unwrap();
        assert!(is_same_dir(&root, dir.path()));
    }

    #[test]
    fn rejects_bare_repository() {
        let dir = tempfile::tempdir().unwrap();
        git_init(dir.path(), &["--bare"]);

        let result = ensure_work_tree(dir.path());
        assert!(matches!(result, Err(RepoError::BareRepository)));
    }

    #[test]
    fn rejects_subdirectory_of_work_tree() {
        let dir = tempfile::tempdir().unwrap();
        git_init(dir.path(), &[]);
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();

        let result = ensure_work_tree(&nested);
        assert!(matches!(result, Err(RepoError::EnclosingRepository(_))));
    }

    #[test]
    fn rejects_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_work_tree(dir.path()).is_err());
    }
}
