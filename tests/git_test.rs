use automerge_enabler::domain::{
    BRANCH_NAME, COMMIT_MESSAGE, CommitAuthor, GitError, InstallOutcome, VersionControl,
    WorkflowTemplate,
};
use automerge_enabler::infrastructure::{GitCli, WorkflowInstaller};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=test-user",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

/// Create a bare "remote" repository with one commit on `branch`.
fn create_remote(temp_dir: &TempDir, branch: &str) -> PathBuf {
    let source = temp_dir.path().join("source");
    fs::create_dir(&source).unwrap();
    run_git(&source, &["init", "--initial-branch", branch]);
    fs::write(source.join("README.md"), "# hello-world\n").unwrap();
    run_git(&source, &["add", "README.md"]);
    run_git(&source, &["commit", "-m", "initial"]);

    let remote = temp_dir.path().join("remote.git");
    let source_arg = source.to_string_lossy();
    let remote_arg = remote.to_string_lossy();
    run_git(
        temp_dir.path(),
        &["clone", "--bare", &*source_arg, &*remote_arg],
    );
    remote
}

fn author() -> CommitAuthor {
    CommitAuthor {
        name: "Mona Lisa".to_owned(),
        email: "mona@example.com".to_owned(),
    }
}

#[test]
fn test_clone_reports_default_branch() {
    let temp_dir = TempDir::new().unwrap();
    let remote = create_remote(&temp_dir, "trunk");
    let checkout = temp_dir.path().join("checkout");

    GitCli
        .clone_repository(&remote.to_string_lossy(), &checkout)
        .unwrap();

    assert!(checkout.join("README.md").is_file());
    assert_eq!(GitCli.default_branch(&checkout).unwrap(), "trunk");
}

#[test]
fn test_publish_pushes_branch_with_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let remote = create_remote(&temp_dir, "main");
    let checkout = temp_dir.path().join("checkout");
    GitCli
        .clone_repository(&remote.to_string_lossy(), &checkout)
        .unwrap();

    let outcome = WorkflowInstaller::new(&checkout)
        .install(&WorkflowTemplate::dependabot_auto_merge())
        .unwrap();
    assert_eq!(outcome, InstallOutcome::Installed);

    GitCli
        .publish_branch(&checkout, BRANCH_NAME, COMMIT_MESSAGE, &author())
        .unwrap();

    let branch_ref = format!("refs/heads/{BRANCH_NAME}");
    let subject = run_git(&remote, &["log", "-1", "--format=%s", branch_ref.as_str()]);
    assert_eq!(subject, COMMIT_MESSAGE);
    let author_line = run_git(
        &remote,
        &["log", "-1", "--format=%an <%ae>", branch_ref.as_str()],
    );
    assert_eq!(author_line, "Mona Lisa <mona@example.com>");
    let files = run_git(&remote, &["ls-tree", "-r", "--name-only", branch_ref.as_str()]);
    assert!(files.contains(".github/workflows/dependabot-auto-merge.yml"));

    let upstream = run_git(
        &checkout,
        &["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{upstream}"],
    );
    assert_eq!(upstream, format!("origin/{BRANCH_NAME}"));
}

#[test]
fn test_publish_without_changes_fails() {
    let temp_dir = TempDir::new().unwrap();
    let remote = create_remote(&temp_dir, "main");
    let checkout = temp_dir.path().join("checkout");
    GitCli
        .clone_repository(&remote.to_string_lossy(), &checkout)
        .unwrap();

    let result = GitCli.publish_branch(&checkout, BRANCH_NAME, COMMIT_MESSAGE, &author());

    assert!(matches!(
        result,
        Err(GitError::Command {
            step: "commit",
            ..
        })
    ));
}

#[test]
fn test_existing_local_branch_fails() {
    let temp_dir = TempDir::new().unwrap();
    let remote = create_remote(&temp_dir, "main");
    let checkout = temp_dir.path().join("checkout");
    GitCli
        .clone_repository(&remote.to_string_lossy(), &checkout)
        .unwrap();
    run_git(&checkout, &["branch", BRANCH_NAME]);

    let result = GitCli.publish_branch(&checkout, BRANCH_NAME, COMMIT_MESSAGE, &author());

    assert!(matches!(
        result,
        Err(GitError::Command {
            step: "checkout",
            ..
        })
    ));
}

#[test]
fn test_existing_remote_branch_fails() {
    let temp_dir = TempDir::new().unwrap();
    let remote = create_remote(&temp_dir, "main");
    run_git(&remote, &["branch", BRANCH_NAME, "main"]);
    let checkout = temp_dir.path().join("checkout");
    GitCli
        .clone_repository(&remote.to_string_lossy(), &checkout)
        .unwrap();
    WorkflowInstaller::new(&checkout)
        .install(&WorkflowTemplate::dependabot_auto_merge())
        .unwrap();

    let result = GitCli.publish_branch(&checkout, BRANCH_NAME, COMMIT_MESSAGE, &author());

    assert!(matches!(
        result,
        Err(GitError::Command { step: "push", .. })
    ));
    let branch_ref = format!("refs/heads/{BRANCH_NAME}");
    assert_eq!(
        run_git(&remote, &["rev-parse", branch_ref.as_str()]),
        run_git(&remote, &["rev-parse", "refs/heads/main"])
    );
}
