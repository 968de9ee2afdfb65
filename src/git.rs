use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{OntokitError, Result};

/// Run a git subcommand in `dir`, failing on a non-zero exit status.
///
/// Uses the system git binary so the user's credentials, hooks and
/// configuration all apply as they would interactively.
fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| OntokitError::io("spawning git".to_string(), e))?;

    if !output.status.success() {
        return Err(OntokitError::ExternalTool {
            command: format!("git {}", args.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Verify an author identity is configured before any commit is
/// attempted, so the failure surfaces up front rather than after a
/// partially completed workflow.
pub fn ensure_identity(dir: &Path) -> Result<()> {
    for key in ["user.name", "user.email"] {
        let output = Command::new("git")
            .args(["config", "--get", key])
            .current_dir(dir)
            .output()
            .map_err(|e| OntokitError::io("spawning git".to_string(), e))?;
        if !output.status.success() || output.stdout.is_empty() {
            return Err(OntokitError::MissingIdentity);
        }
    }
    Ok(())
}

pub fn init(dir: &Path, initial_branch: &str) -> Result<()> {
    run_git(dir, &["init", "-q", "-b", initial_branch])?;
    info!("initialized git repository in {}", dir.display());
    Ok(())
}

pub fn add_all(dir: &Path) -> Result<()> {
    run_git(dir, &["add", "-A"])?;
    Ok(())
}

pub fn commit(dir: &Path, message: &str) -> Result<()> {
    run_git(dir, &["commit", "-q", "-m", message])?;
    info!("committed generated tree in {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configure_identity(dir: &Path) {
        run_git(dir, &["config", "user.name", "Test User"]).unwrap();
        run_git(dir, &["config", "user.email", "test@example.org"]).unwrap();
    }

    #[test]
    fn init_add_commit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "content\n").unwrap();

        init(dir.path(), "main").unwrap();
        configure_identity(dir.path());
        ensure_identity(dir.path()).unwrap();
        add_all(dir.path()).unwrap();
        commit(dir.path(), "initial commit").unwrap();

        let log = run_git(dir.path(), &["log", "--oneline"]).unwrap();
        assert!(log.contains("initial commit"));
    }

    #[test]
    fn failed_command_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        // Not a repository, so `git log` fails.
        let err = run_git(dir.path(), &["log"]).unwrap_err();
        match err {
            OntokitError::ExternalTool { command, stderr } => {
                assert_eq!(command, "git log");
                assert!(!stderr.is_empty());
            }
            other => panic!("expected ExternalTool, got {other:?}"),
        }
    }
}
