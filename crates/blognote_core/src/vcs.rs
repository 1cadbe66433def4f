//! Version-control capability used for last-modified timestamps.

use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Answers when a file was last changed according to history.
pub trait VersionControl {
    /// Returns `None` when the file is untracked or history is unavailable.
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>>;
}

/// `git` command-line backend.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

impl VersionControl for GitCli {
    fn last_modified(&self, path: &Path) -> Option<DateTime<Utc>> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(["log", "-1", "--format=%at", "--"])
            .arg(path)
            .output();
        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                debug!(
                    "event=git_last_modified module=vcs status=error path={} exit={}",
                    path.display(),
                    output.status
                );
                return None;
            }
            Err(err) => {
                debug!(
                    "event=git_last_modified module=vcs status=error path={} error={err}",
                    path.display()
                );
                return None;
            }
        };
        parse_git_timestamp(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Backend for trees without history; never reports a timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl VersionControl for NoHistory {
    fn last_modified(&self, _path: &Path) -> Option<DateTime<Utc>> {
        None
    }
}

/// Parses `git log --format=%at` output (unix seconds).
pub fn parse_git_timestamp(stdout: &str) -> Option<DateTime<Utc>> {
    let seconds = stdout.trim().parse::<i64>().ok()?;
    Utc.timestamp_opt(seconds, 0).single()
}

#[cfg(test)]
mod tests {
    use super::parse_git_timestamp;

    #[test]
    fn parses_unix_seconds() {
        let parsed = parse_git_timestamp("1700000000\n").unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn untracked_output_has_no_timestamp() {
        assert!(parse_git_timestamp("").is_none());
        assert!(parse_git_timestamp("fatal: bad revision").is_none());
    }
}
