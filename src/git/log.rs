use crate::error::{DashError, Result};
use crate::parse::LOG_FORMAT;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Restricts the log to one author. Email wins when both are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFilter {
    Email(String),
    Name(String),
}

impl AuthorFilter {
    pub fn from_parts(email: Option<String>, name: Option<String>) -> Option<Self> {
        match (email, name) {
            (Some(email), _) => Some(AuthorFilter::Email(email)),
            (None, Some(name)) => Some(AuthorFilter::Name(name)),
            (None, None) => None,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            AuthorFilter::Email(s) | AuthorFilter::Name(s) => s,
        }
    }
}

/// `git` with `GIT_DIR`/`GIT_WORK_TREE` stripped so the working directory decides the repository.
fn git_cmd() -> Command {
    let mut cmd = Command::new("git");
    cmd.env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
    cmd
}

pub fn log_args(author: Option<&AuthorFilter>) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        "core.quotepath=off".to_string(),
        "log".to_string(),
        "--reverse".to_string(),
        format!("--format={LOG_FORMAT}"),
        "--numstat".to_string(),
    ];
    if let Some(filter) = author {
        args.push(format!("--author={}", filter.pattern()));
    }
    args
}

/// Run `git log --numstat` inside `repo_root` and return its stdout.
///
/// The process is killed once `timeout` elapses. Spawn failures, non-zero
/// exits and timeouts all come back as errors.
pub fn run_log(repo_root: &Path, author: Option<&AuthorFilter>, timeout: Duration) -> Result<String> {
    let args = log_args(author);
    debug!(repo = %repo_root.display(), ?args, "running git");

    let mut child = git_cmd()
        .current_dir(repo_root)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(DashError::GitSpawn)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| DashError::Parse("git stdout not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| DashError::Parse("git stderr not captured".to_string()))?;

    // Drain both pipes so a large log cannot block the child while we wait on it.
    let out_reader = thread::spawn(move || read_all(stdout));
    let err_reader = thread::spawn(move || read_all(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DashError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let out = join_reader(out_reader)?;
    let err = join_reader(err_reader)?;

    if !status.success() {
        return Err(DashError::GitFailed {
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&err).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn read_all(mut pipe: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(handle: thread::JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    let bytes = handle
        .join()
        .map_err(|_| DashError::Parse("git output reader panicked".to_string()))??;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::{commit_file, has_git, init_git_repo};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn email_filter_takes_priority() {
        let filter = AuthorFilter::from_parts(Some("a@b.c".into()), Some("Alice".into()));
        assert_eq!(filter, Some(AuthorFilter::Email("a@b.c".into())));
        let filter = AuthorFilter::from_parts(None, Some("Alice".into()));
        assert_eq!(filter, Some(AuthorFilter::Name("Alice".into())));
        assert_eq!(AuthorFilter::from_parts(None, None), None);
    }

    #[test]
    fn args_include_format_and_author() {
        let args = log_args(Some(&AuthorFilter::Name("Alice".into())));
        assert!(args.contains(&"--numstat".to_string()));
        assert!(args.contains(&format!("--format={LOG_FORMAT}")));
        assert_eq!(args.last().map(String::as_str), Some("--author=Alice"));
        assert!(!log_args(None).iter().any(|a| a.starts_with("--author")));
    }

    #[test]
    fn runs_against_a_real_repository() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "src/a.rs", "fn a() {}\n");
        commit_file(dir.path(), "src/b.rs", "fn b() {}\nfn c() {}\n");

        let out = run_log(dir.path(), None, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(out.matches('\x00').count(), 8);
        assert!(out.contains("1\t0\tsrc/a.rs"));
        assert!(out.contains("2\t0\tsrc/b.rs"));
        // oldest first
        assert!(out.find("src/a.rs").unwrap() < out.find("src/b.rs").unwrap());

        let filtered = run_log(
            dir.path(),
            Some(&AuthorFilter::Email("nobody@example.com".into())),
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert!(filtered.trim().is_empty());
    }

    #[test]
    fn fails_outside_a_repository() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        let err = run_log(dir.path(), None, DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, DashError::GitFailed { .. }));
    }

    #[test]
    fn gives_up_at_the_deadline() {
        if !has_git() {
            return;
        }
        let dir = tempdir().unwrap();
        init_git_repo(dir.path());
        commit_file(dir.path(), "src/a.rs", "fn a() {}\n");

        let err = run_log(dir.path(), None, Duration::ZERO).unwrap_err();
        assert!(matches!(err, DashError::Timeout(d) if d == Duration::ZERO), "{err}");
    }
}
