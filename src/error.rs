use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashError>;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Not a git repository: {}", .0.display())]
    NotARepo(PathBuf),
    #[error("Failed to run git: {0}")]
    GitSpawn(#[source] std::io::Error),
    #[error("git log exited with {status}: {stderr}")]
    GitFailed { status: String, stderr: String },
    #[error("git log timed out after {0:?}")]
    Timeout(Duration),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

// Manual From implementation for unboxed to boxed conversion
impl From<gix::open::Error> for DashError {
    fn from(err: gix::open::Error) -> Self {
        DashError::Git(Box::new(err))
    }
}
