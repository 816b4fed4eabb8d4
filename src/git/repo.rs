use crate::error::{DashError, Result};
use crate::git::meta;
use std::path::{Path, PathBuf};

/// Name of the metadata folder that marks a repository root.
pub const METADATA_DIR: &str = ".git";

/// True when `path` has a repository metadata folder directly inside it.
pub fn is_repository_root(path: &Path) -> bool {
    path.join(METADATA_DIR).is_dir()
}

pub struct GitRepo {
    repo: gix::Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Unlike discovery, parent directories are not searched: `path` itself must
    /// hold the metadata folder and gix must be able to read it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !is_repository_root(path) {
            return Err(DashError::NotARepo(path.to_path_buf()));
        }

        let repo = gix::open(path)?;
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component, used as the repository's display name.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Hash HEAD points at, if HEAD is born.
    pub fn head_commit(&self) -> Option<String> {
        self.repo.head_id().ok().map(|id| id.to_string())
    }

    pub fn description(&self) -> String {
        meta::read_description(&self.path)
    }

    pub fn technologies(&self) -> Vec<String> {
        meta::detect_technologies(&self.path)
    }
}
