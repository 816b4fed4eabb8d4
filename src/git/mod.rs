pub mod discover;
pub mod log;
pub mod meta;
pub mod repo;

#[cfg(test)]
pub(crate) mod test_support;

pub use discover::find_repositories;
pub use log::{run_log, AuthorFilter, DEFAULT_TIMEOUT};
pub use repo::{is_repository_root, GitRepo};
