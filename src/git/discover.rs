use crate::git::repo::is_repository_root;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find repository roots under `base`, looking at most `max_depth` levels down.
///
/// A directory holding a `.git` folder is reported and not descended into, so
/// repositories nested in another repository's working tree are not listed.
/// Hidden directories are skipped; unreadable ones are ignored.
pub fn find_repositories(base: &Path, max_depth: usize) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(base)
        .max_depth(Some(max_depth))
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            // Prune everything below a repository root.
            entry.depth() == 0 || !entry.path().parent().is_some_and(is_repository_root)
        })
        .build();

    walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_dir()))
        .filter(|entry| is_repository_root(entry.path()))
        .map(|entry| {
            debug!(path = %entry.path().display(), "found repository");
            entry.into_path()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn fake_repo(path: &Path) {
        fs::create_dir_all(path.join(".git")).unwrap();
    }

    #[test]
    fn finds_repositories_in_sorted_order() {
        let dir = tempdir().unwrap();
        fake_repo(&dir.path().join("b"));
        fake_repo(&dir.path().join("a"));
        fake_repo(&dir.path().join("group/c"));
        fs::create_dir_all(dir.path().join("plain")).unwrap();

        let found = find_repositories(dir.path(), 3);
        assert_eq!(
            found,
            vec![dir.path().join("a"), dir.path().join("b"), dir.path().join("group/c")]
        );
    }

    #[test]
    fn does_not_descend_into_repositories() {
        let dir = tempdir().unwrap();
        let outer = dir.path().join("outer");
        fake_repo(&outer);
        fake_repo(&outer.join("vendor/inner"));

        assert_eq!(find_repositories(dir.path(), 5), vec![outer]);
    }

    #[test]
    fn base_that_is_a_repository_is_a_leaf() {
        let dir = tempdir().unwrap();
        fake_repo(dir.path());
        fake_repo(&dir.path().join("nested"));

        assert_eq!(find_repositories(dir.path(), 3), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn respects_max_depth() {
        let dir = tempdir().unwrap();
        fake_repo(&dir.path().join("one/two/three"));

        assert!(find_repositories(dir.path(), 2).is_empty());
        assert_eq!(find_repositories(dir.path(), 3).len(), 1);
    }

    #[test]
    fn skips_hidden_directories() {
        let dir = tempdir().unwrap();
        fake_repo(&dir.path().join(".cache/repo"));
        assert!(find_repositories(dir.path(), 3).is_empty());
    }
}
