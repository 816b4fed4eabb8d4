use crate::classify::extension_of;
use crate::model::{CommitRecord, ContributionType, RepositoryStats, TotalStats};
use std::collections::BTreeMap;

const NO_EXTENSION: &str = "(no ext)";

/// Fold parsed commits into repository-level statistics.
///
/// Line counts in the language, category and extension maps are
/// `lines_added + lines_removed` of each classified file.
pub fn aggregate_repository(name: &str, path: &str, commits: Vec<CommitRecord>) -> RepositoryStats {
    let mut stats = RepositoryStats {
        name: name.to_string(),
        path: path.to_string(),
        ..Default::default()
    };

    for commit in &commits {
        stats.total_commits += 1;
        stats.total_lines_added += commit.lines_added;
        stats.total_lines_removed += commit.lines_removed;
        stats.total_files_changed += commit.files_changed;

        for fc in &commit.file_classifications {
            let changed = fc.lines_changed();
            if let Some(lang) = &fc.language {
                *stats.languages.entry(lang.clone()).or_insert(0) += changed;
            }
            *stats.contribution_types.entry(fc.contribution_type).or_insert(0) += changed;

            let ext = extension_of(&fc.file_path);
            let ext = if ext.is_empty() { NO_EXTENSION.to_string() } else { ext };
            *stats.file_extensions.entry(ext).or_insert(0) += changed;
        }
    }

    stats.first_commit_date = commits.iter().map(|c| c.timestamp).min();
    stats.last_commit_date = commits.iter().map(|c| c.timestamp).max();
    stats.last_commit_hash = commits
        .iter()
        .max_by_key(|c| c.timestamp)
        .map(|c| c.hash.clone());
    stats.commits = commits;
    stats
}

/// Share of each category in percent, rounded to one decimal.
/// Empty when nothing was classified.
pub fn contribution_percentages(
    counts: &BTreeMap<ContributionType, u64>,
) -> BTreeMap<ContributionType, f64> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .iter()
        .map(|(ctype, count)| (*ctype, round1(*count as f64 / total as f64 * 100.0)))
        .collect()
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum every repository into one cross-repository view.
pub fn total_stats(repos: &[RepositoryStats]) -> TotalStats {
    let mut totals = TotalStats {
        total_repos: repos.len(),
        ..Default::default()
    };

    for repo in repos {
        totals.total_commits += repo.total_commits;
        totals.total_lines_added += repo.total_lines_added;
        totals.total_lines_removed += repo.total_lines_removed;
        totals.total_files_changed += repo.total_files_changed;
        merge_counts(&mut totals.languages, &repo.languages);
        merge_counts(&mut totals.contribution_types, &repo.contribution_types);
        merge_counts(&mut totals.file_extensions, &repo.file_extensions);
    }

    totals.total_lines_changed = totals.total_lines_added + totals.total_lines_removed;
    totals.contribution_percentages = contribution_percentages(&totals.contribution_types);
    totals
}

fn merge_counts<K: Ord + Clone>(into: &mut BTreeMap<K, u64>, from: &BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key.clone()).or_insert(0) += count;
    }
}
