use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Bucket a changed file is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    ProductionCode,
    Tests,
    Documentation,
    SpecsConfig,
    Infrastructure,
    Styling,
    Other,
}

impl ContributionType {
    pub const ALL: [ContributionType; 7] = [
        ContributionType::ProductionCode,
        ContributionType::Tests,
        ContributionType::Documentation,
        ContributionType::SpecsConfig,
        ContributionType::Infrastructure,
        ContributionType::Styling,
        ContributionType::Other,
    ];

    /// Stable key used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            ContributionType::ProductionCode => "production_code",
            ContributionType::Tests => "tests",
            ContributionType::Documentation => "documentation",
            ContributionType::SpecsConfig => "specs_config",
            ContributionType::Infrastructure => "infrastructure",
            ContributionType::Styling => "styling",
            ContributionType::Other => "other",
        }
    }

    /// Human-readable label used by the reports.
    pub fn label(self) -> &'static str {
        match self {
            ContributionType::ProductionCode => "Production Code",
            ContributionType::Tests => "Tests",
            ContributionType::Documentation => "Documentation",
            ContributionType::SpecsConfig => "Specs & Config",
            ContributionType::Infrastructure => "Infrastructure",
            ContributionType::Styling => "Styling",
            ContributionType::Other => "Other",
        }
    }
}

impl fmt::Display for ContributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileClassification {
    pub file_path: String,
    pub contribution_type: ContributionType,
    pub language: Option<String>,
    pub lines_added: u32,
    pub lines_removed: u32,
}

impl FileClassification {
    pub fn lines_changed(&self) -> u64 {
        self.lines_added as u64 + self.lines_removed as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub files_changed: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub file_classifications: Vec<FileClassification>,
}

impl CommitRecord {
    pub fn new(
        hash: String,
        author_name: String,
        author_email: String,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Self {
            hash,
            author_name,
            author_email,
            timestamp,
            message,
            files_changed: 0,
            lines_added: 0,
            lines_removed: 0,
            file_classifications: Vec::new(),
        }
    }

    pub fn add_file(&mut self, classification: FileClassification) {
        self.lines_added += classification.lines_added as u64;
        self.lines_removed += classification.lines_removed as u64;
        self.files_changed += 1;
        self.file_classifications.push(classification);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub name: String,
    pub path: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub total_commits: u64,
    pub total_lines_added: u64,
    pub total_lines_removed: u64,
    pub total_files_changed: u64,
    pub first_commit_date: Option<DateTime<FixedOffset>>,
    pub last_commit_date: Option<DateTime<FixedOffset>>,
    pub last_commit_hash: Option<String>,
    pub head_commit: Option<String>,
    pub languages: BTreeMap<String, u64>,
    pub contribution_types: BTreeMap<ContributionType, u64>,
    pub file_extensions: BTreeMap<String, u64>,
    #[serde(skip)]
    pub commits: Vec<CommitRecord>,
}

impl RepositoryStats {
    pub fn total_lines_changed(&self) -> u64 {
        self.total_lines_added + self.total_lines_removed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub period_label: String,
    pub period_start: DateTime<FixedOffset>,
    pub period_end: DateTime<FixedOffset>,
    pub commits: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub files_changed: u64,
    pub repos_active: usize,
    pub contribution_breakdown: BTreeMap<ContributionType, u64>,
    pub language_breakdown: BTreeMap<String, u64>,
}

impl ActivitySummary {
    pub fn empty(
        period_label: String,
        period_start: DateTime<FixedOffset>,
        period_end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            period_label,
            period_start,
            period_end,
            commits: 0,
            lines_added: 0,
            lines_removed: 0,
            files_changed: 0,
            repos_active: 0,
            contribution_breakdown: BTreeMap::new(),
            language_breakdown: BTreeMap::new(),
        }
    }

    pub fn lines_changed(&self) -> u64 {
        self.lines_added + self.lines_removed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_repos: usize,
    pub total_commits: u64,
    pub total_lines_added: u64,
    pub total_lines_removed: u64,
    pub total_lines_changed: u64,
    pub total_files_changed: u64,
    pub languages: BTreeMap<String, u64>,
    pub contribution_types: BTreeMap<ContributionType, u64>,
    pub contribution_percentages: BTreeMap<ContributionType, f64>,
    pub file_extensions: BTreeMap<String, u64>,
}

impl TotalStats {
    pub fn percentage(&self, ctype: ContributionType) -> f64 {
        self.contribution_percentages.get(&ctype).copied().unwrap_or(0.0)
    }
}

/// Everything the renderers need, captured at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub version: u32,
    pub generated_at: DateTime<FixedOffset>,
    pub summary: TotalStats,
    pub repositories: Vec<RepositoryStats>,
    pub daily_activity: Vec<ActivitySummary>,
    pub weekly_activity: Vec<ActivitySummary>,
}

impl DashboardData {
    /// The bucket covering the current week, if any was computed.
    pub fn current_week(&self) -> Option<&ActivitySummary> {
        self.weekly_activity.first()
    }

    /// Repositories ordered by commit count, busiest first.
    pub fn repositories_by_commits(&self) -> Vec<&RepositoryStats> {
        let mut repos: Vec<&RepositoryStats> = self.repositories.iter().collect();
        repos.sort_by(|a, b| b.total_commits.cmp(&a.total_commits).then_with(|| a.name.cmp(&b.name)));
        repos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn contribution_type_keys_are_injective() {
        let keys: HashSet<_> = ContributionType::ALL.iter().map(|c| c.as_str()).collect();
        let labels: HashSet<_> = ContributionType::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(keys.len(), ContributionType::ALL.len());
        assert_eq!(labels.len(), ContributionType::ALL.len());
    }

    #[test]
    fn contribution_type_serializes_as_its_key() {
        for ctype in ContributionType::ALL {
            let json = serde_json::to_string(&ctype).unwrap();
            assert_eq!(json, format!("\"{}\"", ctype.as_str()));
        }
    }

    #[test]
    fn contribution_type_map_serializes_with_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(ContributionType::SpecsConfig, 4u64);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"specs_config":4}"#);
    }

    #[test]
    fn add_file_accumulates_totals() {
        let ts = DateTime::parse_from_rfc3339("2024-01-15T10:30:00+00:00").unwrap();
        let mut commit = CommitRecord::new(
            "abc".into(),
            "Jane".into(),
            "jane@example.com".into(),
            ts,
            "msg".into(),
        );
        commit.add_file(FileClassification {
            file_path: "src/lib.rs".into(),
            contribution_type: ContributionType::ProductionCode,
            language: Some("Rust".into()),
            lines_added: 7,
            lines_removed: 2,
        });
        assert_eq!(commit.files_changed, 1);
        assert_eq!(commit.lines_added, 7);
        assert_eq!(commit.lines_removed, 2);
        assert_eq!(commit.file_classifications[0].lines_changed(), 9);
    }
}
