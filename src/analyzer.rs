use crate::aggregate::{aggregate_repository, total_stats};
use crate::classify::FileClassifier;
use crate::error::Result;
use crate::git::{run_log, AuthorFilter, GitRepo, DEFAULT_TIMEOUT};
use crate::model::{ActivitySummary, DashboardData, RepositoryStats, TotalStats, SCHEMA_VERSION};
use crate::parse::LogParser;
use crate::period::{self, Period};
use chrono::{DateTime, Local, TimeZone};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Days and weeks of rolling activity embedded in [`DashboardData`].
pub const DASHBOARD_DAYS: u32 = 7;
pub const DASHBOARD_WEEKS: u32 = 4;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub author: Option<AuthorFilter>,
    /// Upper bound on a single `git log` invocation.
    pub timeout: Duration,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            author: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Analyzes repositories one after another and keeps every successful result.
///
/// A repository that cannot be read yields nothing and does not stop the run.
pub struct Analyzer {
    options: AnalyzeOptions,
    classifier: FileClassifier,
    repos: Vec<RepositoryStats>,
}

impl Analyzer {
    pub fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            classifier: FileClassifier::new(),
            repos: Vec::new(),
        }
    }

    pub fn options(&self) -> &AnalyzeOptions {
        &self.options
    }

    /// Analyze the repository rooted at `path` and keep its statistics.
    ///
    /// Returns `None`, after logging why, when the path is not a repository,
    /// git cannot be run, git fails or the invocation times out.
    pub fn analyze_repo(&mut self, path: &Path) -> Option<&RepositoryStats> {
        match self.collect(path) {
            Ok(stats) => {
                info!(
                    repo = %stats.name,
                    commits = stats.total_commits,
                    lines = stats.total_lines_changed(),
                    "analyzed repository"
                );
                self.repos.push(stats);
                self.repos.last()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "repository yielded no stats");
                None
            }
        }
    }

    fn collect(&self, path: &Path) -> Result<RepositoryStats> {
        let repo = GitRepo::open(path)?;
        let output = run_log(repo.path(), self.options.author.as_ref(), self.options.timeout)?;
        let commits = LogParser::new(&self.classifier).parse(&output);

        let mut stats = aggregate_repository(&repo.name(), &repo.path().display().to_string(), commits);
        stats.description = repo.description();
        stats.technologies = repo.technologies();
        stats.head_commit = repo.head_commit();
        Ok(stats)
    }

    pub fn repos(&self) -> &[RepositoryStats] {
        &self.repos
    }

    pub fn total_stats(&self) -> TotalStats {
        total_stats(&self.repos)
    }

    pub fn summarize(&self, period: &Period) -> ActivitySummary {
        period::summarize_at(Local::now(), period, &self.repos)
    }

    pub fn daily_activity(&self, days: u32) -> Vec<ActivitySummary> {
        period::daily_at(Local::now(), days, &self.repos)
    }

    pub fn weekly_activity(&self, weeks: u32) -> Vec<ActivitySummary> {
        period::weekly_at(Local::now(), weeks, &self.repos)
    }

    pub fn monthly_activity(&self, months: u32) -> Vec<ActivitySummary> {
        period::monthly_at(Local::now(), months, &self.repos)
    }

    pub fn quarterly_activity(&self, quarters: u32) -> Vec<ActivitySummary> {
        period::quarterly_at(Local::now(), quarters, &self.repos)
    }

    /// Snapshot everything the reports render, as of `now`.
    pub fn dashboard_data_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DashboardData {
        DashboardData {
            version: SCHEMA_VERSION,
            generated_at: now.fixed_offset(),
            summary: self.total_stats(),
            repositories: self.repos.clone(),
            daily_activity: period::daily_at(now.clone(), DASHBOARD_DAYS, &self.repos),
            weekly_activity: period::weekly_at(now, DASHBOARD_WEEKS, &self.repos),
        }
    }

    pub fn dashboard_data(&self) -> DashboardData {
        self.dashboard_data_at(Local::now())
    }
}
