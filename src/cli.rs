use crate::analyzer::{AnalyzeOptions, Analyzer};
use crate::git::{find_repositories, is_repository_root, AuthorFilter};
use crate::model::DashboardData;
use crate::period::{summarize_at, Period, Timestamp};
use crate::report::{console as console_report, write_report, ReportFormat};
use crate::util::parse_date_bound;
use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{ArgAction, Args, Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gitdash")]
#[command(about = "Git activity dashboard: analyze your contributions across repositories")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub target: TargetArgs,

    #[clap(flatten)]
    pub filter: FilterArgs,

    #[clap(flatten)]
    pub period: PeriodArgs,

    #[clap(flatten)]
    pub export: ExportArgs,

    #[arg(short, long, help = "Suppress console output")]
    pub quiet: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Log more to stderr (-v info, -vv debug)")]
    pub verbose: u8,
}

#[derive(Args, Clone)]
pub struct TargetArgs {
    #[arg(short, long, num_args = 1.., value_name = "PATH", help = "Specific repository paths to analyze")]
    pub repos: Vec<PathBuf>,

    #[arg(short, long, value_name = "DIR", help = "Scan directory for git repositories")]
    pub scan: Option<PathBuf>,

    #[arg(short, long, default_value_t = 3, help = "Maximum depth when scanning for repos")]
    pub depth: usize,
}

#[derive(Args, Clone)]
pub struct FilterArgs {
    #[arg(short, long, env = "GITDASH_EMAIL", help = "Filter commits by author email")]
    pub email: Option<String>,

    #[arg(short, long, env = "GITDASH_AUTHOR", help = "Filter commits by author name")]
    pub author: Option<String>,

    #[arg(
        long = "git-timeout",
        value_name = "DURATION",
        value_parser = humantime::parse_duration,
        default_value = "60s",
        help = "Give up on a repository whose git log takes longer than this"
    )]
    pub git_timeout: Duration,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
    Last7,
    Custom,
}

#[derive(Args, Clone)]
pub struct PeriodArgs {
    #[arg(long, value_enum, help = "Also print activity for this period")]
    pub period: Option<PeriodKind>,

    #[arg(long, help = "Custom period start (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub from: Option<String>,

    #[arg(long, help = "Custom period end (RFC3339, YYYY-MM-DD, or 'N days ago')")]
    pub to: Option<String>,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    #[arg(long, value_name = "FILE", help = "Export to JSON file")]
    pub json: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Export to Markdown file")]
    pub markdown: Option<PathBuf>,

    #[arg(long, visible_alias = "linkedin", value_name = "FILE", help = "Export a short narrative summary")]
    pub summary: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Export project portfolio")]
    pub portfolio: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Export README badge/widget")]
    pub badge: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Export all formats to specified directory")]
    pub all_exports: Option<PathBuf>,
}

impl TargetArgs {
    /// Explicit paths win over a scan; with neither, the current directory must be a repository.
    fn resolve(&self, quiet: bool) -> Result<Vec<PathBuf>> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;

        if !self.repos.is_empty() {
            return Ok(self.repos.iter().map(|p| absolute(&cwd, p)).collect());
        }

        if let Some(scan) = &self.scan {
            let root = absolute(&cwd, scan);
            if !root.is_dir() {
                bail!("{} is not a directory", root.display());
            }
            let found = find_repositories(&root, self.depth);
            if found.is_empty() {
                bail!("No git repositories found in {}", root.display());
            }
            if !quiet {
                println!("Found {} repositories", style(found.len()).cyan());
            }
            return Ok(found);
        }

        if !is_repository_root(&cwd) {
            bail!(
                "Current directory is not a git repository.\n\
                 Use -r to specify repos or -s to scan a directory."
            );
        }
        Ok(vec![cwd])
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

impl FilterArgs {
    pub fn analyze_options(&self) -> AnalyzeOptions {
        AnalyzeOptions {
            author: AuthorFilter::from_parts(self.email.clone(), self.author.clone()),
            timeout: self.git_timeout,
        }
    }
}

impl PeriodArgs {
    /// `--from`/`--to` without `--period` imply a custom period.
    pub fn resolve(&self, now: Timestamp) -> Result<Option<Period>> {
        let kind = match (self.period, &self.from, &self.to) {
            (Some(kind), _, _) => kind,
            (None, None, None) => return Ok(None),
            (None, _, _) => PeriodKind::Custom,
        };

        let period = match kind {
            PeriodKind::Day => Period::Day,
            PeriodKind::Week => Period::Week,
            PeriodKind::Month => Period::Month,
            PeriodKind::Last7 => Period::LastSevenDays,
            PeriodKind::Custom => {
                let start = bound(self.from.as_deref(), now, "--from")?;
                let end = bound(self.to.as_deref(), now, "--to")?;
                if let (Some(s), Some(e)) = (start, end) {
                    if s > e {
                        bail!("Invalid range: --from ({s}) is after --to ({e})");
                    }
                }
                Period::Custom { start, end }
            }
        };
        Ok(Some(period))
    }
}

fn bound(raw: Option<&str>, now: Timestamp, flag: &str) -> Result<Option<Timestamp>> {
    raw.map(|s| parse_date_bound(s, now).with_context(|| format!("Failed to parse {flag}")))
        .transpose()
}

impl ExportArgs {
    fn requested(&self) -> Vec<(ReportFormat, PathBuf)> {
        if let Some(dir) = &self.all_exports {
            return ReportFormat::ALL
                .iter()
                .map(|f| (*f, dir.join(f.default_file_name())))
                .collect();
        }

        [
            (ReportFormat::Json, &self.json),
            (ReportFormat::Markdown, &self.markdown),
            (ReportFormat::Narrative, &self.summary),
            (ReportFormat::Portfolio, &self.portfolio),
            (ReportFormat::Badge, &self.badge),
        ]
        .into_iter()
        .filter_map(|(format, path)| path.clone().map(|p| (format, p)))
        .collect()
    }

    fn write(&self, data: &DashboardData, quiet: bool) -> Result<()> {
        if let Some(dir) = &self.all_exports {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        }

        for (format, path) in self.requested() {
            let content = format
                .render(data)
                .with_context(|| format!("Failed to render {} export", format.title()))?;
            write_report(&path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet && self.all_exports.is_none() {
                println!("{} exported to: {}", format.title(), style(path.display()).dim());
            }
        }

        if let (Some(dir), false) = (&self.all_exports, quiet) {
            println!("All exports saved to: {}", style(dir.display()).dim());
        }
        Ok(())
    }
}

fn progress_bar(len: usize, quiet: bool) -> ProgressBar {
    if quiet || len < 2 {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let now = Local::now();
        // Reject bad bounds before spending time on git.
        let period = self.period.resolve(now.fixed_offset())?;
        let repo_paths = self.target.resolve(self.quiet)?;

        let mut analyzer = Analyzer::new(self.filter.analyze_options());
        let pb = progress_bar(repo_paths.len(), self.quiet);
        for path in &repo_paths {
            if !self.quiet {
                pb.suspend(|| println!("Analyzing: {}", path.display()));
            }
            pb.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
            analyzer.analyze_repo(path);
            pb.inc(1);
        }
        pb.finish_and_clear();

        if analyzer.repos().is_empty() {
            bail!("No repositories were successfully analyzed.");
        }

        let data = analyzer.dashboard_data_at(now);
        if !self.quiet {
            print!("{}", console_report::render(&data));
        }
        if let Some(period) = &period {
            println!("{}", console_report::render_period(&summarize_at(now, period, analyzer.repos())));
        }

        self.export.write(&data, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gitdash").chain(args.iter().copied())).unwrap()
    }

    fn now() -> Timestamp {
        DateTime::parse_from_rfc3339("2024-03-13T15:30:00+00:00").unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(cli.target.repos.is_empty());
        assert_eq!(cli.target.depth, 3);
        assert_eq!(cli.filter.git_timeout, Duration::from_secs(60));
        assert!(!cli.quiet);
        assert!(cli.period.resolve(now()).unwrap().is_none());
        assert!(cli.export.requested().is_empty());
    }

    #[test]
    fn repos_take_several_paths() {
        let cli = parse(&["-r", "a", "b", "--git-timeout", "2m 30s"]);
        assert_eq!(cli.target.repos, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.filter.git_timeout, Duration::from_secs(150));
    }

    #[test]
    fn email_beats_author() {
        let cli = parse(&["-e", "me@example.com", "-a", "Me"]);
        assert_eq!(
            cli.filter.analyze_options().author,
            Some(AuthorFilter::Email("me@example.com".into()))
        );
    }

    #[test]
    fn linkedin_is_an_alias_for_summary() {
        let cli = parse(&["--linkedin", "post.txt", "--json", "out.json"]);
        let requested = cli.export.requested();
        assert_eq!(
            requested,
            vec![
                (ReportFormat::Json, PathBuf::from("out.json")),
                (ReportFormat::Narrative, PathBuf::from("post.txt")),
            ]
        );
    }

    #[test]
    fn all_exports_uses_default_names() {
        let cli = parse(&["--all-exports", "out", "--json", "ignored.json"]);
        let names: Vec<_> = cli.export.requested().into_iter().map(|(_, p)| p).collect();
        assert_eq!(names.len(), 5);
        assert!(names.contains(&PathBuf::from("out/activity.json")));
        assert!(names.contains(&PathBuf::from("out/summary.txt")));
    }

    #[test]
    fn period_resolution() {
        assert_eq!(parse(&["--period", "week"]).period.resolve(now()).unwrap(), Some(Period::Week));
        assert_eq!(
            parse(&["--period", "last7"]).period.resolve(now()).unwrap(),
            Some(Period::LastSevenDays)
        );

        let custom = parse(&["--from", "2024-01-01", "--to", "2024-01-31"])
            .period
            .resolve(now())
            .unwrap()
            .unwrap();
        let window = custom.window_at(now());
        assert_eq!(window.label, "2024-01-01 to 2024-01-31");

        let half = parse(&["--period", "custom", "--from", "1 week ago"]).period.resolve(now()).unwrap();
        assert_eq!(half.unwrap().window_at(now()).label, "Last 7 Days");

        assert!(parse(&["--from", "someday"]).period.resolve(now()).is_err());
    }

    #[test]
    fn custom_range_must_not_run_backwards() {
        let err = parse(&["--from", "2024-02-01", "--to", "2024-01-01"])
            .period
            .resolve(now())
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid range: --from"), "{err}");

        let same_day = parse(&["--from", "2024-01-01", "--to", "2024-01-01"]).period.resolve(now()).unwrap();
        let window = same_day.unwrap().window_at(now());
        assert!(window.start <= window.end);
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(Cli::try_parse_from(["gitdash", "--period", "year"]).is_err());
    }
}
