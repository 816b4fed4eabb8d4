//! Terminal summary. Styling follows `console`'s colour detection, so the
//! text is plain when stdout is not a terminal.

use crate::model::{ActivitySummary, DashboardData};
use crate::util::{bar, share, sorted_desc, thousands};
use console::style;

const TOP_LANGUAGES: usize = 8;
const TOP_REPOSITORIES: usize = 10;
const TECH_TAGS: usize = 3;

fn heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push("-".repeat(40));
    lines.push(style(title).bold().to_string());
    lines.push("-".repeat(40));
}

pub fn render(data: &DashboardData) -> String {
    let stats = &data.summary;
    let mut lines: Vec<String> = Vec::new();

    lines.push(String::new());
    lines.push("=".repeat(60));
    lines.push(style("GIT ACTIVITY DASHBOARD").bold().to_string());
    lines.push("=".repeat(60));
    lines.push(String::new());
    lines.push(format!("Repositories analyzed: {}", style(stats.total_repos).cyan()));
    lines.push(format!("Total commits: {}", style(thousands(stats.total_commits)).cyan()));
    lines.push(format!("Lines added: {}", style(thousands(stats.total_lines_added)).green()));
    lines.push(format!("Lines removed: {}", style(thousands(stats.total_lines_removed)).red()));
    lines.push(format!("Files changed: {}", style(thousands(stats.total_files_changed)).cyan()));

    heading(&mut lines, "CONTRIBUTION BREAKDOWN");
    for (ctype, _) in sorted_desc(&stats.contribution_types) {
        let pct = stats.percentage(*ctype);
        lines.push(format!(
            "  {:20} {:5.1}% {}",
            ctype.label(),
            pct,
            style(bar(pct, 2.0)).green()
        ));
    }

    if !stats.languages.is_empty() {
        heading(&mut lines, "TOP LANGUAGES");
        let total: u64 = stats.languages.values().sum();
        for (lang, count) in sorted_desc(&stats.languages).into_iter().take(TOP_LANGUAGES) {
            let pct = share(count, total);
            lines.push(format!("  {:20} {:5.1}% {}", lang, pct, style(bar(pct, 2.0)).blue()));
        }
    }

    if !data.weekly_activity.is_empty() {
        heading(&mut lines, "WEEKLY ACTIVITY");
        for week in &data.weekly_activity {
            let blocks = "█".repeat((week.commits / 2).min(20) as usize);
            lines.push(format!(
                "  {:20} {:3} commits  {:>6} lines  {}",
                week.period_label,
                week.commits,
                thousands(week.lines_changed()),
                style(blocks).green()
            ));
        }
    }

    heading(&mut lines, "REPOSITORIES");
    for repo in data.repositories_by_commits().into_iter().take(TOP_REPOSITORIES) {
        let techs = if repo.technologies.is_empty() {
            "N/A".to_string()
        } else {
            repo.technologies.iter().take(TECH_TAGS).cloned().collect::<Vec<_>>().join(", ")
        };
        lines.push(format!(
            "  {:30} {:4} commits  [{}]",
            repo.name,
            repo.total_commits,
            style(techs).dim()
        ));
    }

    lines.push(String::new());
    lines.push("=".repeat(60));
    lines.push(String::new());
    lines.join("\n")
}

/// One activity window, as printed for `--period`.
pub fn render_period(summary: &ActivitySummary) -> String {
    let mut lines = vec![
        format!(
            "{} ({} to {})",
            style(&summary.period_label).bold(),
            summary.period_start.format("%Y-%m-%d %H:%M"),
            summary.period_end.format("%Y-%m-%d %H:%M")
        ),
        format!("  Commits: {}", style(summary.commits).cyan()),
        format!(
            "  Lines: {} / {}",
            style(format!("+{}", thousands(summary.lines_added))).green(),
            style(format!("-{}", thousands(summary.lines_removed))).red()
        ),
        format!("  Files changed: {}", thousands(summary.files_changed)),
        format!("  Active repositories: {}", summary.repos_active),
    ];

    let total = summary.lines_changed();
    for (ctype, count) in sorted_desc(&summary.contribution_breakdown) {
        lines.push(format!("    {:20} {:5.1}%", ctype.label(), share(count, total)));
    }
    lines.join("\n")
}
