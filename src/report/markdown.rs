use crate::model::DashboardData;
use crate::util::{sorted_desc, thousands};

const TOP_LANGUAGES: usize = 10;

pub fn render(data: &DashboardData) -> String {
    let stats = &data.summary;
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Git Activity Dashboard".into());
    lines.push(String::new());
    lines.push(format!("*Generated on {}*", data.generated_at.format("%Y-%m-%d %H:%M")));
    lines.push(String::new());

    lines.push("## Overview".into());
    lines.push(String::new());
    lines.push("| Metric | Value |".into());
    lines.push("|--------|-------|".into());
    lines.push(format!("| Repositories | {} |", stats.total_repos));
    lines.push(format!("| Total Commits | {} |", thousands(stats.total_commits)));
    lines.push(format!("| Lines Added | {} |", thousands(stats.total_lines_added)));
    lines.push(format!("| Lines Removed | {} |", thousands(stats.total_lines_removed)));
    lines.push(format!("| Files Changed | {} |", thousands(stats.total_files_changed)));
    lines.push(String::new());

    lines.push("## Contribution Breakdown".into());
    lines.push(String::new());
    lines.push("| Type | Lines | Percentage |".into());
    lines.push("|------|-------|------------|".into());
    for (ctype, count) in sorted_desc(&stats.contribution_types) {
        lines.push(format!(
            "| {} | {} | {:.1}% |",
            ctype.label(),
            thousands(count),
            stats.percentage(*ctype)
        ));
    }
    lines.push(String::new());

    if !stats.languages.is_empty() {
        lines.push("## Languages".into());
        lines.push(String::new());
        lines.push("| Language | Lines |".into());
        lines.push("|----------|-------|".into());
        for (lang, count) in sorted_desc(&stats.languages).into_iter().take(TOP_LANGUAGES) {
            lines.push(format!("| {} | {} |", lang, thousands(count)));
        }
        lines.push(String::new());
    }

    lines.push("## Weekly Activity".into());
    lines.push(String::new());
    lines.push("| Week | Commits | Lines Changed |".into());
    lines.push("|------|---------|---------------|".into());
    for week in &data.weekly_activity {
        lines.push(format!(
            "| {} | {} | {} |",
            week.period_label,
            week.commits,
            thousands(week.lines_changed())
        ));
    }
    lines.push(String::new());

    lines.push("## Repositories".into());
    lines.push(String::new());
    for repo in data.repositories_by_commits() {
        lines.push(format!("### {}", repo.name));
        lines.push(String::new());
        if !repo.description.is_empty() {
            lines.push(format!("> {}", repo.description));
            lines.push(String::new());
        }
        if !repo.technologies.is_empty() {
            lines.push(format!("**Technologies:** {}", repo.technologies.join(", ")));
            lines.push(String::new());
        }
        lines.push(format!("- Commits: {}", repo.total_commits));
        lines.push(format!(
            "- Lines: +{} / -{}",
            thousands(repo.total_lines_added),
            thousands(repo.total_lines_removed)
        ));
        if let (Some(first), Some(last)) = (repo.first_commit_date, repo.last_commit_date) {
            lines.push(format!(
                "- Active: {} to {}",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixture;

    #[test]
    fn overview_and_breakdown() {
        let out = render(&fixture::dashboard());
        assert!(out.starts_with("# Git Activity Dashboard\n\n*Generated on 2024-03-13 15:30*"));
        assert!(out.contains("| Repositories | 2 |"));
        assert!(out.contains("| Total Commits | 3 |"));
        assert!(out.contains("| Lines Added | 24 |"));

        let prod = out.find("| Production Code | 13 | 52.0% |").unwrap();
        let tests = out.find("| Tests | 5 | 20.0% |").unwrap();
        let infra = out.find("| Infrastructure | 4 | 16.0% |").unwrap();
        let docs = out.find("| Documentation | 3 | 12.0% |").unwrap();
        assert!(prod < tests && tests < infra && infra < docs);
    }

    #[test]
    fn languages_weeks_and_repositories() {
        let out = render(&fixture::dashboard());
        assert!(out.contains("| Python | 18 |"));
        assert!(out.contains("| Week of Mar 11 | 2 | 10 |"));
        assert!(out.contains("| Week of Feb 19 | 0 | 0 |"));

        let webapp = out.find("### webapp").unwrap();
        let tools = out.find("### tools").unwrap();
        assert!(webapp < tools);
        assert!(out.contains("> A small web app."));
        assert!(out.contains("**Technologies:** Docker, Python"));
        assert!(out.contains("- Lines: +20 / -1"));
        assert!(out.contains("- Active: 2024-01-10 to 2024-03-12"));
    }

    #[test]
    fn empty_dashboard_skips_languages() {
        let out = render(&fixture::dashboard_of(Vec::new()));
        assert!(out.contains("| Repositories | 0 |"));
        assert!(!out.contains("## Languages"));
        assert!(out.contains("## Weekly Activity"));
    }
}
