use crate::model::{ContributionType, DashboardData, RepositoryStats};
use crate::util::{bar, share, sorted_desc, thousands};

const SKILL_LIMIT: usize = 10;

pub fn render(data: &DashboardData) -> String {
    let stats = &data.summary;
    let mut lines: Vec<String> = Vec::new();

    lines.push("# Project Portfolio".into());
    lines.push(String::new());
    lines.push(format!("*Generated on {}*", data.generated_at.format("%Y-%m-%d")));
    lines.push(String::new());

    lines.push("## Summary".into());
    lines.push(String::new());
    lines.push(format!("- **Total Projects:** {}", stats.total_repos));
    lines.push(format!("- **Total Commits:** {}", thousands(stats.total_commits)));
    lines.push(format!("- **Total Lines of Code:** {}", thousands(stats.total_lines_added)));
    lines.push(String::new());

    if !stats.languages.is_empty() {
        lines.push("## Technical Skills".into());
        lines.push(String::new());
        let total: u64 = stats.languages.values().sum();
        for (lang, count) in sorted_desc(&stats.languages).into_iter().take(SKILL_LIMIT) {
            let pct = share(count, total);
            lines.push(format!("- **{}**: {:.1}% {}", lang, pct, bar(pct, 5.0)));
        }
        lines.push(String::new());
    }

    lines.push("## Code Quality Practices".into());
    lines.push(String::new());
    lines.push("| Category | Percentage |".into());
    lines.push("|----------|------------|".into());
    for (label, ctype) in [
        ("Production Code", ContributionType::ProductionCode),
        ("Tests", ContributionType::Tests),
        ("Documentation", ContributionType::Documentation),
        ("Infrastructure/DevOps", ContributionType::Infrastructure),
    ] {
        lines.push(format!("| {} | {:.1}% |", label, stats.percentage(ctype)));
    }
    lines.push(String::new());

    lines.push("## Projects".into());
    lines.push(String::new());
    for repo in data.repositories_by_commits() {
        project(&mut lines, repo);
    }

    lines.join("\n")
}

fn project(lines: &mut Vec<String>, repo: &RepositoryStats) {
    lines.push(format!("### {}", repo.name));
    lines.push(String::new());

    if !repo.description.is_empty() {
        lines.push(repo.description.clone());
        lines.push(String::new());
    }
    if !repo.technologies.is_empty() {
        lines.push(format!("**Technologies:** {}", repo.technologies.join(", ")));
        lines.push(String::new());
    }

    lines.push("**My Contribution:**".into());
    lines.push(format!("- {} commits", repo.total_commits));
    lines.push(format!(
        "- {} lines added, {} lines removed",
        thousands(repo.total_lines_added),
        thousands(repo.total_lines_removed)
    ));

    if let (Some(first), Some(last)) = (repo.first_commit_date, repo.last_commit_date) {
        lines.push(format!("- Project duration: {}", duration((last - first).num_days())));
    }

    if !repo.languages.is_empty() {
        let top: Vec<&str> = sorted_desc(&repo.languages)
            .into_iter()
            .take(3)
            .map(|(lang, _)| lang.as_str())
            .collect();
        lines.push(format!("- Primary languages: {}", top.join(", ")));
    }

    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());
}

/// Whole days, switching to 30-day months past one month.
fn duration(days: i64) -> String {
    if days > 30 {
        format!("{} month(s)", days / 30)
    } else {
        format!("{days} day(s)")
    }
}
