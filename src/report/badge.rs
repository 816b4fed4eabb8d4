use crate::model::{ContributionType, DashboardData};
use crate::util::thousands;

/// Embeddable HTML/Markdown widget comparing all-time figures with this week.
pub fn render(data: &DashboardData) -> String {
    let stats = &data.summary;
    let week = data.current_week();
    let week_commits = week.map_or(0, |w| w.commits);
    let week_lines = week.map_or(0, |w| w.lines_changed());
    let week_repos = week.map_or(0, |w| w.repos_active);

    let mut lines: Vec<String> = vec![
        "<!-- Git Activity Dashboard Widget -->".into(),
        "<div align='center'>".into(),
        String::new(),
        "### Developer Activity".into(),
        String::new(),
        "| Metric | All Time | This Week |".into(),
        "|--------|----------|-----------|".into(),
        format!("| Commits | {} | {} |", thousands(stats.total_commits), week_commits),
        format!(
            "| Lines Changed | {} | {} |",
            thousands(stats.total_lines_changed),
            thousands(week_lines)
        ),
        format!("| Repositories | {} | {} |", stats.total_repos, week_repos),
        String::new(),
    ];

    let badges: Vec<String> = [(ContributionType::Tests, "Tests"), (ContributionType::Documentation, "Docs")]
        .into_iter()
        .filter(|(ctype, _)| stats.percentage(*ctype) > 0.0)
        .map(|(ctype, name)| format!("{}: {:.1}%", name, stats.percentage(ctype)))
        .collect();
    if !badges.is_empty() {
        lines.push(format!("**Code Quality:** {}", badges.join(" | ")));
        lines.push(String::new());
    }

    lines.push("</div>".into());
    lines.push("<!-- End Git Activity Dashboard Widget -->".into());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn widget_compares_all_time_and_week() {
        let out = render(&fixture::dashboard());
        let expected = "\
<!-- Git Activity Dashboard Widget -->
<div align='center'>

### Developer Activity

| Metric | All Time | This Week |
|--------|----------|-----------|
| Commits | 3 | 2 |
| Lines Changed | 25 | 10 |
| Repositories | 2 | 2 |

**Code Quality:** Tests: 20.0% | Docs: 12.0%

</div>
<!-- End Git Activity Dashboard Widget -->";
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_dashboard_has_zeroes_and_no_badges() {
        let mut data = fixture::dashboard_of(Vec::new());
        data.weekly_activity.clear();
        let out = render(&data);
        assert!(out.contains("| Commits | 0 | 0 |"));
        assert!(out.contains("| Repositories | 0 | 0 |"));
        assert!(!out.contains("Code Quality"));
    }
}
