//! Short social-post style summary of the current week.

use crate::model::{ContributionType, DashboardData};
use crate::util::{sorted_desc, thousands};

const HASHTAGS: &str = "#coding #developer #programming #softwareengineering";

pub fn render(data: &DashboardData) -> String {
    let stats = &data.summary;
    let mut lines: Vec<String> = vec!["My Developer Activity This Week".into(), String::new()];

    if let Some(week) = data.current_week().filter(|w| w.commits > 0) {
        lines.push(format!("Commits: {}", week.commits));
        lines.push(format!("Lines of code: {}", thousands(week.lines_changed())));
        lines.push(format!("Active repos: {}", week.repos_active));
        lines.push(String::new());
    }

    let quality: Vec<String> = [ContributionType::Tests, ContributionType::Documentation]
        .into_iter()
        .filter(|ctype| stats.percentage(*ctype) > 0.0)
        .map(|ctype| format!("{}: {:.1}%", ctype.label(), stats.percentage(ctype)))
        .collect();
    if !quality.is_empty() {
        lines.push("Code Quality Breakdown:".into());
        lines.extend(quality.into_iter().map(|q| format!("  {q}")));
        lines.push(String::new());
    }

    if !stats.languages.is_empty() {
        let top: Vec<&str> = sorted_desc(&stats.languages)
            .into_iter()
            .take(3)
            .map(|(lang, _)| lang.as_str())
            .collect();
        lines.push(format!("Top Languages: {}", top.join(", ")));
        lines.push(String::new());
    }

    lines.push(HASHTAGS.into());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixture;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_summary() {
        let out = render(&fixture::dashboard());
        let expected = "\
My Developer Activity This Week

Commits: 2
Lines of code: 10
Active repos: 2

Code Quality Breakdown:
  Tests: 20.0%
  Documentation: 12.0%

Top Languages: Python, Infrastructure, Documentation

#coding #developer #programming #softwareengineering";
        assert_eq!(out, expected);
    }

    #[test]
    fn quiet_week_omits_weekly_figures() {
        let mut data = fixture::dashboard();
        for week in &mut data.weekly_activity {
            week.commits = 0;
        }
        let out = render(&data);
        assert!(!out.contains("Commits:"));
        assert!(out.contains("Top Languages"));
    }

    #[test]
    fn empty_dashboard_is_just_the_frame() {
        let out = render(&fixture::dashboard_of(Vec::new()));
        assert_eq!(out, format!("My Developer Activity This Week\n\n{HASHTAGS}"));
    }
}
