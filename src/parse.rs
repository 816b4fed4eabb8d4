//! Parser for `git log --numstat` output.
//!
//! The log interleaves one header line per commit (fields joined by
//! [`FIELD_DELIMITER`]) with `<added>\t<removed>\t<path>` stat lines. The scan
//! keeps a single piece of state, the commit currently being filled, and emits
//! it when the next header or the end of input arrives.

use crate::classify::FileClassifier;
use crate::model::CommitRecord;
use crate::period::local_now;
use chrono::{DateTime, FixedOffset};
use tracing::warn;

/// Separates the header fields. Git emits it for `%x00`.
pub const FIELD_DELIMITER: char = '\x00';

/// `--format` argument producing headers this parser understands:
/// hash, author name, author email, strict ISO-8601 author date, subject.
pub const LOG_FORMAT: &str = "%H%x00%an%x00%ae%x00%aI%x00%s";

const HEADER_FIELDS: usize = 5;

/// Placeholder git prints instead of counts for binary files.
const BINARY_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader<'a> {
    pub hash: &'a str,
    pub author_name: &'a str,
    pub author_email: &'a str,
    pub date: &'a str,
    pub subject: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumStat<'a> {
    pub added: u32,
    pub removed: u32,
    pub path: &'a str,
}

/// A header is a line with exactly the expected number of delimited fields.
pub fn parse_header(line: &str) -> Option<CommitHeader<'_>> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != HEADER_FIELDS {
        return None;
    }
    Some(CommitHeader {
        hash: fields[0],
        author_name: fields[1],
        author_email: fields[2],
        date: fields[3],
        subject: fields[4],
    })
}

/// `<added>\t<removed>\t<path>`, where a count of `-` means binary and counts as 0.
pub fn parse_numstat(line: &str) -> Option<NumStat<'_>> {
    let mut parts = line.splitn(3, '\t');
    let added = parse_count(parts.next()?)?;
    let removed = parse_count(parts.next()?)?;
    let path = parts.next()?;
    if path.is_empty() {
        return None;
    }
    Some(NumStat { added, removed, path })
}

fn parse_count(field: &str) -> Option<u32> {
    if field == BINARY_PLACEHOLDER {
        return Some(0);
    }
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse an ISO-8601 timestamp, accepting a trailing `Z` for UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let normalized = match raw.strip_suffix('Z') {
        Some(prefix) => format!("{prefix}+00:00"),
        None => raw.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).ok()
}

/// Scan state: the commit still collecting stat lines, if any.
struct LogScan<'c> {
    classifier: &'c FileClassifier,
    open: Option<CommitRecord>,
    done: Vec<CommitRecord>,
}

impl<'c> LogScan<'c> {
    fn new(classifier: &'c FileClassifier) -> Self {
        Self {
            classifier,
            open: None,
            done: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if let Some(header) = parse_header(line) {
            self.close();
            self.open = Some(self.start_commit(&header));
            return;
        }

        // Stat lines before the first header have no commit to belong to.
        if let (Some(commit), Some(stat)) = (self.open.as_mut(), parse_numstat(line)) {
            let classification = self.classifier.classify(stat.path, stat.added, stat.removed);
            commit.add_file(classification);
        }
    }

    fn start_commit(&self, header: &CommitHeader<'_>) -> CommitRecord {
        let timestamp = parse_timestamp(header.date).unwrap_or_else(|| {
            warn!(
                commit = header.hash,
                date = header.date,
                "unparseable commit date, using current time"
            );
            local_now()
        });
        CommitRecord::new(
            header.hash.to_string(),
            header.author_name.to_string(),
            header.author_email.to_string(),
            timestamp,
            header.subject.to_string(),
        )
    }

    fn close(&mut self) {
        if let Some(commit) = self.open.take() {
            self.done.push(commit);
        }
    }

    fn finish(mut self) -> Vec<CommitRecord> {
        self.close();
        self.done
    }
}

pub struct LogParser<'c> {
    classifier: &'c FileClassifier,
}

impl<'c> LogParser<'c> {
    pub fn new(classifier: &'c FileClassifier) -> Self {
        Self { classifier }
    }

    /// Turn raw log text into commits, in the order the log lists them.
    /// Lines that are neither headers nor stat lines are skipped.
    pub fn parse(&self, log_output: &str) -> Vec<CommitRecord> {
        let mut scan = LogScan::new(self.classifier);
        for line in log_output.lines() {
            scan.feed(line);
        }
        scan.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContributionType;
    use pretty_assertions::assert_eq;

    fn header(hash: &str, date: &str, subject: &str) -> String {
        format!("{hash}\x00Jane Doe\x00jane@example.com\x00{date}\x00{subject}")
    }

    fn parse(text: &str) -> Vec<CommitRecord> {
        let classifier = FileClassifier::new();
        LogParser::new(&classifier).parse(text)
    }

    #[test]
    fn parses_header_and_stats() {
        let log = format!(
            "{}\n10\t5\tsrc/main.rs\n3\t2\tREADME.md\n",
            header("abc123", "2024-01-15T10:30:00+02:00", "Initial commit")
        );
        let commits = parse(&log);
        assert_eq!(commits.len(), 1);
        let c = &commits[0];
        assert_eq!(c.hash, "abc123");
        assert_eq!(c.author_name, "Jane Doe");
        assert_eq!(c.author_email, "jane@example.com");
        assert_eq!(c.message, "Initial commit");
        assert_eq!(c.timestamp.to_rfc3339(), "2024-01-15T10:30:00+02:00");
        assert_eq!((c.files_changed, c.lines_added, c.lines_removed), (2, 13, 7));
        assert_eq!(c.file_classifications[0].contribution_type, ContributionType::ProductionCode);
        assert_eq!(c.file_classifications[1].contribution_type, ContributionType::Documentation);
    }

    #[test]
    fn binary_stat_counts_as_zero() {
        assert_eq!(
            parse_numstat("-\t-\tassets/logo.png"),
            Some(NumStat { added: 0, removed: 0, path: "assets/logo.png" })
        );
        let log = format!("{}\n-\t-\tassets/logo.png\n", header("a", "2024-01-15T10:30:00Z", "bin"));
        let commits = parse(&log);
        assert_eq!(commits[0].files_changed, 1);
        assert_eq!(commits[0].lines_added, 0);
    }

    #[test]
    fn back_to_back_headers_yield_empty_commit() {
        let log = format!(
            "{}\n{}\n1\t1\tsrc/lib.rs\n",
            header("h1", "2024-01-15T10:30:00Z", "first"),
            header("h2", "2024-01-16T10:30:00Z", "second")
        );
        let commits = parse(&log);
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "h1");
        assert_eq!((commits[0].files_changed, commits[0].lines_added), (0, 0));
        assert_eq!(commits[1].files_changed, 1);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let log = format!(
            "4\t4\torphan.rs\n{}\n\nnot a stat line\nx\t1\tsrc/a.rs\n1\t2\n2\t0\tsrc/b.rs\n",
            header("h1", "2024-01-15T10:30:00Z", "work")
        );
        let commits = parse(&log);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].files_changed, 1);
        assert_eq!(commits[0].file_classifications[0].file_path, "src/b.rs");
    }

    #[test]
    fn header_requires_exact_field_count() {
        assert!(parse_header("a\x00b\x00c\x00d").is_none());
        assert!(parse_header("a\x00b\x00c\x00d\x00e\x00f").is_none());
        assert!(parse_header("a|b|c|d|e").is_none());
        assert!(parse_header("a\x00b\x00c\x00d\x00").is_some());
    }

    #[test]
    fn zulu_dates_are_utc() {
        let ts = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 0);
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn bad_dates_fall_back_without_dropping_the_commit() {
        let before = local_now();
        let log = format!("{}\n1\t0\tsrc/a.rs\n", header("h1", "yesterday-ish", "oops"));
        let commits = parse(&log);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].hash, "h1");
        assert_eq!(commits[0].lines_added, 1);
        assert!(commits[0].timestamp >= before);
    }

    #[test]
    fn paths_with_tabs_and_renames_are_kept_whole() {
        let stat = parse_numstat("1\t1\tsrc/{old => new}.rs").unwrap();
        assert_eq!(stat.path, "src/{old => new}.rs");
        let stat = parse_numstat("1\t1\tweird\tname.txt").unwrap();
        assert_eq!(stat.path, "weird\tname.txt");
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }
}
