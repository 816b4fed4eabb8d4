//! Renderers turning a [`DashboardData`] snapshot into text.
//!
//! Rendering never touches the filesystem; [`write_report`] is the separate
//! persist step.

pub mod badge;
pub mod console;
pub mod json;
pub mod markdown;
pub mod narrative;
pub mod portfolio;

use crate::error::Result;
use crate::model::DashboardData;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Markdown,
    Narrative,
    Portfolio,
    Badge,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 5] = [
        ReportFormat::Json,
        ReportFormat::Markdown,
        ReportFormat::Narrative,
        ReportFormat::Portfolio,
        ReportFormat::Badge,
    ];

    /// File name used when every format is written into one directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            ReportFormat::Json => "activity.json",
            ReportFormat::Markdown => "report.md",
            ReportFormat::Narrative => "summary.txt",
            ReportFormat::Portfolio => "portfolio.md",
            ReportFormat::Badge => "badge.md",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportFormat::Json => "JSON",
            ReportFormat::Markdown => "Markdown",
            ReportFormat::Narrative => "Summary",
            ReportFormat::Portfolio => "Portfolio",
            ReportFormat::Badge => "Badge",
        }
    }

    pub fn render(self, data: &DashboardData) -> Result<String> {
        Ok(match self {
            ReportFormat::Json => json::render(data)?,
            ReportFormat::Markdown => markdown::render(data),
            ReportFormat::Narrative => narrative::render(data),
            ReportFormat::Portfolio => portfolio::render(data),
            ReportFormat::Badge => badge::render(data),
        })
    }
}

/// Persist already rendered content, replacing any existing file.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    debug!(path = %path.display(), bytes = content.len(), "writing report");
    fs::write(path, content)?;
    Ok(())
}
