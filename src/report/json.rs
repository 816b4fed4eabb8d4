use crate::error::Result;
use crate::model::DashboardData;

/// Pretty-printed JSON of the whole snapshot. Per-commit detail is left out.
pub fn render(data: &DashboardData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
