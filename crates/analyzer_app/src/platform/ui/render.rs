use analyzer_core::{AppViewModel, Phase, StatusMessage, TypeFilter};

use super::constants::*;

/// Renders the view model as terminal lines; `stamp` prefixes the status line.
pub fn render(view: &AppViewModel, stamp: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let phase_text = match view.phase {
        Phase::Idle => "idle",
        Phase::Uploading => "uploading package...",
        Phase::FetchingDataset { after_upload: true } => "loading analysis results...",
        Phase::FetchingDataset { after_upload: false } => "refreshing...",
        Phase::Ready => "ready",
        Phase::Validating => "validating URLs...",
        Phase::Error => "error",
    };
    lines.push(format!("== {phase_text}"));

    if let Some(status) = &view.status {
        let tag = match status {
            StatusMessage::Success(_) => "ok",
            StatusMessage::Error(_) => "error",
        };
        lines.push(format!("[{stamp}] {tag}: {}", status.text()));
    }

    if !view.counts.is_empty() {
        lines.push(format!("Resource counts (total {}):", view.total));
        let width = view
            .counts
            .iter()
            .map(|row| row.resource_type.len())
            .max()
            .unwrap_or(0);
        for row in &view.counts {
            lines.push(format!("  {:<width$}  {}", row.resource_type, row.count));
        }
    }

    if view.loaded_count > 0 {
        lines.push(filter_line(view));
        for row in view.rows.iter().take(MAX_ROWS) {
            let mut line = format!("  {}  {}", row.key, row.display_name);
            if let Some(url) = &row.url {
                line.push_str(&format!("  <{url}>"));
            }
            lines.push(line);
        }
        if view.rows.len() > MAX_ROWS {
            lines.push(format!("  ... and {} more", view.rows.len() - MAX_ROWS));
        }
    }

    if let Some(rows) = &view.validation {
        lines.push("-- URL validation --".to_string());
        if rows.is_empty() {
            lines.push("  no canonical URLs reported".to_string());
        }
        for row in rows {
            lines.push(format!("  {}: {}", row.key, row.label));
        }
        lines.push("-- (close to dismiss) --".to_string());
    }

    if let Some(detail) = &view.selected {
        lines.push(format!("-- {} ({}) --", detail.key, detail.display_name));
        lines.extend(detail.json.lines().map(str::to_string));
    }

    lines
}

fn filter_line(view: &AppViewModel) -> String {
    let type_text = match &view.filter.resource_type {
        TypeFilter::All => "all",
        TypeFilter::Only(resource_type) => resource_type.as_str(),
    };
    let mut line = format!(
        "Resources: showing {} of {} (type: {type_text}",
        view.rows.len(),
        view.loaded_count
    );
    if !view.filter.search.is_empty() {
        line.push_str(&format!(", search: \"{}\"", view.filter.search));
    }
    line.push(')');
    line
}
