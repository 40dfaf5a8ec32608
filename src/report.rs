use std::fmt::{self, Write};

use crate::aggregate::{round_to, Mean};
use crate::config::ReportFormat;
use crate::dashboard::DashboardView;
use crate::dataset::{Dataset, ScoreColumn};
use crate::error::Result;
use crate::outcome::derive_result;

const NO_VALUE: &str = "—";

/// Metric display: two decimal places, or a dash when undefined.
pub fn format_mean(mean: Mean) -> String {
    match mean {
        Some(value) => round_to(value, 2).to_string(),
        None => NO_VALUE.to_string(),
    }
}

pub fn render(view: &DashboardView, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        ReportFormat::Text => Ok(render_text(view)?),
    }
}

fn render_text(view: &DashboardView) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let m = &view.metrics;

    writeln!(out, "== Key Performance Indicators")?;
    writeln!(out, "Total Students: {}", m.count)?;
    for column in [ScoreColumn::Math, ScoreColumn::Reading, ScoreColumn::Writing, ScoreColumn::Total] {
        writeln!(out, "Avg {}: {}", column.label(), format_mean(m.mean(column)))?;
    }

    writeln!(out, "\n== Pass / Fail")?;
    if view.outcomes.is_empty() {
        writeln!(out, "no data")?;
    }
    for bucket in &view.outcomes.buckets {
        writeln!(out, "{}: {} ({}%)", bucket.outcome, bucket.count, bucket.share)?;
    }

    writeln!(out, "\n== Score Distributions")?;
    for (column, hist) in &view.distributions {
        match hist {
            Some(h) => {
                writeln!(out, "{} [{} – {}]: {:?}", column.label(), h.min, h.max, h.counts)?;
            }
            None => {
                writeln!(out, "{}: no data", column.label())?;
            }
        }
    }

    for comparison in &view.comparisons {
        writeln!(out, "\n== Average Scores by {}", comparison.column.label())?;
        if comparison.groups.is_empty() {
            writeln!(out, "no data")?;
        }
        for (key, stats) in &comparison.groups {
            let means: Vec<String> = stats
                .means
                .iter()
                .map(|(column, mean)| format!("{} {}", column.label(), format_mean(*mean)))
                .collect();
            writeln!(out, "{} (n={}): {}", key, stats.rows.len(), means.join(", "))?;
        }
    }

    writeln!(out, "\n== Top {} Students", view.top_students.len())?;
    write_table(&mut out, &view.top_students)?;
    writeln!(out, "\n== Filtered Dataset Preview")?;
    write_table(&mut out, &view.preview)?;
    Ok(out)
}

fn write_table(out: &mut String, dataset: &Dataset) -> fmt::Result {
    if dataset.is_empty() {
        return writeln!(out, "no data");
    }
    writeln!(out, "row\t{}\tresult", dataset.columns().join("\t"))?;
    for (row, record) in dataset.rows() {
        writeln!(out, "{}\t{}\t{}", row, record.fields().join("\t"), derive_result(record))?;
    }
    Ok(())
}
