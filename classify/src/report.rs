//! Batch output rendering.

use std::io::Write;

use mobilenet_sandbox::BatchReport;
use serde::Serialize;

use crate::cli::Format;

/// One output row; `error` is set instead of `label` for failed items.
#[derive(Debug, Serialize)]
struct Row<'a> {
    item: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inference_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn rows(report: &BatchReport) -> Vec<Row<'_>> {
    report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(p) => Row {
                item: &outcome.name,
                index: Some(p.index),
                label: Some(&p.label),
                inference_ms: Some(p.elapsed.as_secs_f64() * 1000.0),
                error: None,
            },
            Err(e) => Row {
                item: &outcome.name,
                index: None,
                label: None,
                inference_ms: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Write `report` to `out` in the chosen format.
pub fn render(report: &BatchReport, format: Format, out: &mut impl Write) -> anyhow::Result<()> {
    let rows = rows(report);
    match format {
        Format::Text => {
            for row in &rows {
                match (&row.label, &row.error) {
                    (Some(label), _) => writeln!(
                        out,
                        "{}: {} (index {}, {:.1} ms)",
                        row.item,
                        label,
                        row.index.unwrap_or_default(),
                        row.inference_ms.unwrap_or_default()
                    )?,
                    (None, Some(error)) => writeln!(out, "{}: error: {}", row.item, error)?,
                    (None, None) => {}
                }
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Fail if the batch aborted or any item failed.
pub fn check(report: &BatchReport) -> anyhow::Result<()> {
    if report.is_success() {
        return Ok(());
    }
    if report.aborted {
        anyhow::bail!("batch aborted after {} item(s)", report.outcomes.len());
    }
    anyhow::bail!(
        "{} of {} item(s) failed",
        report.failures().count(),
        report.outcomes.len()
    );
}
