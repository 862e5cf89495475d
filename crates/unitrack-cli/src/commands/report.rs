//! The `unitrack report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use unitrack_core::classifier::classify_records;
use unitrack_core::parser::{parse_curriculum, parse_transcript};
use unitrack_core::report::ProgressReport;

use crate::config::load_config_from;

pub fn execute(
    transcript: Option<PathBuf>,
    curriculum: Option<PathBuf>,
    external_hours: Option<u32>,
    format: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let transcript_path = transcript.or_else(|| config.transcript_path()).context(
        "no transcript given; pass --transcript or set `transcript` in unitrack.toml",
    )?;
    let curriculum_path = curriculum.or_else(|| config.curriculum_path()).context(
        "no curriculum given; pass --curriculum or set `curriculum` in unitrack.toml",
    )?;
    let external_hours = external_hours.unwrap_or(config.external_hours);
    let format = format.unwrap_or(config.format);

    let transcript = parse_transcript(&transcript_path)?;
    let curriculum = parse_curriculum(&curriculum_path)?;

    if let Some(program) = &transcript.student.program {
        if *program != curriculum.id {
            tracing::warn!(
                program = %program,
                curriculum = %curriculum.id,
                "transcript program does not match the curriculum"
            );
        }
    }

    let records = classify_records(&transcript.courses);
    tracing::info!(
        courses = records.len(),
        curriculum = %curriculum.id,
        "computing report"
    );
    let report = ProgressReport::compute(&records, &curriculum, external_hours)
        .with_student(transcript.student.name.clone());

    match format.as_str() {
        "table" => print_summary(&report, curriculum.name.as_str()),
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{json}");
        }
        other => anyhow::bail!("unknown format: '{other}' (expected 'table' or 'json')"),
    }

    if let Some(output) = output {
        report.save_json(&output)?;
        eprintln!("Report saved to: {}", output.display());
    }

    Ok(())
}

fn print_summary(report: &ProgressReport, curriculum_name: &str) {
    use comfy_table::{Cell, Table};

    let derived = &report.derived;
    let title = if curriculum_name.is_empty() {
        report.curriculum_id.as_str()
    } else {
        curriculum_name
    };
    match &report.student {
        Some(student) => println!("{student} | {title}"),
        None => println!("{title}"),
    }

    let mut metrics = Table::new();
    metrics.set_header(vec!["Metric", "Value"]);
    metrics.add_row(vec![
        Cell::new("CR"),
        Cell::new(format!("{:.3}", derived.metrics.cr)),
    ]);
    metrics.add_row(vec![
        Cell::new("Simple average"),
        Cell::new(format!("{:.3}", derived.metrics.simple_average)),
    ]);
    metrics.add_row(vec![
        Cell::new("Credits"),
        Cell::new(format!("{:.3}", derived.metrics.credit_count)),
    ]);
    metrics.add_row(vec![
        Cell::new("PCH"),
        Cell::new(format!("{:.3}", derived.metrics.pch)),
    ]);
    metrics.add_row(vec![
        Cell::new("PCR"),
        Cell::new(format!("{:.3}", derived.metrics.pcr)),
    ]);
    metrics.add_row(vec![
        Cell::new("Status"),
        Cell::new(&derived.status.text),
    ]);
    metrics.add_row(vec![Cell::new("Trend"), Cell::new(&derived.trend.text)]);
    println!("\n{metrics}");

    let mut categories = Table::new();
    categories.set_header(vec!["Category", "Required", "Completed", "Remaining"]);
    for progress in &derived.category_progress {
        categories.add_row(vec![
            Cell::new(progress.category.label()),
            Cell::new(progress.required),
            Cell::new(progress.completed),
            Cell::new(progress.remaining),
        ]);
    }
    println!("\n{categories}");

    println!(
        "\nProgress: {:.1}% ({} counted hours, {} in progress)",
        derived.progress_percent, derived.counted_hours, derived.hours.in_progress
    );
    println!("Graduation: {}", derived.forecast.text);
}
