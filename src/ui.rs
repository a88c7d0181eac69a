//! Interface de terminal do gluedash: spinner, tabelas e JSON.
//!
//! Usa as crates `indicatif` para o spinner exibido durante as chamadas à AWS
//! e `console` para cores e largura de colunas. Toda listagem também pode
//! ser impressa como JSON.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, TimeDelta, Utc};
use console::{Alignment, Style, measure_text_width, pad_str};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::dashboard::{DescribeReport, JobsReport, StateMachineRow};
use crate::model::{JobRunStatus, JobRunSummary};

/// Spinner exibido no stderr durante as chamadas à AWS.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

/// Aguarda `fut` com um spinner exibindo `message`.
pub async fn spin<F: Future>(message: &str, fut: F) -> F::Output {
    let spinner = Spinner::start(message);
    let output = fut.await;
    spinner.finish();
    output
}

/// Célula de tabela: texto e um estilo opcional aplicado após o padding.
struct Cell {
    text: String,
    style: Option<Style>,
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self { text, style: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::from(text.to_string())
    }
}

struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    fn new(headers: Vec<&'static str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&cell.text));
            }
        }

        let bold = Style::new().bold();
        let mut out = String::new();
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| bold.apply_to(pad_str(h, *w, Alignment::Left, None)).to_string())
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| {
                    let padded = pad_str(&cell.text, *w, Alignment::Left, None);
                    match &cell.style {
                        Some(style) => style.apply_to(padded).to_string(),
                        None => padded.into_owned(),
                    }
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_duration(d: TimeDelta) -> String {
    let total = d.num_seconds().max(0);
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

fn format_names(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn format_arguments(arguments: &BTreeMap<String, String>) -> String {
    if arguments.is_empty() {
        return "-".to_string();
    }
    arguments
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_style(status: JobRunStatus) -> Style {
    match status {
        JobRunStatus::Succeeded => Style::new().green(),
        JobRunStatus::Failed
        | JobRunStatus::Error
        | JobRunStatus::Timeout
        | JobRunStatus::Expired => Style::new().red().bold(),
        JobRunStatus::Stopped | JobRunStatus::Unknown => Style::new().dim(),
        _ => Style::new().yellow(),
    }
}

fn print_none(what: &str) {
    println!("{}", Style::new().dim().apply_to(format!("No {what} found.")));
}

/// Imprime qualquer valor serializável como JSON formatado.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_state_machines(rows: &[StateMachineRow]) {
    if rows.is_empty() {
        print_none("state machines");
        return;
    }
    let red = Style::new().red();
    let mut table = Table::new(vec!["STATE MACHINE", "TYPE", "CREATED", "GLUE JOBS"]);
    for row in rows {
        let jobs = match &row.definition_error {
            Some(err) => Cell {
                text: err.clone(),
                style: Some(red.clone()),
            },
            None => format_names(&row.glue_jobs).into(),
        };
        table.push(vec![
            row.summary.name.as_str().into(),
            row.summary.workflow_type.as_str().into(),
            format_timestamp(row.summary.created_at).into(),
            jobs,
        ]);
    }
    print!("{}", table.render());
}

pub fn print_jobs(report: &JobsReport) {
    if report.jobs.is_empty() {
        print_none("Glue jobs");
    } else {
        let mut table = Table::new(vec![
            "GLUE JOB",
            "CREATED",
            "VERSION",
            "WORKER",
            "WORKERS",
            "STATE MACHINES",
        ]);
        for row in &report.jobs {
            let job = &row.job;
            table.push(vec![
                job.name.as_str().into(),
                format_timestamp(job.created_at).into(),
                job.glue_version.as_deref().unwrap_or("-").into(),
                job.worker_type.as_deref().unwrap_or("-").into(),
                job.number_of_workers
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string())
                    .into(),
                format_names(&row.state_machines).into(),
            ]);
        }
        print!("{}", table.render());
    }

    if !report.unknown_jobs.is_empty() {
        let yellow = Style::new().yellow();
        println!();
        println!(
            "{}",
            yellow.apply_to("Started by state machines but not listed by Glue:")
        );
        for (job, machines) in &report.unknown_jobs {
            println!("  {job} <- {}", format_names(machines));
        }
    }
}

pub fn print_job_runs(job_name: &str, runs: &[JobRunSummary]) {
    if runs.is_empty() {
        print_none(&format!("runs of `{job_name}`"));
        return;
    }
    let mut table = Table::new(vec![
        "RUN ID",
        "STATUS",
        "STARTED",
        "COMPLETED",
        "DURATION",
        "ARGUMENTS",
    ]);
    for run in runs {
        let duration = if run.status.is_terminal() {
            format_duration(run.duration())
        } else {
            "running".to_string()
        };
        table.push(vec![
            run.id.as_str().into(),
            Cell {
                text: run.status.to_string(),
                style: Some(status_style(run.status)),
            },
            format_timestamp(run.started_at).into(),
            format_timestamp(run.completed_at).into(),
            duration.into(),
            format_arguments(&run.arguments).into(),
        ]);
    }
    print!("{}", table.render());

    let red = Style::new().red();
    for run in runs {
        if let Some(message) = &run.error_message {
            println!("  {} {}: {message}", red.apply_to("✗"), run.id);
        }
    }
}

/// Imprime uma lista de nomes com título, um por linha.
pub fn print_names(title: &str, names: &BTreeSet<String>) {
    if names.is_empty() {
        print_none(title);
        return;
    }
    println!("{}", Style::new().bold().apply_to(title));
    for name in names {
        println!("  {name}");
    }
}

pub fn print_describe(report: &DescribeReport) {
    let bold = Style::new().bold();
    println!("{}", bold.apply_to(&report.summary.name));
    println!("  arn:     {}", report.summary.arn);
    println!("  type:    {}", report.summary.workflow_type);
    println!("  status:  {}", report.status.as_deref().unwrap_or("-"));
    println!("  created: {}", format_timestamp(report.summary.created_at));
    println!("  start:   {}", report.start_at.as_deref().unwrap_or("-"));
    if let Some(comment) = &report.comment {
        println!("  comment: {comment}");
    }
    println!();
    print_names("Glue jobs", &report.glue_jobs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let mut table = Table::new(vec!["NAME", "JOBS"]);
        table.push(vec!["orders_pipeline".into(), "load".into()]);
        table.push(vec!["x".into(), "-".into()]);
        console::set_colors_enabled(false);
        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "NAME             JOBS");
        assert_eq!(lines[1], "orders_pipeline  load");
        assert_eq!(lines[2], "x                -");
    }

    #[test]
    fn durations_are_human_readable() {
        assert_eq!(format_duration(TimeDelta::zero()), "0s");
        assert_eq!(format_duration(TimeDelta::seconds(59)), "59s");
        assert_eq!(format_duration(TimeDelta::seconds(125)), "2m 5s");
        assert_eq!(format_duration(TimeDelta::seconds(3723)), "1h 2m 3s");
    }

    #[test]
    fn timestamps_use_utc_and_dash_for_missing() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap();
        assert_eq!(format_timestamp(Some(ts)), "2024-03-01 06:30:00");
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn names_and_arguments_formatting() {
        let names: BTreeSet<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format_names(&names), "a, b");
        assert_eq!(format_names(&BTreeSet::new()), "-");

        let mut args = BTreeMap::new();
        args.insert("--day".to_string(), "2024-01-01".to_string());
        args.insert("--env".to_string(), "prod".to_string());
        assert_eq!(format_arguments(&args), "--day=2024-01-01 --env=prod");
        assert_eq!(format_arguments(&BTreeMap::new()), "-");
    }
}
