//! Output formatting for the `atrap-send` tool.
//!
//! Supports human-readable and JSON-lines output. The report goes to
//! stdout; errors go to stderr.

use crate::cli::args::OutputFormat;
use crate::dispatch::{BatchReport, DispatchEvent, TaskReport};
use crate::sender::DispatchOutcome;
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

/// Separator printed between the settings echo and the reports.
pub const SEPARATOR: &str = "-------";

/// Settings echo in JSON output.
#[derive(Debug, Serialize)]
struct SettingsLine {
    settings: serde_json::Map<String, serde_json::Value>,
}

/// A launch notice in JSON output.
#[derive(Debug, Serialize)]
struct LaunchLine {
    launched: usize,
}

/// A task report, ready for JSON output.
#[derive(Debug, Serialize)]
pub struct TaskResult<'a> {
    pub task: usize,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
    pub latency_ms: f64,
}

impl<'a> From<&'a TaskReport> for TaskResult<'a> {
    fn from(report: &'a TaskReport) -> Self {
        let (status, stage, reason) = match &report.outcome {
            DispatchOutcome::Success => ("success", None, None),
            DispatchOutcome::Failure { stage, reason } => {
                ("failure", Some(stage.as_str()), Some(reason.as_str()))
            }
        };
        Self {
            task: report.task,
            status,
            stage,
            reason,
            latency_ms: millis(report.latency),
        }
    }
}

/// Batch totals, ready for JSON output.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub expected: usize,
    pub received: usize,
    pub successes: usize,
    pub failures: usize,
    pub elapsed_ms: f64,
}

impl From<&BatchReport> for BatchSummary {
    fn from(batch: &BatchReport) -> Self {
        Self {
            expected: batch.expected,
            received: batch.reports.len(),
            successes: batch.successes(),
            failures: batch.failures(),
            elapsed_ms: millis(batch.elapsed),
        }
    }
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
}

impl OutputContext {
    /// Create a new output context.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Echo the effective settings, then the separator.
    pub fn write_settings<W: Write>(
        &self,
        w: &mut W,
        settings: &[(&'static str, String)],
    ) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => {
                for (name, value) in settings {
                    writeln!(w, "{}: {}", name, value)?;
                }
                writeln!(w, "{}", SEPARATOR)
            }
            OutputFormat::Json => {
                let settings = settings
                    .iter()
                    .map(|(name, value)| ((*name).to_string(), serde_json::Value::from(value.as_str())))
                    .collect();
                write_json_line(w, &SettingsLine { settings })
            }
        }
    }

    /// Write a line for a task being launched.
    pub fn write_launch<W: Write>(&self, w: &mut W, task: usize) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => writeln!(w, "Creating task {}", task),
            OutputFormat::Json => write_json_line(w, &LaunchLine { launched: task }),
        }
    }

    /// Write a launch or a report, whichever `event` is.
    pub fn write_event<W: Write>(&self, w: &mut W, event: &DispatchEvent) -> io::Result<()> {
        match event {
            DispatchEvent::Launched { task } => self.write_launch(w, *task),
            DispatchEvent::Reported(report) => self.write_report(w, report),
        }
    }

    /// Write one task report as it arrives.
    pub fn write_report<W: Write>(&self, w: &mut W, report: &TaskReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => match &report.outcome {
                DispatchOutcome::Success => writeln!(
                    w,
                    "task {}: successful run ({:.2}ms)",
                    report.task,
                    millis(report.latency)
                ),
                DispatchOutcome::Failure { stage, reason } => writeln!(
                    w,
                    "task {}: !! RUN FAILED !! at {}: {}",
                    report.task, stage, reason
                ),
            },
            OutputFormat::Json => write_json_line(w, &TaskResult::from(report)),
        }
    }

    /// Write the batch totals.
    pub fn write_summary<W: Write>(&self, w: &mut W, batch: &BatchReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Human => {
                writeln!(
                    w,
                    "This task took {:?} to send {} messages.",
                    batch.elapsed, batch.expected
                )?;
                writeln!(
                    w,
                    "{} succeeded, {} failed",
                    batch.successes(),
                    batch.failures()
                )?;
                if !batch.is_complete() {
                    writeln!(
                        w,
                        "warning: only {} of {} tasks reported",
                        batch.reports.len(),
                        batch.expected
                    )?;
                }
                Ok(())
            }
            OutputFormat::Json => write_json_line(w, &BatchSummary::from(batch)),
        }
    }
}

fn write_json_line<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value).map_err(io::Error::other)?;
    writeln!(w)
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Write an error to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}
