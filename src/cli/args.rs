//! Command-line argument structures for the `atrap-send` tool.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatch::{DEFAULT_MAX_IN_FLIGHT, DispatchPlan};
use crate::sender::SenderConfig;

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable progress lines.
    #[default]
    Human,
    /// One JSON object per line, for scripting.
    Json,
}

/// Trap target and batch arguments.
#[derive(Debug, Parser)]
pub struct TrapArgs {
    /// Receiver IP address or host name.
    #[arg(long = "dest", default_value = "127.0.0.1")]
    pub dest: String,

    /// Number of traps to send.
    #[arg(long = "count", default_value_t = 1)]
    pub count: usize,

    /// Milliseconds to sleep between launching sends.
    #[arg(long = "sleep", value_name = "MS", default_value_t = 0)]
    pub sleep: u64,

    /// Receiver UDP port.
    #[arg(long = "port", default_value_t = 162)]
    pub port: u16,

    /// Community string.
    #[arg(long = "community", default_value = "public")]
    pub community: String,

    /// Trap definition file.
    #[arg(long = "file", default_value = "trap_data.txt")]
    pub file: PathBuf,

    /// Agent (entity) IPv4 address reported in each trap.
    #[arg(long = "entity", default_value = "127.0.0.1")]
    pub entity: String,

    /// Maximum sends in flight at once (0 for unbounded).
    #[arg(long = "concurrency", default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub concurrency: usize,
}

impl TrapArgs {
    /// Sender configuration for these arguments.
    pub fn sender_config(&self) -> SenderConfig {
        SenderConfig {
            target: self.dest.clone(),
            port: self.port,
            community: self.community.clone(),
            entity: self.entity.clone(),
        }
    }

    /// Dispatch plan for these arguments.
    pub fn plan(&self) -> DispatchPlan {
        DispatchPlan {
            count: self.count,
            launch_interval: Duration::from_millis(self.sleep),
            max_in_flight: (self.concurrency > 0).then_some(self.concurrency),
        }
    }

    /// Every setting as `(name, value)`, sorted by name.
    pub fn settings(&self) -> Vec<(&'static str, String)> {
        vec![
            ("community", self.community.clone()),
            ("concurrency", self.concurrency.to_string()),
            ("count", self.count.to_string()),
            ("dest", self.dest.clone()),
            ("entity", self.entity.clone()),
            ("file", self.file.display().to_string()),
            ("port", self.port.to_string()),
            ("sleep", self.sleep.to_string()),
        ]
    }
}

/// Output and logging arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human or json.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging (async_trapgen=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (async_trapgen=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Log filter directive for the debug/trace flags.
    pub fn filter_directive(&self) -> &'static str {
        if self.trace {
            "async_trapgen=trace"
        } else if self.debug {
            "async_trapgen=debug"
        } else {
            "async_trapgen=warn"
        }
    }

    /// Initialize tracing based on debug/trace flags.
    ///
    /// Logs go to stderr so stdout carries only the report.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(self.filter_directive()))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
