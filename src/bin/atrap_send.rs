//! atrap-send: Send a batch of SNMPv1 traps built from a definition file.
//!
//! Part of the async-trapgen CLI utilities.

use async_trapgen::cli::args::{OutputArgs, TrapArgs};
use async_trapgen::cli::output::{OutputContext, write_error};
use async_trapgen::dispatch::Dispatcher;
use async_trapgen::{TrapDefinition, TrapSender};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

/// Send SNMPv1 traps to a receiver and report each outcome.
#[derive(Debug, Parser)]
#[command(name = "atrap-send", version, about)]
struct Args {
    #[command(flatten)]
    trap: TrapArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.output.init_tracing();

    let ctx = OutputContext::new(args.output.format);
    let mut stdout = io::stdout().lock();

    if let Err(e) = ctx.write_settings(&mut stdout, &args.trap.settings()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let parsed = match TrapDefinition::from_file(&args.trap.file) {
        Ok(parsed) => parsed,
        Err(e) => {
            write_error(&e);
            return ExitCode::FAILURE;
        }
    };
    let definition = parsed.definition;

    // Same check every send would make; fail once here instead of N times
    if let Err(e) = definition
        .with_agent_address(args.trap.entity.as_str())
        .validate()
    {
        write_error(&e);
        return ExitCode::FAILURE;
    }

    let sender = TrapSender::new(&args.trap.sender_config());
    let dispatcher = Dispatcher::new(sender, args.trap.plan());

    let mut write_failed = false;
    let batch = dispatcher
        .run_with_events(Arc::new(definition), |event| {
            if ctx.write_event(&mut stdout, event).is_err() {
                write_failed = true;
            }
        })
        .await;

    if ctx.write_summary(&mut stdout, &batch).is_err() || stdout.flush().is_err() {
        write_failed = true;
    }

    if write_failed || batch.failures() > 0 || !batch.is_complete() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
