//! # async-trapgen
//!
//! Async SNMPv1 trap generator for load-testing and verifying trap
//! receivers.
//!
//! A trap is described once in a small text file, then sent many times,
//! concurrently, to a receiver. Every send produces exactly one outcome, and
//! the batch reports how long it took.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use async_trapgen::dispatch::{DispatchPlan, Dispatcher};
//! use async_trapgen::{SenderConfig, TrapDefinition, TrapSender};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> async_trapgen::Result<()> {
//! let parsed = TrapDefinition::from_file("trap_data.txt")?;
//! parsed.definition.validate()?;
//!
//! let config = SenderConfig {
//!     target: "192.168.1.50".into(),
//!     ..Default::default()
//! };
//! let plan = DispatchPlan {
//!     count: 100,
//!     launch_interval: Duration::from_millis(10),
//!     ..Default::default()
//! };
//!
//! let batch = Dispatcher::new(TrapSender::new(&config), plan)
//!     .run(Arc::new(parsed.definition), |report| println!("{:?}", report.outcome))
//!     .await;
//! println!("{} of {} sent in {:?}", batch.successes(), batch.expected, batch.elapsed);
//! # Ok(())
//! # }
//! ```
//!
//! # Trap Definition Format
//!
//! ```text
//! Enterprise => 1.3.6.1.4.1.9
//! Generic => 6
//! Specific => 1
//! Varbinds
//! 1.3.6.1.4.1.9.9.1 => hello
//! ```
//!
//! See [`definition`] for the parsing rules.
//!
//! # Tracing
//!
//! The library logs through [`tracing`] with targets under
//! `async_trapgen::*`. Install any subscriber to see them, e.g.
//! `RUST_LOG=async_trapgen=debug` with `tracing_subscriber::EnvFilter`.

pub mod ber;
pub mod client;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod sender;
pub mod transport;
pub mod varbind;
pub mod version;

pub(crate) mod util;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use client::{ClientConfig, TrapClient, TrapClientBuilder, TrapConnection};
pub use definition::{ParsedDefinition, TextVarBind, TrapDefinition};
pub use dispatch::{
    BatchReport, DispatchEvent, DispatchPlan, Dispatcher, ResultCollector, TaskReport,
};
pub use error::{Error, FieldParseError, OidErrorKind, Result, TrapField};
pub use message::TrapMessage;
pub use oid::Oid;
pub use pdu::{GenericTrap, TrapV1Pdu};
pub use sender::{DispatchOutcome, SendStage, SenderConfig, TrapSender};
pub use transport::{Connector, Transport, UdpConnector, UdpTransport};
pub use varbind::VarBind;
pub use version::Version;

/// Type alias for a client sending over real UDP sockets.
pub type UdpClient = TrapClient<UdpConnector>;
