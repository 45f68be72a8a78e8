//! Prelude module for convenient imports.
//!
//! ```rust,no_run
//! use async_trapgen::prelude::*;
//! ```
//!
//! This imports the definition, sender and dispatch types, the error types,
//! and the [`oid!`] macro.

pub use crate::definition::{ParsedDefinition, TrapDefinition};
pub use crate::dispatch::{BatchReport, DispatchEvent, DispatchPlan, Dispatcher, TaskReport};
pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::sender::{DispatchOutcome, SendStage, SenderConfig, TrapSender};

#[doc(no_inline)]
pub use crate::oid;
