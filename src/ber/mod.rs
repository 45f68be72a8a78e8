//! BER (Basic Encoding Rules) encoder for SNMP.
//!
//! Encoding only: this crate emits traps and never parses agent responses.
//! The implementation follows X.690 definite-length encoding.

mod encode;
mod length;
pub mod tag;

pub use encode::*;
pub use length::*;
pub use tag::*;
