//! CLI utilities for async-trapgen.
//!
//! Command-line argument parsing and report formatting for the
//! `atrap-send` tool.
//!
//! This module is only available with the `cli` feature.

pub mod args;
pub mod output;
