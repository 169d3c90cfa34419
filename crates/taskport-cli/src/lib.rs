//! taskport CLI - export compiled build tasks to external project formats.
//!
//! This crate provides the `taskport` binary. It reads the JSON build log a
//! host build framework writes (one entry per executed compile/link task),
//! replays it through a `taskport_core::ExportSession`, and renders the
//! selected artifacts with `taskport-export`.
//!
//! Modules:
//!
//! - [`cli`] - clap command-line definition
//! - [`commands`] - `export` and `check` implementations
//! - [`config`] - export-format selection
//! - [`manifest`] - the build-log document
//! - [`error`] - error hierarchy and miette conversion
//! - [`logger`] - tracing setup

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod manifest;

pub use error::{CliError, ConfigError, Result, ResultExt};
