//! Export-session core for taskport.
//!
//! The host build framework runs compile and link commands; this crate turns
//! the facts it reports (executed argv, working directory, input/output and
//! dependency paths) into an in-memory [`ExportModel`] that the emitters in
//! `taskport-export` render into a Makefile or Code::Blocks projects.
//!
//! # Pipeline
//!
//! ```text
//! CommandInterceptor -> TaskKind classifier -> Rewriter -> ExportModel
//! ```
//!
//! All state lives on an explicit [`ExportSession`] whose lifetime is exactly
//! one export invocation. The host either calls the session hooks directly
//! ([`ExportSession::record_command`] / [`ExportSession::task_completed`]) or
//! wraps its command runner in a [`CommandInterceptor`] so capture happens as
//! a side effect of normal execution.
//!
//! Per-task transform failures are deferred: they never interrupt the
//! in-progress replay, but the first one recorded becomes the terminal error
//! of [`ExportSession::finish`], so no artifact is emitted from a model that
//! silently dropped a task.

pub mod error;
pub mod intercept;
pub mod model;
pub mod rewrite;
pub mod session;
pub mod task;

pub use error::{SessionError, TransformError};
pub use intercept::{CommandInterceptor, CommandRunner};
pub use model::{Component, ComponentKind, ExportModel, MakeRule};
pub use rewrite::Rewriter;
pub use session::{BuildLayout, ExportSession};
pub use task::{CapturedCommand, TaskId, TaskKind, TaskRecord};
