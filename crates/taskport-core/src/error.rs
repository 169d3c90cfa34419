//! Error types for the export session.

use crate::task::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single task could not be transformed for export.
///
/// These never abort the in-progress replay; the session holds the first one
/// and surfaces it from [`crate::ExportSession::finish`].
#[derive(Debug, Error)]
pub enum TransformError {
    /// The task was classified as exportable but no command was ever
    /// captured for it, usually because the interceptor was bypassed for
    /// that task type.
    #[error("no command was captured for this task")]
    MissingCommand,

    /// An output path does not live under the build directory, so no
    /// build-relative Makefile target can be derived for it.
    #[error("output {} is outside the build directory", .0.display())]
    ForeignOutput(PathBuf),

    /// The host reported an exportable task with an empty output list.
    #[error("task produced no outputs")]
    NoOutputs,
}

/// Errors reported by [`crate::ExportSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The layout places the build directory somewhere other than below the
    /// project root. Rejected up front rather than emitting broken relative
    /// paths later.
    #[error("build directory {} is not under the project root {}", .build.display(), .root.display())]
    BuildDirOutsideRoot { root: PathBuf, build: PathBuf },

    /// A command was recorded twice for the same task. Captured commands are
    /// write-once.
    #[error("a command was already recorded for {task}")]
    CommandAlreadyRecorded { task: TaskId },

    /// A deferred per-task transform failure, reported at end of export with
    /// the offending task and the raw command that was captured for it.
    #[error("export failed for {task}: {source}\n  cmd: {command}")]
    Transform {
        task: TaskId,
        /// The captured argv joined with spaces, empty when none was captured.
        command: String,
        source: TransformError,
    },
}
