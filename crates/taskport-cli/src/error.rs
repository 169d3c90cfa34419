//! Error handling for the taskport CLI.
//!
//! A small `thiserror` hierarchy: [`CliError`] is the top level returned by
//! every command, [`ConfigError`] covers everything that must fail before a
//! single task is replayed. The binary boundary converts to miette reports.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration errors: reported before any task is replayed and
    /// before any artifact is written.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session errors, including deferred per-task transform failures.
    #[error(transparent)]
    Session(#[from] taskport_core::SessionError),

    /// Emitter errors (malformed project XML, serialization failures).
    #[error("export error: {0}")]
    Export(#[from] taskport_export::ExportError),

    /// File or directory not found
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Errors that terminate the run before any build task is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested export format is not one we know.
    #[error(
        "unknown export format '{0}'\n\nHint: supported formats are: makefile, codeblocks, all"
    )]
    UnknownFormat(String),

    /// No export format was requested at all.
    #[error("no export format selected\n\nHint: pass --formats makefile,codeblocks or --formats all")]
    NoFormatSelected,

    /// The build log doesn't exist at the expected location.
    #[error("build log not found: {}\n\nHint: point --log at the build log your build wrote", .0.display())]
    LogNotFound(PathBuf),

    /// The build log is not valid JSON (or misses required fields).
    #[error("invalid build log: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// I/O error while reading the build log.
    #[error("failed to read build log: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CliError`] as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Replace a not-found I/O error with the path that was missing.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error with a short description of what was attempted.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{err}\n\nHint: {hint}"))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{msg}: {err}"))
        })
    }
}

/// Convert a [`CliError`] to a miette report for terminal rendering.
pub fn to_report(err: CliError) -> miette::Report {
    match err {
        CliError::Session(e) => miette::miette!("export failed\n\n{e}"),
        other => miette::miette!("{other}"),
    }
}
