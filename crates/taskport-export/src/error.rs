use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while emitting artifacts.
///
/// All of these are fatal to the export; nothing is retried and no partial
/// cleanup is attempted.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed project XML: {0}")]
    Parse(#[from] xmltree::ParseError),

    #[error("failed to serialize project XML: {0}")]
    Write(#[from] xmltree::Error),

    /// An existing file parsed as XML but is not shaped like the document
    /// we generate, e.g. a `.cbp` without a `<Project>` element.
    #[error("malformed file {}: missing <{element}> element", .path.display())]
    MissingElement {
        path: PathBuf,
        element: &'static str,
    },
}
