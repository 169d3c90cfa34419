//! Emitters for taskport export models.
//!
//! Two output formats:
//!
//! - [`makefile`]: a single Makefile with `all`/`clean`/`install`/`uninstall`
//!   sections plus one rule block per compile/link task. Always regenerated
//!   from scratch; byte-identical for identical models.
//! - [`codeblocks`]: one Code::Blocks `.cbp` project per link target plus a
//!   shared workspace file. Existing files on disk are parsed, patched, and
//!   re-serialized so unrelated targets and sources survive a re-export.

pub mod codeblocks;
mod error;
pub mod makefile;

pub use error::ExportError;

/// Project identity stamped into emitted artifacts.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    /// Named build variant (e.g. a cross-compilation environment); selects
    /// the `<name>-<variant>.mk` Makefile file name.
    pub variant: Option<String>,
}
