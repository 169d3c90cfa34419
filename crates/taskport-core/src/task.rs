//! Task identities, host-reported task facts, and the task classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable identifier for one host build task within an export session.
///
/// The host assigns these; the session only requires them to be unique for
/// the duration of one export invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task #{}", self.0)
    }
}

/// The closed set of build-task kinds this exporter understands.
///
/// Only C/C++-family compile and link steps are exportable. The classifier
/// assigns a kind from the host's task metadata at the session boundary;
/// nothing downstream ever inspects metadata strings again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Single source file compiled to a single object file.
    CompileObject,
    /// Objects and libraries linked into an executable program.
    LinkProgram,
    /// Objects linked into a shared library.
    LinkSharedLib,
    /// Objects archived into a static library.
    LinkStaticLib,
}

impl TaskKind {
    /// Maps a host-provided task kind string to a [`TaskKind`].
    ///
    /// Returns `None` for anything outside the C/C++ family. That is a
    /// deliberate filter, not an error: the host runs plenty of task kinds
    /// (resource copies, code generators) that have no export counterpart.
    pub fn classify(host_kind: &str) -> Option<Self> {
        match host_kind {
            "c" | "cxx" => Some(Self::CompileObject),
            "cprogram" | "cxxprogram" => Some(Self::LinkProgram),
            "cshlib" | "cxxshlib" => Some(Self::LinkSharedLib),
            "cstlib" | "cxxstlib" => Some(Self::LinkStaticLib),
            _ => None,
        }
    }

    /// Whether this kind produces a final link target rather than an
    /// intermediate object.
    pub fn is_link(self) -> bool {
        !matches!(self, Self::CompileObject)
    }
}

/// Facts the host build framework reports for one finished task.
///
/// All paths are absolute; relativization against the project root and build
/// directory happens inside the session.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: TaskId,
    /// Host task-kind metadata, e.g. `c`, `cxx`, `cprogram`, `cxxshlib`.
    pub kind: String,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    /// Files the task depends on but does not produce (headers, libraries).
    pub deps: Vec<PathBuf>,
}

/// The literal command a task executed, captured by the interceptor.
///
/// Set exactly once, immediately after the command runs; read-only afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCommand {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
}
