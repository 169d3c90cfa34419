//! The in-memory export model: components and Makefile rules accumulated in
//! task-completion order.

use crate::task::TaskKind;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// What kind of artifact a [`Component`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Intermediate compiled object.
    Object,
    /// Linked executable program.
    Program,
    /// Linked shared library.
    SharedLib,
    /// Archived static library.
    StaticLib,
}

impl ComponentKind {
    pub fn from_task(kind: TaskKind) -> Self {
        match kind {
            TaskKind::CompileObject => Self::Object,
            TaskKind::LinkProgram => Self::Program,
            TaskKind::LinkSharedLib => Self::SharedLib,
            TaskKind::LinkStaticLib => Self::StaticLib,
        }
    }

    pub fn is_link(self) -> bool {
        !matches!(self, Self::Object)
    }

    /// Code::Blocks target type code, for link kinds only.
    pub fn cbp_type_code(self) -> Option<&'static str> {
        match self {
            Self::Object => None,
            Self::Program => Some("1"),
            Self::StaticLib => Some("2"),
            Self::SharedLib => Some("3"),
        }
    }
}

/// One build artifact and the metadata the emitters need for it.
///
/// Created when a matching build task finishes, keyed by the absolute path
/// of its primary output, and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Component {
    /// Base file name of the primary output.
    pub name: String,
    pub kind: ComponentKind,
    /// Ordered absolute input paths (sources for compiles, objects for links).
    pub inputs: Vec<PathBuf>,
    /// Ordered absolute output paths; the first is the primary output.
    pub outputs: Vec<PathBuf>,
    /// Absolute paths the task depends on but does not produce.
    pub depends: Vec<PathBuf>,
    /// The captured argv, exactly as executed.
    pub argv: Vec<String>,
    /// The argv after path/flag rewriting, ready for textual embedding.
    pub rewritten_argv: Vec<String>,
    /// Code::Blocks compiler id derived from argv\[0\] and the target CPU.
    pub compiler: String,
}

/// One Makefile rule block, in the shape the emitter renders it.
#[derive(Debug, Clone)]
pub enum MakeRule {
    /// `<target>:` / `mkdir -p <dir>` / `<command>`
    Compile { target: String, command: String },
    /// `<name>: \` / dependency lines / `<command>`
    Link {
        name: String,
        deps: Vec<String>,
        command: String,
    },
}

/// Process-wide accumulator for one export session.
///
/// Components are keyed by absolute primary-output path; map order is task
/// completion order, which the host guarantees to be stable for a given
/// build. The flat `targets`/`rules` lists feed the Makefile emitter and are
/// deliberately not de-duplicated.
#[derive(Debug, Default)]
pub struct ExportModel {
    pub components: IndexMap<PathBuf, Component>,
    /// Build-relative target paths, e.g. `build/src/foo.o`.
    pub targets: Vec<String>,
    pub rules: Vec<MakeRule>,
}

impl ExportModel {
    /// True when no exportable task was seen.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.components.is_empty()
    }

    /// The component that produced `output`, if any.
    pub fn component(&self, output: &Path) -> Option<&Component> {
        self.components.get(output)
    }

    /// All link-target components, in completion order.
    pub fn link_components(&self) -> impl Iterator<Item = &Component> {
        self.components.values().filter(|c| c.kind.is_link())
    }
}

/// Derives the Code::Blocks compiler id from the executed compiler binary
/// and the target CPU.
pub(crate) fn compiler_id(argv: &[String], dest_cpu: &str) -> String {
    let cc = argv
        .first()
        .map(|c| {
            Path::new(c)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| c.clone())
        })
        .unwrap_or_default();
    if cc.contains("mingw32") {
        "mingw32gcc".to_owned()
    } else if dest_cpu == "arm" {
        "armelfgcc".to_owned()
    } else {
        cc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cbp_type_codes() {
        assert_eq!(ComponentKind::Program.cbp_type_code(), Some("1"));
        assert_eq!(ComponentKind::StaticLib.cbp_type_code(), Some("2"));
        assert_eq!(ComponentKind::SharedLib.cbp_type_code(), Some("3"));
        assert_eq!(ComponentKind::Object.cbp_type_code(), None);
    }

    #[test]
    fn compiler_id_uses_binary_basename() {
        let argv = vec!["/usr/bin/gcc".to_string()];
        assert_eq!(compiler_id(&argv, "x86_64"), "gcc");
    }

    #[test]
    fn compiler_id_maps_mingw_and_arm() {
        let mingw = vec!["i686-w64-mingw32-gcc".to_string()];
        assert_eq!(compiler_id(&mingw, "x86_64"), "mingw32gcc");

        let gcc = vec!["gcc".to_string()];
        assert_eq!(compiler_id(&gcc, "arm"), "armelfgcc");
    }
}
