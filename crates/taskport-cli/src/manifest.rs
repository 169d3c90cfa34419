//! The build-log manifest: facts the host build framework already computed,
//! dumped as JSON for taskport to replay.

use crate::error::{CliError, ConfigError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use taskport_core::BuildLayout;
use taskport_export::ProjectInfo;

/// A complete build log: project identity, directory layout, and one entry
/// per executed task in completion order.
#[derive(Debug, Deserialize)]
pub struct BuildLog {
    pub project: ProjectSection,
    pub layout: LayoutSection,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub variant: Option<String>,
}

/// Directories and target identity, all paths absolute.
#[derive(Debug, Deserialize)]
pub struct LayoutSection {
    pub root: PathBuf,
    pub build: PathBuf,
    pub prefix: PathBuf,
    /// Defaults to `<prefix>/bin`.
    #[serde(default)]
    pub bindir: Option<PathBuf>,
    /// Defaults to `<prefix>/lib`.
    #[serde(default)]
    pub libdir: Option<PathBuf>,
    pub dest_os: String,
    pub dest_cpu: String,
}

/// One executed build task as the host reported it.
#[derive(Debug, Deserialize)]
pub struct TaskEntry {
    /// Host task-kind metadata, e.g. `c`, `cxx`, `cprogram`.
    pub kind: String,
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub outputs: Vec<PathBuf>,
    #[serde(default)]
    pub deps: Vec<PathBuf>,
    /// The exact command line executed; empty when the host ran no external
    /// command for this task.
    #[serde(default)]
    pub argv: Vec<String>,
    /// Working directory of the command; defaults to the build directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl BuildLog {
    /// Loads and parses a build log.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Err(ConfigError::LogNotFound(path.to_path_buf()).into());
        }
        let text = fs::read_to_string(path).map_err(ConfigError::Io)?;
        let log = serde_json::from_str(&text).map_err(ConfigError::InvalidJson)?;
        Ok(log)
    }

    /// The session layout, with bindir/libdir defaulted from the prefix.
    pub fn build_layout(&self) -> BuildLayout {
        let layout = &self.layout;
        BuildLayout {
            root: layout.root.clone(),
            build: layout.build.clone(),
            prefix: layout.prefix.clone(),
            bindir: layout
                .bindir
                .clone()
                .unwrap_or_else(|| layout.prefix.join("bin")),
            libdir: layout
                .libdir
                .clone()
                .unwrap_or_else(|| layout.prefix.join("lib")),
            dest_os: layout.dest_os.clone(),
            dest_cpu: layout.dest_cpu.clone(),
        }
    }

    pub fn project_info(&self) -> ProjectInfo {
        ProjectInfo {
            name: self.project.name.clone(),
            version: self.project.version.clone(),
            variant: self.project.variant.clone(),
        }
    }
}
