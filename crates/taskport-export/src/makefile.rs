//! The Makefile emitter.
//!
//! Produces one self-contained Makefile from the export model: an `all`
//! section, unconditional `clean`, `install`/`uninstall` against the
//! configured prefix, and one rule block per compile/link task in task
//! completion order. The file is always fully regenerated; for the same
//! model the output is byte-identical, so the header carries no timestamp.

use crate::{ExportError, ProjectInfo};
use std::fs;
use std::path::{Path, PathBuf};
use taskport_core::{BuildLayout, ExportModel, MakeRule};

/// File name the Makefile is written under: `Makefile`, or
/// `<name>-<variant>.mk` for a variant build.
pub fn makefile_name(project: &ProjectInfo) -> String {
    match &project.variant {
        Some(variant) => format!("{}-{}.mk", project.name, variant),
        None => "Makefile".to_owned(),
    }
}

/// Renders the complete Makefile text.
pub fn render(project: &ProjectInfo, layout: &BuildLayout, model: &ExportModel) -> String {
    let bindir = layout.bindir.to_string_lossy();
    let libdir = layout.libdir.to_string_lossy();
    let mut lines: Vec<String> = Vec::new();

    // 'all': no import libraries; objects keep their build-relative path,
    // final binaries reduce to their base name
    let all: Vec<String> = model
        .targets
        .iter()
        .filter(|t| !t.ends_with(".dll.a"))
        .map(|t| {
            if t.ends_with(".o") {
                t.clone()
            } else {
                basename(t)
            }
        })
        .collect();
    lines.push("all: \\".to_owned());
    lines.push(format!("\t{}", all.join(" \\\n\t")));

    lines.push(String::new());
    lines.push("clean:".to_owned());
    for target in &model.targets {
        lines.push(format!("\trm -rf  {target}"));
    }

    lines.push(String::new());
    lines.push("install:".to_owned());
    lines.push(format!("\tmkdir -p {bindir}"));
    lines.push(format!("\tmkdir -p {libdir}"));
    for target in model.targets.iter().filter(|t| is_binary(t)) {
        lines.push(format!("\tcp {target}  {bindir}/{}", basename(target)));
    }
    for target in model.targets.iter().filter(|t| t.ends_with(".so")) {
        lines.push(format!("\tcp {target}  {libdir}/{}", basename(target)));
    }

    lines.push(String::new());
    lines.push("uninstall:".to_owned());
    for target in model.targets.iter().filter(|t| is_binary(t)) {
        lines.push(format!("\trm -rf  {bindir}/{}", basename(target)));
    }
    for target in model.targets.iter().filter(|t| t.ends_with(".so")) {
        lines.push(format!("\trm -rf  {libdir}/{}", basename(target)));
    }

    for rule in &model.rules {
        lines.push(String::new());
        match rule {
            MakeRule::Compile { target, command } => {
                lines.push(format!("{target}:"));
                lines.push(format!("\tmkdir -p {}", dirname(target)));
                lines.push(format!("\t{command}"));
            }
            MakeRule::Link {
                name,
                deps,
                command,
            } => {
                lines.push(format!("{name}: \\"));
                lines.push(format!("\t{}", deps.join(" \\\n\t")));
                lines.push(format!("\t{command}"));
            }
        }
    }
    lines.push("\t\n".to_owned());

    let prefix = layout.prefix.to_string_lossy();
    let header = format!(
        "# This makefile has been generated by taskport.\n\
         #\n\
         # project : {}\n\
         # version : {}\n\
         #\n\
         SHELL=/bin/sh\n\
         PREFIX={prefix}\n\n",
        project.name, project.version,
    );
    // the header shows the literal prefix; everywhere else it becomes a
    // make variable so `make install PREFIX=...` works
    let content = lines.join("\n").replace(prefix.as_ref(), "$(PREFIX)");
    header + &content
}

/// Renders and writes the Makefile under `out_root`, returning its path.
pub fn export(
    out_root: &Path,
    project: &ProjectInfo,
    layout: &BuildLayout,
    model: &ExportModel,
) -> Result<PathBuf, ExportError> {
    let path = out_root.join(makefile_name(project));
    fs::write(&path, render(project, layout, model))?;
    tracing::info!(path = %path.display(), "exported makefile");
    Ok(path)
}

/// Install candidates: everything that is not an archive, object, or
/// shared library.
fn is_binary(target: &str) -> bool {
    !(target.ends_with(".a") || target.ends_with(".o") || target.ends_with(".so"))
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}

fn dirname(path: &str) -> String {
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_owned())
}
