//! The Code::Blocks emitter.
//!
//! One `.cbp` project is written per link target, plus a single
//! `codeblocks.workspace` tying them together, all under a `codeblocks`
//! directory in the export root. Files already on disk are parsed, patched,
//! and re-serialized: unrelated build targets, sources, and workspace
//! entries survive a re-export, and re-exporting for the same OS/CPU pair
//! is idempotent.

mod project;
mod templates;
mod workspace;

use crate::ExportError;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use taskport_core::{BuildLayout, ExportModel};
use xmltree::{Element, EmitterConfig, XMLNode};

/// Writes every project file and the workspace, returning the written paths
/// (projects in completion order, workspace last).
pub fn export(
    out_root: &Path,
    layout: &BuildLayout,
    model: &ExportModel,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = out_root.join("codeblocks");
    fs::create_dir_all(&dir)?;

    let mut projects: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut written = Vec::new();
    for component in model.link_components() {
        let (path, depends) = project::write_project(&dir, layout, model, component)?;
        tracing::info!(path = %path.display(), dependencies = ?depends, "exported project");
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        projects.insert(file_name, depends);
        written.push(path);
    }

    let ws = workspace::write_workspace(&dir, projects)?;
    tracing::info!(path = %ws.display(), "exported workspace");
    written.push(ws);
    Ok(written)
}

/// Fixed first line of every emitted document.
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes" ?>"#;

/// Parses an existing document from disk, or instantiates the template for
/// a fresh one. Whitespace-only text nodes are dropped either way so the
/// pretty-printer starts from a clean tree.
fn load_or_template(path: &Path, template: &str) -> Result<Element, ExportError> {
    let mut root = if path.exists() {
        Element::parse(fs::File::open(path)?)?
    } else {
        Element::parse(template.as_bytes())?
    };
    strip_whitespace(&mut root);
    Ok(root)
}

/// Parses one of the embedded template fragments.
fn parse_template(template: &str) -> Result<Element, ExportError> {
    let mut el = Element::parse(template.as_bytes())?;
    strip_whitespace(&mut el);
    Ok(el)
}

fn strip_whitespace(el: &mut Element) {
    el.children.retain(|node| match node {
        XMLNode::Text(text) => !text.trim().is_empty(),
        _ => true,
    });
    for node in el.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            strip_whitespace(child);
        }
    }
}

/// Runs `f` over every descendant element named `name`.
fn visit<F: FnMut(&Element)>(el: &Element, name: &str, f: &mut F) {
    for node in &el.children {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                f(child);
            }
            visit(child, name, f);
        }
    }
}

/// Mutable counterpart of [`visit`].
fn visit_mut<F: FnMut(&mut Element)>(el: &mut Element, name: &str, f: &mut F) {
    for node in el.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                f(child);
            }
            visit_mut(child, name, f);
        }
    }
}

/// Pretty-prints `root` with tab indentation, drops blank lines, and writes
/// it under the fixed XML declaration.
fn save(path: &Path, root: &Element) -> Result<(), ExportError> {
    let mut buf = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("\t")
        .write_document_declaration(false);
    root.write_with_config(&mut buf, config)?;
    let body = String::from_utf8_lossy(&buf);
    let lines: Vec<&str> = body.lines().filter(|l| !l.trim().is_empty()).collect();
    fs::write(path, format!("{XML_DECLARATION}\n{}", lines.join("\n")))?;
    Ok(())
}
