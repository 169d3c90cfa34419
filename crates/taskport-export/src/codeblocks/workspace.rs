//! Patch-and-write of the shared `codeblocks.workspace` file.

use super::{load_or_template, templates};
use crate::ExportError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use xmltree::{Element, XMLNode};

/// Writes (or patches) the workspace so it lists every exported project with
/// one `Depends` entry per library dependency.
///
/// Projects already present keep their position; their dependency list is
/// replaced wholesale, so dependencies dropped since the last export do not
/// linger. New projects are appended in export order.
pub(super) fn write_workspace(
    dir: &Path,
    mut projects: IndexMap<String, Vec<String>>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join("codeblocks.workspace");
    let mut root = load_or_template(&path, templates::WORKSPACE)?;
    let workspace = root
        .get_mut_child("Workspace")
        .ok_or_else(|| ExportError::MissingElement {
            path: path.clone(),
            element: "Workspace",
        })?;

    for node in workspace.children.iter_mut() {
        let XMLNode::Element(entry) = node else {
            continue;
        };
        if entry.name != "Project" {
            continue;
        }
        let Some(name) = entry.attributes.get("filename").cloned() else {
            continue;
        };
        if let Some(depends) = projects.shift_remove(&name) {
            entry
                .children
                .retain(|n| !matches!(n, XMLNode::Element(el) if el.name == "Depends"));
            for dep in depends {
                entry.children.push(XMLNode::Element(depends_entry(&dep)));
            }
        }
    }

    for (name, depends) in projects {
        let mut entry = Element::new("Project");
        entry.attributes.insert("filename".to_owned(), name);
        for dep in depends {
            entry.children.push(XMLNode::Element(depends_entry(&dep)));
        }
        workspace.children.push(XMLNode::Element(entry));
    }

    super::save(&path, &root)?;
    Ok(path)
}

fn depends_entry(filename: &str) -> Element {
    let mut el = Element::new("Depends");
    el.attributes
        .insert("filename".to_owned(), filename.to_owned());
    el
}
