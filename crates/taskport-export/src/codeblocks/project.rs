//! Patch-and-write of one Code::Blocks `.cbp` project file.

use super::{load_or_template, parse_template, templates, visit, visit_mut};
use crate::ExportError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use taskport_core::{BuildLayout, Component, ExportModel};
use xmltree::{Element, XMLNode};

/// Per-target option sets, folded from every contributing compile component
/// and the link command itself. Stored sorted so output is stable.
struct TargetSettings {
    cflags: Vec<String>,
    includes: Vec<String>,
    lflags: Vec<String>,
    libs: Vec<String>,
    libpaths: Vec<String>,
}

impl TargetSettings {
    fn collect(model: &ExportModel, layout: &BuildLayout, component: &Component) -> Self {
        let mut cflags = BTreeSet::new();
        let mut includes = BTreeSet::new();
        for input in &component.inputs {
            let Some(object) = model.component(input) else {
                continue;
            };
            for arg in &object.argv {
                if let Some(path) = arg.strip_prefix("-I") {
                    includes.insert(path.to_owned());
                } else if arg.starts_with('-') && arg != "-c" && arg != "-o" {
                    cflags.insert(arg.clone());
                }
            }
        }

        let mut lflags = BTreeSet::new();
        let mut libs = BTreeSet::new();
        let mut libpaths = BTreeSet::new();
        for arg in &component.argv {
            if arg.starts_with("-Wl") {
                lflags.insert(arg.clone());
            }
            if let Some(lib) = arg.strip_prefix("-l") {
                libs.insert(lib.to_owned());
            } else if let Some(path) = arg.strip_prefix("-L") {
                libpaths.insert(format!("{}/{}", layout.build.to_string_lossy(), path));
            }
        }

        Self {
            cflags: cflags.into_iter().collect(),
            includes: includes.into_iter().collect(),
            lflags: lflags.into_iter().collect(),
            libs: libs.into_iter().collect(),
            libpaths: libpaths.into_iter().collect(),
        }
    }
}

/// Writes (or patches) the project file for one link component.
///
/// Returns the file path and the component's library dependencies for the
/// workspace.
pub(super) fn write_project(
    dir: &Path,
    layout: &BuildLayout,
    model: &ExportModel,
    component: &Component,
) -> Result<(PathBuf, Vec<String>), ExportError> {
    let settings = TargetSettings::collect(model, layout, component);
    let name = component
        .name
        .split('.')
        .next()
        .unwrap_or(component.name.as_str())
        .to_owned();
    let path = dir.join(format!("{name}.cbp"));

    let mut root = load_or_template(&path, templates::PROJECT)?;
    let project = root
        .get_mut_child("Project")
        .ok_or_else(|| ExportError::MissingElement {
            path: path.clone(),
            element: "Project",
        })?;

    visit_mut(project, "Option", &mut |option| {
        if option.attributes.contains_key("title") {
            option.attributes.insert("title".to_owned(), name.clone());
        }
    });

    let os_cpu = format!("{}-{}", layout.dest_os, layout.dest_cpu);
    let title = if settings.cflags.iter().any(|f| f == "-ggdb") {
        format!("{os_cpu}-debug")
    } else {
        os_cpu.clone()
    };

    let target = build_target(component, &settings, &title)?;
    let build = project
        .get_mut_child("Build")
        .ok_or_else(|| ExportError::MissingElement {
            path: path.clone(),
            element: "Build",
        })?;
    // drop stale targets for this OS/CPU pair so re-export is idempotent
    build.children.retain(|node| match node {
        XMLNode::Element(el) if el.name == "Target" => !el
            .attributes
            .get("title")
            .is_some_and(|t| t.starts_with(&os_cpu)),
        _ => true,
    });
    build.children.push(XMLNode::Element(target));

    append_units(project, layout, model, component)?;

    if project.get_child("Extensions").is_none() {
        let extensions = parse_template(templates::EXTENSIONS)?;
        project.children.push(XMLNode::Element(extensions));
    }

    super::save(&path, &root)?;
    Ok((path, settings.libs))
}

/// Instantiates the target template for this component.
fn build_target(
    component: &Component,
    settings: &TargetSettings,
    title: &str,
) -> Result<Element, ExportError> {
    let output = component.outputs[0].to_string_lossy().into_owned();
    let object_dir = Path::new(&output)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let type_code = component.kind.cbp_type_code().unwrap_or("1");

    let mut target = parse_template(templates::TARGET)?;
    target.attributes.insert("title".to_owned(), title.to_owned());
    visit_mut(&mut target, "Option", &mut |option| {
        if option.attributes.contains_key("output") {
            option.attributes.insert("output".to_owned(), output.clone());
        }
        if option.attributes.contains_key("object_output") {
            option
                .attributes
                .insert("object_output".to_owned(), object_dir.clone());
        }
        if option.attributes.contains_key("type") {
            option
                .attributes
                .insert("type".to_owned(), type_code.to_owned());
        }
        if option.attributes.contains_key("compiler") {
            option
                .attributes
                .insert("compiler".to_owned(), component.compiler.clone());
        }
    });

    {
        let compiler = target
            .get_mut_child("Compiler")
            .ok_or_else(|| ExportError::MissingElement {
                path: PathBuf::from("<target template>"),
                element: "Compiler",
            })?;
        for cflag in &settings.cflags {
            compiler.children.push(XMLNode::Element(add("option", cflag)));
        }
        for include in &settings.includes {
            compiler
                .children
                .push(XMLNode::Element(add("directory", include)));
        }
    }

    if !(settings.lflags.is_empty() && settings.libs.is_empty() && settings.libpaths.is_empty()) {
        let mut linker = Element::new("Linker");
        for lflag in &settings.lflags {
            linker.children.push(XMLNode::Element(add("option", lflag)));
        }
        for lib in &settings.libs {
            linker.children.push(XMLNode::Element(add("library", lib)));
        }
        for libpath in &settings.libpaths {
            linker
                .children
                .push(XMLNode::Element(add("directory", libpath)));
        }
        target.children.push(XMLNode::Element(linker));
    }

    Ok(target)
}

/// Appends a `Unit` per source file that is not already in the project.
fn append_units(
    project: &mut Element,
    layout: &BuildLayout,
    model: &ExportModel,
    component: &Component,
) -> Result<(), ExportError> {
    let mut sources: Vec<String> = component
        .inputs
        .iter()
        .filter_map(|input| model.component(input))
        .flat_map(|object| object.inputs.iter())
        .map(|src| src.to_string_lossy().into_owned())
        .collect();

    let root_dir = layout.root.to_string_lossy().into_owned();
    let mut existing = Vec::new();
    visit(project, "Unit", &mut |unit| {
        if let Some(filename) = unit.attributes.get("filename") {
            let src = filename.replace('\\', "/");
            let src = match src.strip_prefix("../") {
                Some(rest) => format!("{root_dir}/{rest}"),
                None => src,
            };
            existing.push(src);
        }
    });
    sources.retain(|src| !existing.contains(src));

    for src in sources {
        let mut unit = parse_template(templates::UNIT)?;
        unit.attributes.insert("filename".to_owned(), src);
        project.children.push(XMLNode::Element(unit));
    }
    Ok(())
}

fn add(attribute: &str, value: &str) -> Element {
    let mut el = Element::new("Add");
    el.attributes
        .insert(attribute.to_owned(), value.to_owned());
    el
}
