//! Path and flag rewriting for captured compile and link commands.
//!
//! Commands are captured relative to the build working directory; the
//! exported artifacts live at the project root. The rewriter relocates the
//! paths embedded in the argv so that a Makefile rule (or an IDE project)
//! run from the project root still finds every file. The rules are fixed:
//! hand-consumed Makefiles depend on them, so they must not drift.

use std::path::Path;

/// Rewrites captured argument vectors into project-root-relative form.
pub struct Rewriter<'a> {
    /// Absolute project root, as a string for prefix matching.
    root: String,
    /// Relative path from the project root to the build directory,
    /// e.g. `build`.
    offset: &'a str,
}

impl<'a> Rewriter<'a> {
    pub fn new(root: &Path, offset: &'a str) -> Self {
        Self {
            root: root.to_string_lossy().into_owned(),
            offset,
        }
    }

    /// Rewrites a compile command.
    ///
    /// Include flags rooted at the project root lose that prefix, arguments
    /// that were relative to the build directory lose their `../` markers,
    /// and object files gain the build-directory offset so the rule can be
    /// run from the project root.
    pub fn compile(&self, argv: &[String]) -> Vec<String> {
        let inc = format!("-I{}", self.root);
        argv.iter()
            .map(|arg| {
                let mut arg = if let Some(rest) = arg.strip_prefix(&inc) {
                    format!("-I{}", rest.trim_start_matches('/'))
                } else {
                    strip_parent_markers(arg).to_owned()
                };
                if arg.ends_with(".o") {
                    arg = format!("{}/{}", self.offset, arg);
                }
                arg
            })
            .collect()
    }

    /// Rewrites a link command.
    ///
    /// Library search paths, import-library flags, and archive/object file
    /// arguments are all relocated with the build-directory offset; the flag
    /// names and the comma structure of `-Wl,--out-implib,<path>` stay
    /// intact, only the embedded path moves.
    pub fn link(&self, argv: &[String]) -> Vec<String> {
        argv.iter()
            .map(|arg| {
                let mut arg = if arg.starts_with("../") {
                    strip_parent_markers(arg).to_owned()
                } else if let Some(rest) = arg.strip_prefix(self.root.as_str()) {
                    rest.trim_start_matches('/').to_owned()
                } else {
                    arg.clone()
                };
                if let Some(rest) = arg.strip_prefix("-L") {
                    arg = format!("-L{}/{}", self.offset, rest);
                } else if arg.starts_with(IMPLIB_FLAG) {
                    // only the path in the third comma field moves
                    let path = arg.split(',').nth(2).unwrap_or_default();
                    arg = format!("{}{}/{}", IMPLIB_FLAG, self.offset, path);
                } else if arg.ends_with(".a") || arg.ends_with(".o") {
                    arg = format!("{}/{}", self.offset, arg);
                }
                arg
            })
            .collect()
    }
}

const IMPLIB_FLAG: &str = "-Wl,--out-implib,";

/// Drops leading `../` markers: the argument was relative to the build
/// directory and is now relative to the project root.
fn strip_parent_markers(mut arg: &str) -> &str {
    while let Some(rest) = arg.strip_prefix("../") {
        arg = rest;
    }
    arg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn rewriter(root: &'static str, offset: &'static str) -> Rewriter<'static> {
        Rewriter::new(Path::new(root), offset)
    }

    #[test]
    fn include_flag_loses_root_prefix() {
        let rw = rewriter("/build/root", "build");
        let out = rw.compile(&argv(&["gcc", "-c", "-I/build/root/inc", "foo.c", "-o", "foo.o"]));
        assert_eq!(out[2], "-Iinc");
    }

    #[test]
    fn compile_strips_parent_markers_and_relocates_objects() {
        let rw = rewriter("/top", "build");
        let out = rw.compile(&argv(&["gcc", "-c", "../src/foo.c", "-o", "src/foo.o"]));
        assert_eq!(out, argv(&["gcc", "-c", "src/foo.c", "-o", "build/src/foo.o"]));
    }

    #[test]
    fn foreign_include_flags_pass_through() {
        let rw = rewriter("/top", "build");
        let out = rw.compile(&argv(&["-I/usr/include", "-O2", "-Wall"]));
        assert_eq!(out, argv(&["-I/usr/include", "-O2", "-Wall"]));
    }

    #[test]
    fn link_relocates_objects_and_archives() {
        let rw = rewriter("/top", "build");
        let out = rw.link(&argv(&["gcc", "foo.o", "libbar.a", "-o", "hello"]));
        assert_eq!(out, argv(&["gcc", "build/foo.o", "build/libbar.a", "-o", "hello"]));
    }

    #[test]
    fn link_strips_absolute_root_prefix() {
        let rw = rewriter("/top", "build");
        let out = rw.link(&argv(&["/top/wscript-owned", "hello"]));
        assert_eq!(out[0], "wscript-owned");
    }

    #[test]
    fn library_search_path_gains_offset() {
        let rw = rewriter("/top", "build");
        let out = rw.link(&argv(&["-Lsub/lib"]));
        assert_eq!(out, argv(&["-Lbuild/sub/lib"]));
    }

    #[test]
    fn implib_flag_relocates_only_the_path() {
        let rw = rewriter("/top", "build");
        let out = rw.link(&argv(&["-Wl,--out-implib,libfoo.dll.a"]));
        assert_eq!(out, argv(&["-Wl,--out-implib,build/libfoo.dll.a"]));
    }

    #[test]
    fn other_linker_flags_pass_through() {
        let rw = rewriter("/top", "build");
        let out = rw.link(&argv(&["-Wl,-rpath,/opt/lib", "-lm", "-shared"]));
        assert_eq!(out, argv(&["-Wl,-rpath,/opt/lib", "-lm", "-shared"]));
    }

    #[test]
    fn repeated_parent_markers_are_all_stripped() {
        assert_eq!(strip_parent_markers("../../src/a.c"), "src/a.c");
        assert_eq!(strip_parent_markers("src/a.c"), "src/a.c");
    }
}
