//! The export session: one explicit object owning all state for one export
//! invocation.

use crate::error::{SessionError, TransformError};
use crate::model::{Component, ComponentKind, ExportModel, MakeRule, compiler_id};
use crate::rewrite::Rewriter;
use crate::task::{CapturedCommand, TaskId, TaskKind, TaskRecord};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

/// The directory and target facts the host build framework supplies.
///
/// All directories are absolute; the build directory must live under the
/// project root.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    /// Project root: the directory exported artifacts are written to and
    /// resolved against.
    pub root: PathBuf,
    /// Directory the host compiles into, e.g. `<root>/build`.
    pub build: PathBuf,
    /// Install prefix, substituted as `$(PREFIX)` in the Makefile body.
    pub prefix: PathBuf,
    pub bindir: PathBuf,
    pub libdir: PathBuf,
    /// Target operating system, e.g. `linux`.
    pub dest_os: String,
    /// Target CPU, e.g. `x86_64`.
    pub dest_cpu: String,
}

impl BuildLayout {
    /// Relative path from the project root to the build directory.
    pub fn build_offset(&self) -> Result<String, SessionError> {
        let err = || SessionError::BuildDirOutsideRoot {
            root: self.root.clone(),
            build: self.build.clone(),
        };
        let rel = self.build.strip_prefix(&self.root).map_err(|_| err())?;
        if rel.as_os_str().is_empty() {
            return Err(err());
        }
        Ok(rel.to_string_lossy().into_owned())
    }
}

/// Accumulates captured commands and completed tasks into an [`ExportModel`].
///
/// The session is the only mutable state in the pipeline. The host calls
/// [`record_command`](Self::record_command) right after a task's command
/// runs (or lets a [`crate::CommandInterceptor`] do it), then
/// [`task_completed`](Self::task_completed) once per finished task, and
/// finally [`finish`](Self::finish) to take the model.
///
/// Task-completion callbacks are expected not to run concurrently; that is
/// a precondition inherited from the host scheduler, not enforced here.
pub struct ExportSession {
    layout: BuildLayout,
    offset: String,
    commands: HashMap<TaskId, CapturedCommand>,
    model: ExportModel,
    failure: Option<SessionError>,
}

impl ExportSession {
    pub fn new(layout: BuildLayout) -> Result<Self, SessionError> {
        let offset = layout.build_offset()?;
        Ok(Self {
            layout,
            offset,
            commands: HashMap::new(),
            model: ExportModel::default(),
            failure: None,
        })
    }

    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    /// Records the literal command a task executed. Write-once per task.
    pub fn record_command(
        &mut self,
        task: TaskId,
        argv: Vec<String>,
        cwd: PathBuf,
    ) -> Result<(), SessionError> {
        match self.commands.entry(task) {
            Entry::Occupied(_) => Err(SessionError::CommandAlreadyRecorded { task }),
            Entry::Vacant(slot) => {
                slot.insert(CapturedCommand { argv, cwd });
                Ok(())
            }
        }
    }

    /// The command captured for `task`, if any.
    pub fn captured(&self, task: TaskId) -> Option<&CapturedCommand> {
        self.commands.get(&task)
    }

    /// Folds one finished task into the model.
    ///
    /// Non-C/C++ tasks are skipped. A transform failure does not interrupt
    /// the replay; the first one is held and returned from [`finish`](Self::finish).
    pub fn task_completed(&mut self, record: &TaskRecord) {
        let Some(kind) = TaskKind::classify(&record.kind) else {
            tracing::debug!(task = %record.id, kind = %record.kind, "skipping non-exportable task");
            return;
        };
        let raw = self.commands.get(&record.id).map(|c| c.argv.clone());
        if let Err(source) = self.transform(record, kind, raw.as_deref()) {
            let err = SessionError::Transform {
                task: record.id,
                command: raw.map(|a| a.join(" ")).unwrap_or_default(),
                source,
            };
            tracing::warn!(task = %record.id, error = %err, "deferring export failure");
            if self.failure.is_none() {
                self.failure = Some(err);
            }
        }
    }

    /// Ends the session, yielding the accumulated model or the first
    /// deferred per-task failure.
    pub fn finish(self) -> Result<ExportModel, SessionError> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.model),
        }
    }

    fn transform(
        &mut self,
        record: &TaskRecord,
        kind: TaskKind,
        raw: Option<&[String]>,
    ) -> Result<(), TransformError> {
        if record.outputs.is_empty() {
            return Err(TransformError::NoOutputs);
        }
        let mut targets = Vec::with_capacity(record.outputs.len());
        for output in &record.outputs {
            targets.push(
                self.build_relative(output)
                    .ok_or_else(|| TransformError::ForeignOutput(output.clone()))?,
            );
        }
        self.model.targets.extend(targets.iter().cloned());

        let argv = raw.ok_or(TransformError::MissingCommand)?;
        let rewriter = Rewriter::new(&self.layout.root, &self.offset);
        let rewritten = match kind {
            TaskKind::CompileObject => rewriter.compile(argv),
            _ => rewriter.link(argv),
        };
        let command = rewritten.join(" \\\n\t");

        match kind {
            TaskKind::CompileObject => {
                self.model.rules.push(MakeRule::Compile {
                    target: targets[0].clone(),
                    command,
                });
            }
            _ => {
                // dependency lines: secondary outputs, inputs, dependency
                // files; dll import libraries are dropped, gcc links without
                // them
                let mut lst = targets.clone();
                for dep in record.inputs.iter().chain(record.deps.iter()) {
                    lst.push(self.dep_path(dep));
                }
                lst.retain(|l| !l.ends_with(".dll.a"));
                if lst.is_empty() {
                    return Err(TransformError::NoOutputs);
                }
                let name = basename(&lst.remove(0));
                self.model.rules.push(MakeRule::Link {
                    name,
                    deps: lst,
                    command,
                });
            }
        }

        let key = record.outputs[0].clone();
        let component = Component {
            name: basename(&key.to_string_lossy()),
            kind: ComponentKind::from_task(kind),
            inputs: record.inputs.clone(),
            outputs: record.outputs.clone(),
            depends: record.deps.clone(),
            argv: argv.to_vec(),
            rewritten_argv: rewritten,
            compiler: compiler_id(argv, &self.layout.dest_cpu),
        };
        self.model.components.insert(key, component);
        Ok(())
    }

    /// Build-relative artifact path with the build-directory offset,
    /// e.g. `build/src/foo.o`. `None` when the path is not under the build
    /// directory.
    fn build_relative(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.layout.build).ok()?;
        Some(format!("{}/{}", self.offset, rel.to_string_lossy()))
    }

    /// Like [`build_relative`](Self::build_relative), but dependency files
    /// may also live in the source tree (headers) or outside the project
    /// (system libraries); those keep root-relative or absolute form.
    fn dep_path(&self, path: &Path) -> String {
        if let Some(rel) = self.build_relative(path) {
            rel
        } else if let Ok(rel) = path.strip_prefix(&self.layout.root) {
            rel.to_string_lossy().into_owned()
        } else {
            path.to_string_lossy().into_owned()
        }
    }
}

fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BuildLayout {
        BuildLayout {
            root: PathBuf::from("/top"),
            build: PathBuf::from("/top/build"),
            prefix: PathBuf::from("/usr/local"),
            bindir: PathBuf::from("/usr/local/bin"),
            libdir: PathBuf::from("/usr/local/lib"),
            dest_os: "linux".to_owned(),
            dest_cpu: "x86_64".to_owned(),
        }
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn compile_record(id: u64) -> TaskRecord {
        TaskRecord {
            id: TaskId(id),
            kind: "c".to_owned(),
            inputs: vec![PathBuf::from("/top/src/main.c")],
            outputs: vec![PathBuf::from("/top/build/src/main.o")],
            deps: vec![],
        }
    }

    #[test]
    fn rejects_build_dir_outside_root() {
        let mut bad = layout();
        bad.build = PathBuf::from("/elsewhere/build");
        assert!(matches!(
            ExportSession::new(bad),
            Err(SessionError::BuildDirOutsideRoot { .. })
        ));
    }

    #[test]
    fn commands_are_write_once() {
        let mut session = ExportSession::new(layout()).unwrap();
        session
            .record_command(TaskId(1), argv(&["gcc"]), PathBuf::from("/top/build"))
            .unwrap();
        let err = session
            .record_command(TaskId(1), argv(&["cc"]), PathBuf::from("/top/build"))
            .unwrap_err();
        assert!(matches!(err, SessionError::CommandAlreadyRecorded { .. }));
        // the first capture survives
        assert_eq!(session.captured(TaskId(1)).unwrap().argv, argv(&["gcc"]));
    }

    #[test]
    fn unknown_task_kinds_are_ignored() {
        let mut session = ExportSession::new(layout()).unwrap();
        session.task_completed(&TaskRecord {
            id: TaskId(1),
            kind: "javac".to_owned(),
            inputs: vec![],
            outputs: vec![PathBuf::from("/top/build/Foo.class")],
            deps: vec![],
        });
        let model = session.finish().unwrap();
        assert!(model.is_empty());
    }

    #[test]
    fn compile_and_link_accumulate_in_completion_order() {
        let mut session = ExportSession::new(layout()).unwrap();

        session
            .record_command(
                TaskId(0),
                argv(&["gcc", "-c", "-I/top/inc", "../src/main.c", "-o", "src/main.o"]),
                PathBuf::from("/top/build"),
            )
            .unwrap();
        session.task_completed(&compile_record(0));

        session
            .record_command(
                TaskId(1),
                argv(&["gcc", "src/main.o", "-o", "hello", "-lm"]),
                PathBuf::from("/top/build"),
            )
            .unwrap();
        session.task_completed(&TaskRecord {
            id: TaskId(1),
            kind: "cprogram".to_owned(),
            inputs: vec![PathBuf::from("/top/build/src/main.o")],
            outputs: vec![PathBuf::from("/top/build/hello")],
            deps: vec![],
        });

        let model = session.finish().unwrap();
        assert_eq!(model.targets, vec!["build/src/main.o", "build/hello"]);
        assert_eq!(model.components.len(), 2);

        match &model.rules[0] {
            MakeRule::Compile { target, command } => {
                assert_eq!(target, "build/src/main.o");
                assert!(command.contains("-Iinc"));
                assert!(command.contains("build/src/main.o"));
            }
            other => panic!("expected compile rule, got {other:?}"),
        }
        match &model.rules[1] {
            MakeRule::Link { name, deps, command } => {
                assert_eq!(name, "hello");
                assert_eq!(deps, &vec!["build/src/main.o".to_owned()]);
                assert!(command.contains("build/src/main.o"));
            }
            other => panic!("expected link rule, got {other:?}"),
        }

        let link = model
            .component(Path::new("/top/build/hello"))
            .expect("link component");
        assert_eq!(link.name, "hello");
        assert_eq!(link.kind, ComponentKind::Program);
        assert_eq!(link.compiler, "gcc");
    }

    #[test]
    fn missing_command_defers_until_finish() {
        let mut session = ExportSession::new(layout()).unwrap();
        session.task_completed(&compile_record(0));
        let err = session.finish().unwrap_err();
        match err {
            SessionError::Transform { task, source, .. } => {
                assert_eq!(task, TaskId(0));
                assert!(matches!(source, TransformError::MissingCommand));
            }
            other => panic!("expected transform error, got {other:?}"),
        }
    }

    #[test]
    fn first_deferred_failure_wins() {
        let mut session = ExportSession::new(layout()).unwrap();
        session.task_completed(&compile_record(0));
        session.task_completed(&compile_record(1));
        let err = session.finish().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transform { task: TaskId(0), .. }
        ));
    }

    #[test]
    fn import_libraries_are_dropped_from_link_dependencies() {
        let mut session = ExportSession::new(layout()).unwrap();
        session
            .record_command(
                TaskId(0),
                argv(&["gcc", "-shared", "foo.o", "-o", "libfoo.dll"]),
                PathBuf::from("/top/build"),
            )
            .unwrap();
        session.task_completed(&TaskRecord {
            id: TaskId(0),
            kind: "cshlib".to_owned(),
            inputs: vec![PathBuf::from("/top/build/foo.o")],
            outputs: vec![
                PathBuf::from("/top/build/libfoo.dll"),
                PathBuf::from("/top/build/libfoo.dll.a"),
            ],
            deps: vec![],
        });
        let model = session.finish().unwrap();

        // the import library stays in the flat target list (clean covers it)
        assert!(model.targets.contains(&"build/libfoo.dll.a".to_owned()));
        match &model.rules[0] {
            MakeRule::Link { name, deps, .. } => {
                assert_eq!(name, "libfoo.dll");
                assert_eq!(deps, &vec!["build/foo.o".to_owned()]);
            }
            other => panic!("expected link rule, got {other:?}"),
        }
    }

    #[test]
    fn header_deps_resolve_against_the_source_tree() {
        let mut session = ExportSession::new(layout()).unwrap();
        session
            .record_command(
                TaskId(0),
                argv(&["gcc", "src/main.o", "-o", "hello"]),
                PathBuf::from("/top/build"),
            )
            .unwrap();
        session.task_completed(&TaskRecord {
            id: TaskId(0),
            kind: "cprogram".to_owned(),
            inputs: vec![PathBuf::from("/top/build/src/main.o")],
            outputs: vec![PathBuf::from("/top/build/hello")],
            deps: vec![
                PathBuf::from("/top/inc/app.h"),
                PathBuf::from("/usr/lib/libm.a"),
            ],
        });
        let model = session.finish().unwrap();
        match &model.rules[0] {
            MakeRule::Link { deps, .. } => {
                assert_eq!(
                    deps,
                    &vec![
                        "build/src/main.o".to_owned(),
                        "inc/app.h".to_owned(),
                        "/usr/lib/libm.a".to_owned(),
                    ]
                );
            }
            other => panic!("expected link rule, got {other:?}"),
        }
    }
}
