//! The `taskport export` command: replay a build log through an export
//! session and write the selected artifacts.

use crate::cli::ExportArgs;
use crate::config::{self, ExportFormat};
use crate::error::Result;
use crate::manifest::BuildLog;
use std::fs;
use taskport_core::{ExportSession, TaskId, TaskRecord};
use taskport_export::{codeblocks, makefile};

pub fn execute(args: ExportArgs) -> Result<()> {
    // format selection is validated before the log is read, so an
    // unsupported format never leaves artifacts behind
    let formats = config::parse_formats(&args.formats)?;

    let log = BuildLog::load(&args.log)?;
    let layout = log.build_layout();
    let project = log.project_info();
    let out_root = args.out_dir.unwrap_or_else(|| layout.root.clone());

    let mut session = ExportSession::new(layout.clone())?;
    for (index, task) in log.tasks.iter().enumerate() {
        let id = TaskId(index as u64);
        if !task.argv.is_empty() {
            let cwd = task.cwd.clone().unwrap_or_else(|| layout.build.clone());
            session.record_command(id, task.argv.clone(), cwd)?;
        }
        session.task_completed(&TaskRecord {
            id,
            kind: task.kind.clone(),
            inputs: task.inputs.clone(),
            outputs: task.outputs.clone(),
            deps: task.deps.clone(),
        });
    }
    let model = session.finish()?;

    if model.is_empty() {
        tracing::warn!("export skipped: no suitable C/C++ targets found");
        return Ok(());
    }

    fs::create_dir_all(&out_root)?;
    if formats.contains(&ExportFormat::Makefile) {
        makefile::export(&out_root, &project, &layout, &model)?;
    }
    if formats.contains(&ExportFormat::Codeblocks) {
        codeblocks::export(&out_root, &layout, &model)?;
    }
    Ok(())
}
