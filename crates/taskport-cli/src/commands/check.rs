//! The `taskport check` command: validate a build log without writing
//! any artifacts.

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::manifest::BuildLog;
use taskport_core::{ExportSession, TaskKind};

pub fn execute(args: CheckArgs) -> Result<()> {
    let log = BuildLog::load(&args.log)?;
    let layout = log.build_layout();

    // validates the layout invariants (build dir under root) the same way
    // an export run would, but the session is dropped unused
    let _ = ExportSession::new(layout)?;

    let total = log.tasks.len();
    let exportable = log
        .tasks
        .iter()
        .filter(|task| TaskKind::classify(&task.kind).is_some())
        .count();
    let silent = log
        .tasks
        .iter()
        .filter(|task| TaskKind::classify(&task.kind).is_some() && task.argv.is_empty())
        .count();

    tracing::info!(
        "{}: {} tasks, {} exportable, {} without a recorded command",
        args.log.display(),
        total,
        exportable,
        silent
    );
    if exportable == 0 {
        tracing::warn!("no exportable C/C++ tasks in this log");
    }
    Ok(())
}
