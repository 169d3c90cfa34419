//! Command interception: the observer seam between the host's command
//! execution primitive and the export session.

use crate::session::ExportSession;
use crate::task::TaskId;
use std::path::Path;

/// The host-side primitive that actually runs an external command.
///
/// Implemented by whatever the host build framework uses to spawn compiler
/// and linker processes. Closures with the matching signature implement it
/// automatically.
pub trait CommandRunner {
    type Output;
    type Error;

    fn run(&mut self, argv: &[String], cwd: &Path) -> Result<Self::Output, Self::Error>;
}

impl<F, T, E> CommandRunner for F
where
    F: FnMut(&[String], &Path) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn run(&mut self, argv: &[String], cwd: &Path) -> Result<T, E> {
        self(argv, cwd)
    }
}

/// Wraps a [`CommandRunner`] so every invocation is recorded on the session.
///
/// The wrapped runner is delegated to unchanged and its result, success or
/// failure, is returned as-is; the capture happens either way, so failed
/// builds can still be reported on downstream. Capture problems are logged,
/// never allowed to alter the command's outcome.
pub struct CommandInterceptor<R> {
    runner: R,
}

impl<R: CommandRunner> CommandInterceptor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn into_inner(self) -> R {
        self.runner
    }

    /// Runs `argv` in `cwd` for `task`, recording the attempt on `session`.
    pub fn run(
        &mut self,
        session: &mut ExportSession,
        task: TaskId,
        argv: &[String],
        cwd: &Path,
    ) -> Result<R::Output, R::Error> {
        let result = self.runner.run(argv, cwd);
        if let Err(err) = session.record_command(task, argv.to_vec(), cwd.to_path_buf()) {
            tracing::warn!(%task, error = %err, "command capture skipped");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BuildLayout;
    use std::path::PathBuf;

    fn session() -> ExportSession {
        ExportSession::new(BuildLayout {
            root: PathBuf::from("/top"),
            build: PathBuf::from("/top/build"),
            prefix: PathBuf::from("/usr/local"),
            bindir: PathBuf::from("/usr/local/bin"),
            libdir: PathBuf::from("/usr/local/lib"),
            dest_os: "linux".to_owned(),
            dest_cpu: "x86_64".to_owned(),
        })
        .unwrap()
    }

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_and_preserves_success() {
        let mut session = session();
        let mut interceptor =
            CommandInterceptor::new(|_: &[String], _: &Path| Ok::<_, std::io::Error>(0));

        let args = argv(&["gcc", "-c", "main.c"]);
        let status = interceptor
            .run(&mut session, TaskId(7), &args, Path::new("/top/build"))
            .unwrap();
        assert_eq!(status, 0);

        let captured = session.captured(TaskId(7)).expect("command captured");
        assert_eq!(captured.argv, args);
        assert_eq!(captured.cwd, PathBuf::from("/top/build"));
    }

    #[test]
    fn records_even_when_the_command_fails() {
        let mut session = session();
        let mut interceptor = CommandInterceptor::new(|_: &[String], _: &Path| {
            Err::<i32, _>(std::io::Error::other("compiler exploded"))
        });

        let args = argv(&["gcc", "-c", "broken.c"]);
        let err = interceptor
            .run(&mut session, TaskId(3), &args, Path::new("/top/build"))
            .unwrap_err();
        assert_eq!(err.to_string(), "compiler exploded");

        // the attempt is still visible to downstream reporting
        assert_eq!(session.captured(TaskId(3)).unwrap().argv, args);
    }

    #[test]
    fn double_capture_does_not_alter_the_command_result() {
        let mut session = session();
        let mut calls = 0u32;
        let mut interceptor = CommandInterceptor::new(|_: &[String], _: &Path| {
            calls += 1;
            Ok::<_, std::io::Error>(calls)
        });

        let args = argv(&["gcc"]);
        let first = interceptor
            .run(&mut session, TaskId(1), &args, Path::new("/top/build"))
            .unwrap();
        let second = interceptor
            .run(&mut session, TaskId(1), &args, Path::new("/top/build"))
            .unwrap();
        assert_eq!((first, second), (1, 2));

        // first capture wins, later ones are dropped with a warning
        assert_eq!(session.captured(TaskId(1)).unwrap().argv, args);
    }
}
