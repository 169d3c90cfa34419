//! Command-line interface definition for taskport.
//!
//! Defined with clap v4 derive macros. Two subcommands:
//!
//! - `taskport export` - replay a build log and write the selected artifacts
//! - `taskport check` - validate a build log without writing anything

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// taskport - export compiled build tasks to Makefile and Code::Blocks projects
#[derive(Parser, Debug)]
#[command(
    name = "taskport",
    version,
    about = "Export compiled build tasks to Makefile and Code::Blocks projects",
    long_about = "taskport converts the C/C++ compile and link commands a build framework\n\
                  already executed - recorded in a JSON build log - into a standalone\n\
                  Makefile and/or Code::Blocks project files that build the same artifacts\n\
                  with the same compiler and linker directives."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available taskport subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export a build log to the selected output formats
    ///
    /// Reads the build log, replays every recorded task through an export
    /// session, and writes the selected artifacts into the project root
    /// (or --out-dir).
    Export(ExportArgs),

    /// Validate a build log without writing anything
    ///
    /// Parses the log, checks the directory layout, and reports how many
    /// tasks are exportable.
    Check(CheckArgs),
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output formats to generate
    ///
    /// Comma-separated list of: makefile, codeblocks, all.
    #[arg(short, long, value_delimiter = ',', value_name = "FORMAT")]
    pub formats: Vec<String>,

    /// Path to the build log written by the host build framework
    #[arg(short, long, default_value = "build-log.json", value_name = "FILE")]
    pub log: PathBuf,

    /// Directory to write artifacts into
    ///
    /// Defaults to the project root recorded in the build log.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the build log written by the host build framework
    #[arg(short, long, default_value = "build-log.json", value_name = "FILE")]
    pub log: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_with_format_list() {
        let cli = Cli::try_parse_from(["taskport", "export", "--formats", "makefile,codeblocks"])
            .unwrap();
        match cli.command {
            Command::Export(args) => {
                assert_eq!(args.formats, vec!["makefile", "codeblocks"]);
                assert_eq!(args.log, PathBuf::from("build-log.json"));
            }
            other => panic!("expected export, got {other:?}"),
        }
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["taskport", "-v", "-q", "export"]).is_err());
    }

    #[test]
    fn check_takes_a_log_path() {
        let cli = Cli::try_parse_from(["taskport", "check", "--log", "out/log.json"]).unwrap();
        match cli.command {
            Command::Check(args) => assert_eq!(args.log, PathBuf::from("out/log.json")),
            other => panic!("expected check, got {other:?}"),
        }
    }
}
