//! taskport binary entry point.

use clap::Parser;
use taskport_cli::cli::{Cli, Command};
use taskport_cli::{commands, error, logger};

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    let no_color = args.no_color || !logger::should_use_colors();
    logger::init_logger(args.verbose, args.quiet, no_color);
    if no_color {
        console::set_colors_enabled(false);
    }

    let result = match args.command {
        Command::Export(export_args) => commands::export_execute(export_args),
        Command::Check(check_args) => commands::check_execute(check_args),
    };
    result.map_err(error::to_report)
}
