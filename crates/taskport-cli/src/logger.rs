//! Logging setup for the taskport CLI.
//!
//! Structured logging via the `tracing` ecosystem: `--verbose` raises the
//! taskport crates to debug, `--quiet` drops to errors only, and `RUST_LOG`
//! can override both defaults.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("taskport_core=debug,taskport_export=debug,taskport_cli=debug")
    } else if quiet {
        EnvFilter::new("taskport_core=error,taskport_export=error,taskport_cli=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("taskport_core=info,taskport_export=info,taskport_cli=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Whether colored output should be enabled for this terminal.
///
/// Honors the `NO_COLOR` and `FORCE_COLOR` conventions, then falls back to
/// terminal capability detection.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;

    // tracing subscribers are global and can only be installed once per
    // process, so these only exercise filter construction.

    #[test]
    fn verbose_filter_parses() {
        let _ = EnvFilter::new("taskport_core=debug,taskport_export=debug,taskport_cli=debug");
    }

    #[test]
    fn quiet_filter_parses() {
        let _ = EnvFilter::new("taskport_core=error,taskport_export=error,taskport_cli=error");
    }
}
