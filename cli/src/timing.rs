//! Tracing setup for the CLI.
//!
//! Library crates log through the `log` facade; the subscriber installed here
//! picks those records up as well. With `--timing`, every `#[instrument]`ed
//! command logs its duration when its span closes.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Initialize the tracing subscriber.
///
/// `verbose` lowers the default level to DEBUG; `timing` raises it to at least
/// INFO so span close events are visible.
pub fn init_tracing(verbose: bool, timing: bool) {
    let level = default_level(verbose, timing);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}
