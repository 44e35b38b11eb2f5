//! logging — slog helpers shared by the compiler and the series engines.
//!
//! Purpose
//! -------
//! Give every component that does one-off, non-trivial work (building a
//! coefficient table, compiling an expression, falling back from one
//! evaluation backend to another) a structured `slog::Logger` without forcing
//! callers to configure one.
//!
//! Key behaviors
//! -------------
//! - [`discard_logger`] returns a root logger over `slog::Discard`; this is the
//!   default carried by every options struct in the crate.
//! - With the `obs_slog` feature, [`term_logger`] builds an asynchronous
//!   terminal drain (`slog-term` + `slog-async`) for verbose diagnostics.
//!
//! Conventions
//! -----------
//! - Records use `debug!` for per-construction details and `info!` for
//!   events a user would want to see once (e.g. a backend downgrade).
//! - Keys are snake_case (`terms`, `source`, `backend`).
use slog::{o, Discard, Logger};

/// Root logger that drops every record.
pub fn discard_logger() -> Logger {
    Logger::root(Discard, o!())
}

/// Terminal logger for verbose runs.
///
/// Records are formatted by `slog-term` and shipped through an `slog-async`
/// channel so evaluation threads never block on stderr.
#[cfg(feature = "obs_slog")]
pub fn term_logger() -> Logger {
    use slog::Drain;

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("crate" => "complex_graph"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog::debug;

    #[test]
    // Purpose
    // -------
    // The default logger must accept records without any configured sink.
    fn discard_logger_accepts_records() {
        let log = discard_logger();
        debug!(log, "dropped"; "key" => 1);
        let child = log.new(o!("component" => "test"));
        debug!(child, "also dropped");
    }
}
