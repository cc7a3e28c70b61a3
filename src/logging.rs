//! Log output in the format NZBGet reads from extensions
//!
//! NZBGet scans an extension's stdout line by line and assigns a log level from
//! a bracketed prefix: `[ERROR]`, `[WARNING]`, `[INFO]`, `[DETAIL]` or `[DEBUG]`.
//! [`HostLogFormat`] renders `tracing` events that way.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "debug";

/// NZBGet message prefix for a tracing level
pub fn host_prefix(level: Level) -> &'static str {
    match level {
        Level::ERROR => "[ERROR]",
        Level::WARN => "[WARNING]",
        Level::INFO => "[INFO]",
        Level::DEBUG => "[DETAIL]",
        Level::TRACE => "[DEBUG]",
    }
}

/// Event formatter producing one `[LEVEL] message key=value` line per event
#[derive(Clone, Copy, Debug, Default)]
pub struct HostLogFormat;

impl<S, N> FormatEvent<S, N> for HostLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{} ", host_prefix(*event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the stdout subscriber used by the binary
///
/// `RUST_LOG` overrides the default level. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // with_ansi only exists on the default formatter, so it goes first; it also
    // keeps DefaultFields from styling field names
    let _ = tracing_subscriber::fmt()
        .with_ansi(false)
        .event_format(HostLogFormat)
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .try_init();
}
