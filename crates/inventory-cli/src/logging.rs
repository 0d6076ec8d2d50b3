use std::env;
use std::fmt;
use std::path::Path;
use tracing::{Dispatch, Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// `<timestamp> - <LEVEL> - <message>`, one event per line.
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
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
        write!(
            writer,
            "{} - {} - ",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Subscriber for one pipeline stage: stdout plus an append-only log file
/// at `log_file_path`. Install it with `tracing::dispatcher::with_default`
/// and keep the guard alive until the stage has finished.
pub fn stage_logger(log_file_path: &str) -> (Dispatch, WorkerGuard) {
    let filter = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let path = Path::new(log_file_path);
    let log_dir = path.parent().unwrap_or(Path::new("."));
    let log_file = path
        .file_name()
        .map(|f| f.to_os_string())
        .unwrap_or_else(|| "inventory.log".into());
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!("Could not create log directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(filter_layer);

    (Dispatch::new(subscriber), guard)
}
