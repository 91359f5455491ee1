//! Process logging set-up
//!
//! Call [`init_logging`] once from the entry point. Managed hosts collect
//! console output themselves, so only the console layer is installed there;
//! elsewhere daily files `{plaything}.YYYY-MM-DD.log` under the log directory
//! are added. Both layers write `timestamp [LEVEL] message` lines.

use crate::host::HostEnvironment;
use std::path::{Path, PathBuf};
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";
const MAX_LOG_FILES: usize = 5;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// `timestamp [LEVEL] message`, local time to the millisecond
#[derive(Debug, Clone, Copy, Default)]
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} [{}] ",
            chrono::Local::now().format(TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Logging set-up failures
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Log directory could not be created
    #[error("cannot create log directory {}: {source}", path.display())]
    LogDir {
        /// Directory that was requested
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Rolling file appender could not be built
    #[error("cannot open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// A global subscriber is already installed
    #[error("logging already initialised: {0}")]
    AlreadyInitialised(#[from] tracing_subscriber::util::TryInitError),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn file_appender(log_dir: &Path, plaything_name: &str) -> Result<RollingFileAppender, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::LogDir {
        path: log_dir.to_path_buf(),
        source,
    })?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(plaything_name)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)?;
    Ok(appender)
}

/// Install the global subscriber for `plaything_name`
///
/// Returns the file writer's guard, which must be kept alive for buffered
/// lines to be flushed; `None` under managed hosting.
///
/// # Errors
/// Returns error if the log file cannot be opened or a subscriber is
/// already installed.
pub fn init_logging(
    env: &HostEnvironment,
    plaything_name: &str,
    log_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>, LoggingError> {
    let console = fmt::layer().event_format(LineFormat).with_writer(std::io::stdout);

    if env.is_managed_hosting() {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(console)
            .try_init()?;
        return Ok(None);
    }

    let log_dir = log_dir.map_or_else(|| env.default_log_dir(), Path::to_path_buf);
    let (writer, guard) = tracing_appender::non_blocking(file_appender(&log_dir, plaything_name)?);
    let file = fmt::layer()
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console)
        .with(file)
        .try_init()?;

    tracing::info!(
        "Logging to {}",
        log_dir.join(format!("{plaything_name}.YYYY-MM-DD.log")).display()
    );
    Ok(Some(guard))
}
