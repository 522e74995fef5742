use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::{filter_fn, FilterExt, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::server::access_log::ACCESS_LOG_TARGET;
use crate::server::ServerConfig;

/// Destination of a log stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl LogSink {
    /// `-` selects `dash`, anything else is a file path.
    pub fn parse(value: &str, dash: LogSink) -> Self {
        match value.trim() {
            "-" => dash,
            path => LogSink::File(PathBuf::from(path)),
        }
    }

    fn is_terminal(&self) -> bool {
        !matches!(self, LogSink::File(_))
    }

    /// Background writer for the sink. Lines are flushed by a dedicated
    /// thread until the returned guard is dropped.
    fn make_writer(&self) -> Result<(NonBlocking, WorkerGuard)> {
        Ok(match self {
            LogSink::Stdout => tracing_appender::non_blocking(std::io::stdout()),
            LogSink::Stderr => tracing_appender::non_blocking(std::io::stderr()),
            LogSink::File(path) => {
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;
                let dir = match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                    _ => PathBuf::from("."),
                };
                fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create {}", dir.display()))?;
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::NEVER)
                    .filename_prefix(file_name)
                    .build(&dir)
                    .with_context(|| format!("failed to open log file {}", path.display()))?;
                tracing_appender::non_blocking(appender)
            }
        })
    }
}

/// Keeps the background log writers alive; pending lines are flushed when
/// this is dropped.
#[must_use]
pub struct LogGuards {
    _access: WorkerGuard,
    _error: WorkerGuard,
}

/// Translates process-manager level names into filter directives.
pub fn level_directive(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    }
}

fn is_access(metadata: &tracing::Metadata<'_>) -> bool {
    metadata.target() == ACCESS_LOG_TARGET
}

/// Access lines go to the access sink at info regardless of the level;
/// every other event goes to the error sink, filtered by `rust_log` when set
/// and by the configured level otherwise.
pub fn build_subscriber(
    config: &ServerConfig,
    rust_log: Option<&str>,
) -> Result<(impl Subscriber + Send + Sync + 'static, LogGuards)> {
    let level = level_directive(&config.log_level);
    let error_filter = match rust_log.map(EnvFilter::try_new) {
        Some(Ok(filter)) => filter,
        _ => EnvFilter::try_new(&level)
            .with_context(|| format!("LOG_LEVEL `{}` is not a valid filter", config.log_level))?,
    };

    let (access_writer, access_guard) = config.access_log.make_writer()?;
    let (error_writer, error_guard) = config.error_log.make_writer()?;

    let access_layer = fmt::layer()
        .with_writer(access_writer)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .without_time()
        .with_filter(filter_fn(is_access).and(LevelFilter::INFO));

    let error_layer = fmt::layer()
        .with_writer(error_writer)
        .with_ansi(config.error_log.is_terminal())
        .with_target(false)
        .compact()
        .with_filter(error_filter.and(filter_fn(|metadata| !is_access(metadata))));

    let subscriber = tracing_subscriber::registry()
        .with(access_layer)
        .with(error_layer);
    let guards = LogGuards {
        _access: access_guard,
        _error: error_guard,
    };
    Ok((subscriber, guards))
}

/// Installs the server subscriber globally. `RUST_LOG` overrides the
/// configured level for the error sink.
pub fn init(config: &ServerConfig) -> Result<LogGuards> {
    let rust_log = env::var("RUST_LOG").ok();
    let (subscriber, guards) = build_subscriber(config, rust_log.as_deref())?;
    subscriber
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guards)
}
