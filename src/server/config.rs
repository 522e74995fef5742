use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::logging::LogSink;

use super::access_log::DEFAULT_ACCESS_LOG_FORMAT;
use super::limits::RequestLimits;

/// Process-level settings for the application server, read once at start.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backlog: u32,
    pub workers: usize,
    pub worker_connections: usize,
    pub timeout: Duration,
    pub keepalive: Duration,
    pub max_requests: u64,
    pub max_requests_jitter: u64,
    pub graceful_timeout: Duration,
    pub access_log: LogSink,
    pub error_log: LogSink,
    pub log_level: String,
    pub access_log_format: String,
    pub proc_name: String,
    pub pidfile: Option<PathBuf>,
    pub limits: RequestLimits,
    pub statsd_host: String,
    pub statsd_prefix: String,
}

/// Two workers per core plus one.
pub fn default_workers(cpus: usize) -> usize {
    cpus * 2 + 1
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&lookup, "SERVER_PORT", 8000)?;
        let ip: IpAddr = host
            .trim()
            .parse()
            .with_context(|| format!("SERVER_HOST must be an IP address, got `{host}`"))?;
        let bind = SocketAddr::new(ip, port);

        let workers = match lookup("WEB_CONCURRENCY") {
            Some(value) => value
                .parse()
                .context("WEB_CONCURRENCY must be a positive integer")?,
            None => default_workers(num_cpus::get()),
        };

        let access_log = LogSink::parse(
            &lookup("ACCESS_LOG").unwrap_or_else(|| "/app/logs/access.log".to_string()),
            LogSink::Stdout,
        );
        let error_log = LogSink::parse(
            &lookup("ERROR_LOG").unwrap_or_else(|| "/app/logs/error.log".to_string()),
            LogSink::Stderr,
        );
        let pidfile = lookup("PIDFILE")
            .unwrap_or_else(|| "/tmp/horilla.pid".to_string());
        let pidfile = (!pidfile.trim().is_empty()).then(|| PathBuf::from(pidfile));

        Ok(Self {
            bind,
            backlog: parse_or(&lookup, "SERVER_BACKLOG", 2048)?,
            workers: workers.max(1),
            worker_connections: parse_or(&lookup, "WORKER_CONNECTIONS", 1000)?,
            timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            keepalive: Duration::from_secs(parse_or(&lookup, "KEEPALIVE_SECS", 2)?),
            max_requests: parse_or(&lookup, "MAX_REQUESTS", 1000)?,
            max_requests_jitter: parse_or(&lookup, "MAX_REQUESTS_JITTER", 100)?,
            graceful_timeout: Duration::from_secs(parse_or(&lookup, "GRACEFUL_TIMEOUT_SECS", 30)?),
            access_log,
            error_log,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            access_log_format: lookup("ACCESS_LOG_FORMAT")
                .unwrap_or_else(|| DEFAULT_ACCESS_LOG_FORMAT.to_string()),
            proc_name: lookup("PROC_NAME").unwrap_or_else(|| "horilla".to_string()),
            pidfile,
            limits: RequestLimits {
                request_line: parse_or(&lookup, "LIMIT_REQUEST_LINE", 4094)?,
                request_fields: parse_or(&lookup, "LIMIT_REQUEST_FIELDS", 100)?,
                request_field_size: parse_or(&lookup, "LIMIT_REQUEST_FIELD_SIZE", 8190)?,
            },
            statsd_host: lookup("STATSD_HOST").unwrap_or_else(|| "localhost".to_string()),
            statsd_prefix: lookup("STATSD_PREFIX").unwrap_or_else(|| "horilla".to_string()),
        })
    }

    /// Upper bound on simultaneously open client connections.
    pub fn max_connections(&self) -> usize {
        self.workers.saturating_mul(self.worker_connections).max(1)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got `{value}`")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use super::{default_workers, ServerConfig};
    use crate::logging::LogSink;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn worker_formula_scales_with_cores() {
        assert_eq!(default_workers(1), 3);
        assert_eq!(default_workers(4), 9);
    }

    #[test]
    fn defaults_match_production_layout() {
        let config = config_from(&[("WEB_CONCURRENCY", "3")]).unwrap();
        assert_eq!(config.bind.to_string(), "0.0.0.0:8000");
        assert_eq!(config.backlog, 2048);
        assert_eq!(config.workers, 3);
        assert_eq!(config.worker_connections, 1000);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.keepalive, Duration::from_secs(2));
        assert_eq!(config.max_requests, 1000);
        assert_eq!(config.max_requests_jitter, 100);
        assert_eq!(config.graceful_timeout, Duration::from_secs(30));
        assert_eq!(
            config.access_log,
            LogSink::File(PathBuf::from("/app/logs/access.log"))
        );
        assert_eq!(
            config.error_log,
            LogSink::File(PathBuf::from("/app/logs/error.log"))
        );
        assert_eq!(config.pidfile, Some(PathBuf::from("/tmp/horilla.pid")));
        assert_eq!(config.limits.request_line, 4094);
        assert_eq!(config.limits.request_fields, 100);
        assert_eq!(config.limits.request_field_size, 8190);
        assert_eq!(config.statsd_host, "localhost");
        assert_eq!(config.statsd_prefix, "horilla");
        assert_eq!(config.max_connections(), 3000);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9000"),
            ("WEB_CONCURRENCY", "2"),
            ("ACCESS_LOG", "-"),
            ("ERROR_LOG", "-"),
            ("PIDFILE", ""),
            ("STATSD_PREFIX", "hr"),
        ])
        .unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:9000");
        assert_eq!(config.workers, 2);
        assert_eq!(config.access_log, LogSink::Stdout);
        assert_eq!(config.error_log, LogSink::Stderr);
        assert!(config.pidfile.is_none());
        assert_eq!(config.statsd_prefix, "hr");
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = config_from(&[("SERVER_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("SERVER_PORT"));
        assert!(config_from(&[("WEB_CONCURRENCY", "many")]).is_err());
        assert!(config_from(&[("SERVER_HOST", "not an ip")]).is_err());
    }

    #[test]
    fn accepts_ipv6_hosts() {
        let config = config_from(&[("SERVER_HOST", "::"), ("SERVER_PORT", "8080")]).unwrap();
        assert_eq!(config.bind.to_string(), "[::]:8080");
        assert!(config.bind.is_ipv6());

        let config = config_from(&[("SERVER_HOST", "::1")]).unwrap();
        assert_eq!(config.bind.to_string(), "[::1]:8000");
    }

    #[test]
    fn zero_workers_still_runs_one() {
        let config = config_from(&[("WEB_CONCURRENCY", "0")]).unwrap();
        assert_eq!(config.workers, 1);
    }
}
