//! HTTP application server with a fixed worker pool.
//!
//! The runtime owns `workers` threads; connections are accepted from a
//! listener with an explicit backlog and capped at
//! `workers * worker_connections`. On SIGINT, SIGQUIT, SIGTERM or an
//! exhausted request budget the listener closes and open connections get
//! `graceful_timeout` to finish.

pub mod access_log;
pub mod config;
pub mod hooks;
pub mod limits;
pub mod recycle;

use std::fs;
use std::future::pending;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{middleware, Router};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::runtime::Runtime;
use tokio::signal;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower::Service;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::{config::AppConfig, db, routes, state::AppState};

use access_log::RemoteAddr;
pub use config::ServerConfig;
pub use hooks::{LoggingHooks, ServerHooks};
use recycle::RequestBudget;

/// Multi-threaded runtime sized to the worker count, firing the worker
/// hooks as threads come and go.
pub fn build_runtime(config: &ServerConfig, hooks: Arc<dyn ServerHooks>) -> std::io::Result<Runtime> {
    let on_start = hooks.clone();
    let on_stop = hooks;
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers.max(1))
        .thread_name(config.proc_name.clone())
        .on_thread_start(move || on_start.post_fork(std::thread::current().id()))
        .on_thread_stop(move || on_stop.worker_exit(std::thread::current().id()))
        .enable_all()
        .build()
}

pub fn bind_listener(address: SocketAddr, backlog: u32) -> std::io::Result<TcpListener> {
    let socket = if address.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(address)?;
    socket.listen(backlog)
}

/// Wraps the route table with the per-request middleware stack.
pub fn build_app(routes: Router, config: &ServerConfig, budget: Arc<RequestBudget>) -> Router {
    let access_format: Arc<str> = Arc::from(config.access_log_format.as_str());
    routes
        .layer(TimeoutLayer::new(config.timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(budget, recycle::count_request))
        .layer(middleware::from_fn_with_state(config.limits, limits::enforce_limits))
        .layer(middleware::from_fn_with_state(access_format, access_log::log_access))
}

/// Boots the data layer, binds the listener and serves until shutdown.
pub async fn run(app_config: AppConfig, config: ServerConfig, hooks: Arc<dyn ServerHooks>) -> Result<()> {
    let pool = db::init_pool_with_size(&app_config.database_url, app_config.database_max_pool_size)?;
    let migration_pool = pool.clone();
    let applied = tokio::task::spawn_blocking(move || -> Result<usize> {
        let mut conn = migration_pool
            .get()
            .context("failed to get database connection")?;
        Ok(db::run_migrations(&mut conn)?)
    })
    .await
    .context("migration task panicked")??;
    info!(applied, "database schema is up to date");

    let state = AppState::new(pool, app_config);
    let shutdown = CancellationToken::new();
    let budget = Arc::new(RequestBudget::new(
        config.max_requests,
        config.max_requests_jitter,
        &mut rand::thread_rng(),
        shutdown.clone(),
    ));
    let app = build_app(routes::create_router(state), &config, budget.clone());

    let listener = bind_listener(config.bind, config.backlog)
        .with_context(|| format!("failed to bind {}", config.bind))?;
    let address = listener.local_addr()?;
    let _pidfile = config.pidfile.as_deref().map(PidFile::create).transpose()?;

    info!(
        proc_name = %config.proc_name,
        workers = config.workers,
        max_connections = config.max_connections(),
        backlog = config.backlog,
        request_budget = ?budget.limit(),
        statsd_host = %config.statsd_host,
        statsd_prefix = %config.statsd_prefix,
        "server configured"
    );
    hooks.when_ready(address);

    tokio::spawn(shutdown_signal(hooks, shutdown.clone()));
    serve(listener, app, &config, shutdown).await;

    info!(served = budget.served(), "server shut down");
    Ok(())
}

/// Accept loop. Returns once `shutdown` fires and open connections have
/// finished or `graceful_timeout` elapsed.
pub async fn serve(listener: TcpListener, app: Router, config: &ServerConfig, shutdown: CancellationToken) {
    let connections = Arc::new(Semaphore::new(config.max_connections()));
    let tracker = TaskTracker::new();
    let keepalive = config.keepalive;

    loop {
        let permit = tokio::select! {
            _ = shutdown.cancelled() => break,
            permit = connections.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let (stream, peer) = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(err) => {
                    warn!(error = %err, "failed to accept connection");
                    continue;
                }
            },
        };

        let app = app.clone();
        let shutdown = shutdown.clone();
        tracker.spawn(async move {
            serve_connection(stream, peer, app, keepalive, shutdown).await;
            drop(permit);
        });
    }

    drop(listener);
    tracker.close();
    info!(open_connections = tracker.len(), "listener closed, draining connections");
    if timeout(config.graceful_timeout, tracker.wait()).await.is_err() {
        warn!(
            open_connections = tracker.len(),
            "graceful timeout elapsed with connections still open"
        );
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: Router,
    keepalive: Duration,
    shutdown: CancellationToken,
) {
    let service = service_fn(move |mut request: hyper::Request<Incoming>| {
        request.extensions_mut().insert(RemoteAddr(peer));
        app.clone().call(request)
    });

    let mut builder = http1::Builder::new();
    builder.timer(TokioTimer::new()).keep_alive(!keepalive.is_zero());
    if !keepalive.is_zero() {
        builder.header_read_timeout(keepalive);
    }

    let connection = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let mut draining = false;
    loop {
        tokio::select! {
            result = connection.as_mut() => {
                if let Err(err) = result {
                    debug!(%peer, error = %err, "connection closed with error");
                }
                break;
            }
            _ = shutdown.cancelled(), if !draining => {
                draining = true;
                connection.as_mut().graceful_shutdown();
            }
        }
    }
}

/// Waits for a termination signal or an earlier shutdown, then cancels
/// `shutdown`.
pub async fn shutdown_signal(hooks: Arc<dyn ServerHooks>, shutdown: CancellationToken) {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let quit = unix_signal(signal::unix::SignalKind::quit());
    #[cfg(not(unix))]
    let quit = pending::<()>();

    #[cfg(unix)]
    let terminate = unix_signal(signal::unix::SignalKind::terminate());
    #[cfg(not(unix))]
    let terminate = pending::<()>();

    tokio::select! {
        () = interrupt => hooks.worker_int(),
        () = quit => hooks.worker_int(),
        () = terminate => info!("Received SIGTERM signal"),
        () = shutdown.cancelled() => return,
    }

    info!("Shutdown signal received, terminating gracefully...");
    shutdown.cancel();
}

#[cfg(unix)]
async fn unix_signal(kind: signal::unix::SignalKind) {
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            error!(error = %err, "failed to install signal handler");
            pending::<()>().await;
        }
    }
}

/// Pid file that is removed again when dropped.
#[derive(Debug)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, format!("{}\n", std::process::id()))
            .with_context(|| format!("failed to write pid file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "failed to remove pid file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PidFile;

    #[test]
    fn pid_file_holds_process_id_until_dropped() {
        let path = std::env::temp_dir().join(format!("hollacrm-test-{}.pid", std::process::id()));
        let pidfile = PidFile::create(&path).unwrap();
        let contents = std::fs::read_to_string(pidfile.path()).unwrap();
        assert_eq!(contents.trim(), std::process::id().to_string());
        drop(pidfile);
        assert!(!path.exists());
    }
}
