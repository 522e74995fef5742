use std::net::SocketAddr;
use std::thread::ThreadId;

use tracing::info;

/// Lifecycle callbacks fired by the server.
///
/// `post_fork` and `worker_exit` run on the thread itself, from the
/// runtime's thread start and stop callbacks. Blocking-pool threads fire
/// them too.
pub trait ServerHooks: Send + Sync + 'static {
    fn when_ready(&self, _address: SocketAddr) {}

    /// SIGINT or SIGQUIT arrived; the server drains and exits cleanly after.
    fn worker_int(&self) {}

    fn post_fork(&self, _worker: ThreadId) {}

    fn worker_exit(&self, _worker: ThreadId) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl ServerHooks for LoggingHooks {
    fn when_ready(&self, address: SocketAddr) {
        info!("Server is ready. Listening on {address}");
    }

    fn worker_int(&self) {
        info!("Worker received INT or QUIT signal");
    }

    fn post_fork(&self, worker: ThreadId) {
        info!("Worker spawned ({worker:?})");
    }

    fn worker_exit(&self, worker: ThreadId) {
        info!("Worker exiting ({worker:?})");
    }
}
