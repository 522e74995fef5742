use std::sync::Arc;

use anyhow::Context;

use hollacrm::config::AppConfig;
use hollacrm::logging;
use hollacrm::server::{self, LoggingHooks, ServerConfig, ServerHooks};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let server_config = ServerConfig::from_env()?;
    let _log_guards = logging::init(&server_config)?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "server",
        database_url = %config.redacted_database_url(),
        pool_size = config.database_max_pool_size,
        bind = %server_config.bind,
        workers = server_config.workers,
        worker_connections = server_config.worker_connections,
        timeout_secs = server_config.timeout.as_secs(),
        keepalive_secs = server_config.keepalive.as_secs(),
        "loaded backend configuration"
    );

    let hooks: Arc<dyn ServerHooks> = Arc::new(LoggingHooks);
    let runtime = server::build_runtime(&server_config, hooks.clone())
        .context("failed to build server runtime")?;
    runtime.block_on(server::run(config, server_config, hooks))
}
