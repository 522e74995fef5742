use std::env;

use anyhow::{Context, Result};
use url::Url;

use crate::db::DEFAULT_MAX_POOL_SIZE;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub ts_authkey: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_pool_size = env::var("DATABASE_MAX_POOL_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_POOL_SIZE);
        let ts_authkey = env::var("TS_AUTHKEY").ok();

        Ok(Self {
            database_url,
            database_max_pool_size,
            ts_authkey,
        })
    }

    pub fn redacted_database_url(&self) -> String {
        redact_database_url(&self.database_url)
    }

    /// Admin entry point announced once seeding finishes.
    pub fn admin_url(&self) -> String {
        format!("http://{}/admin/", access_host(self.ts_authkey.as_deref()))
    }
}

/// Hosts joined to a tailnet are reached through their tailscale address.
pub fn access_host(ts_authkey: Option<&str>) -> &'static str {
    match ts_authkey {
        Some(key) if key.contains("tailscale") => "tailscale ip",
        _ => "localhost",
    }
}

fn redact_database_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            let _ = parsed.set_password(Some("*****"));
            parsed.to_string()
        }
        Err(_) => "***".to_string(),
    }
}
