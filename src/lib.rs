pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod server;
pub mod state;
pub mod store;
