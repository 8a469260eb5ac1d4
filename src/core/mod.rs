pub mod config;
pub mod database;
pub mod error;
pub mod instrumentation;
pub mod metrics;
pub mod middleware;
pub mod openapi;
