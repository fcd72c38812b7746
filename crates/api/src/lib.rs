//! HTTP API: tenant pipeline middleware, gates, and the demo LMS routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
