//! HTTP API: routing and request/response mapping over the inventory store.

pub mod app;
pub mod middleware;
