//! Request handlers
//!
//! Routing for site pages, with passthrough and static files behind them.

pub mod router;
pub mod static_files;

pub use router::handle_request;
