//! Conference site server
//!
//! Renders section pages and AMP session pages from Handlebars templates,
//! resolving the mount prefix a fronting proxy may have stripped.

pub mod amp;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod site;
