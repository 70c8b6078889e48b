// Configuration module entry point
// Layers the config file, SITE__* environment variables and built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::SiteError;

pub use state::AppState;
pub use types::{
    AmpConfig, CalendarDay, Config, Environment, HealthConfig, HttpConfig, LoggingConfig,
    PerformanceConfig, RoutesConfig, SecurityHeader, ServerConfig, SiteConfig,
};

const DEFAULT_CSP: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdn.ampproject.org https://www.google-analytics.com https://www.googletagmanager.com; \
style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com; \
img-src 'self' data: https:; \
connect-src 'self' https://www.google-analytics.com; \
object-src 'none'";

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    /// Load configuration from a file path without extension, e.g. `config`
    /// for `config.toml`. A missing file leaves defaults and `SITE__*`
    /// environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, SiteError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SITE").separator("__"));

        Ok(with_defaults(builder)?.build()?.try_deserialize()?)
    }

    /// Parse configuration from a TOML document, applying the same defaults
    pub fn from_toml(source: &str) -> Result<Self, SiteError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml));

        Ok(with_defaults(builder)?.build()?.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, SiteError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| SiteError::Address(format!("'{addr}': {e}")))
    }
}

fn with_defaults(builder: Builder) -> Result<Builder, config::ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.show_headers", false)?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("http.server_name", "conference-site")?
        .set_default("http.enable_cors", false)?
        .set_default("http.max_body_size", 1_048_576)? // 1MB
        .set_default("http.security_header.name", "Content-Security-Policy")?
        .set_default("http.security_header.value", DEFAULT_CSP)?
        .set_default("site.environment", "development")?
        .set_default("site.sections_dir", "site/sections")?
        .set_default("site.layouts_dir", "site/layouts")?
        .set_default("site.template_extension", "hbs")?
        .set_default("site.default_layout", "default")?
        .set_default("site.schedule_file", "site/schedule.json")?
        .set_default("site.source_prefix", "/static")?
        .set_default("amp.layout", "amp")?
        .set_default("amp.template", "_amp-session")?
        .set_default("amp.stylesheet_entry", "site/styles/amp.scss")?
        .set_default("amp.compiled_stylesheet", "dist/amp.css")
}
