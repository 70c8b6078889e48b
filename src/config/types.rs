// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub site: SiteConfig,
    pub amp: AmpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
    pub security_header: SecurityHeader,
}

/// Precomputed response header attached to every rendered page
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SecurityHeader {
    pub name: String,
    pub value: String,
}

/// Deployment environment
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

/// Site content and render context settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub environment: Environment,
    /// Directory scanned for section templates
    pub sections_dir: String,
    pub layouts_dir: String,
    /// Content extension without the leading dot
    pub template_extension: String,
    pub default_layout: String,
    pub schedule_file: String,
    pub source_prefix: String,
    /// Public origin for AMP canonical links; derived from `Host` when unset
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub ga_id: String,
    #[serde(default)]
    pub ua_id: String,
    #[serde(default)]
    pub days: Vec<CalendarDay>,
}

/// One conference day as shown by the calendar widgets
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: String,
    #[serde(default)]
    pub label: String,
}

/// AMP session page settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AmpConfig {
    pub layout: String,
    pub template: String,
    /// SCSS entry compiled on demand
    pub stylesheet_entry: String,
    /// Precompiled CSS loaded at startup in production
    pub compiled_stylesheet: String,
}

/// Collaborator routes consulted when the site dispatcher defers
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
    /// Exact request path -> file on disk
    #[serde(default)]
    pub passthrough: HashMap<String, String>,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            index_files: default_index_files(),
            passthrough: HashMap::new(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

fn default_healthz_path() -> String {
    "/healthz".to_string()
}

fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
