//! Configuration management for the Shastra Chat service
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config/default, config/<env>, config/local)
//! - Default values
//!
//! Completion-service credentials are injected here, never read from
//! ambient globals at call sites.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Completion service configuration
    pub completion: CompletionConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Upper bound on chat query length, in characters
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Per-query execution deadline in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// Completion provider: openai, mock
    #[serde(default = "default_completion_provider")]
    pub provider: String,

    /// API key for the completion service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Sampling temperature; kept low for determinism over creativity
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-length budget in tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Maximum scriptural sections per request
    #[serde(default = "default_max_sections")]
    pub max_sections: u64,

    /// Maximum concept definitions per request
    #[serde(default = "default_max_concepts")]
    pub max_concepts: u64,

    /// Maximum extracted search terms
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Term matching policy: first_term_only (default) or union_all_terms
    #[serde(default = "default_term_policy")]
    pub term_policy: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT secret for bearer-token validation
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }
fn default_shutdown_timeout() -> u64 { 30 }
fn default_max_query_chars() -> usize { 2000 }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 10 }
fn default_idle_timeout() -> u64 { 300 }
fn default_query_timeout() -> u64 { 10 }
fn default_completion_provider() -> String { "openai".to_string() }
fn default_completion_model() -> String { "gpt-4o-mini".to_string() }
fn default_temperature() -> f32 { 0.3 }
fn default_max_tokens() -> u32 { 1500 }
fn default_completion_timeout() -> u64 { 60 }
fn default_max_sections() -> u64 { 5 }
fn default_max_concepts() -> u64 { 3 }
fn default_max_terms() -> usize { 3 }
fn default_term_policy() -> String { "first_term_only".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_service_name() -> String { "shastra-chat".to_string() }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__COMPLETION__API_KEY=sk-...
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            .build()?;

        config.try_deserialize()
    }

    /// Load from a specific TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Get completion timeout as Duration
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion.timeout_secs)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_sections: default_max_sections(),
            max_concepts: default_max_concepts(),
            max_terms: default_max_terms(),
            term_policy: default_term_policy(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logging: default_json_logging(),
            service_name: default_service_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
                shutdown_timeout_secs: default_shutdown_timeout(),
                max_query_chars: default_max_query_chars(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/shastra".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
                query_timeout_secs: default_query_timeout(),
            },
            completion: CompletionConfig {
                provider: default_completion_provider(),
                api_key: None,
                api_base: None,
                model: default_completion_model(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
                timeout_secs: default_completion_timeout(),
            },
            retrieval: RetrievalConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.completion.temperature, 0.3);
        assert_eq!(config.completion.max_tokens, 1500);
        assert_eq!(config.database.query_timeout_secs, 10);
    }

    #[test]
    fn test_default_retrieval_bounds() {
        let retrieval = RetrievalConfig::default();
        assert_eq!(retrieval.max_sections, 5);
        assert_eq!(retrieval.max_concepts, 3);
        assert_eq!(retrieval.max_terms, 3);
        assert_eq!(retrieval.term_policy, "first_term_only");
    }
}
