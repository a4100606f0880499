//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::BatchPolicy;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: Server,

    /// Service configuration.
    #[serde(default)]
    pub service: Service,

    /// CMS configuration.
    #[serde(default)]
    pub cms: Cms,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Service configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Number of listings on a page, when no page size is requested.
    #[default(20)]
    pub default_page_size: u32,

    /// How failed lookups of a category attributes batch are handled.
    pub attributes_batch: BatchPolicy,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            default_page_size,
            attributes_batch,
        } = value;
        Self {
            default_page_size,
            attributes_batch,
        }
    }
}

/// CMS configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cms {
    /// Base URL of the CMS.
    #[default("http://127.0.0.1:1337".to_owned())]
    pub url: String,

    /// API token to authorize requests with, if any.
    pub token: Option<String>,

    /// Timeout of a single CMS request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,

    /// Number of children levels fetched below a category.
    #[default(3)]
    pub category_depth: u8,
}

impl From<Cms> for service::infra::strapi::Config {
    fn from(value: Cms) -> Self {
        let Cms {
            url,
            token,
            timeout,
            category_depth,
        } = value;

        Self {
            url,
            token: token
                .filter(|t| !t.is_empty())
                .map(secrecy::SecretString::from),
            timeout,
            category_depth,
        }
    }
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use service::BatchPolicy;

    use super::Config;

    #[test]
    fn defaults_without_file() {
        let conf = Config::new("definitely-missing.toml").unwrap();

        assert_eq!(conf.server.port, 8080);
        assert_eq!(conf.server.cors.origins, ["*"]);
        assert_eq!(conf.cms.url, "http://127.0.0.1:1337");
        assert_eq!(conf.cms.timeout, Duration::from_secs(10));
        assert!(conf.cms.token.is_none());
        assert_eq!(conf.service.default_page_size, 20);
        assert_eq!(conf.service.attributes_batch, BatchPolicy::Propagate);
    }

    #[test]
    fn blank_token_is_no_token() {
        let conf = service::infra::strapi::Config::from(super::Cms {
            token: Some(String::new()),
            ..super::Cms::default()
        });

        assert!(conf.token.is_none());
    }
}
