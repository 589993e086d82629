//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::SecretString;
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Strapi CMS configuration.
    pub strapi: Strapi,

    /// Google identity configuration.
    pub google: Google,

    /// EmailOctopus configuration.
    pub email_octopus: EmailOctopus,

    /// Log configuration.
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
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [JWT] secret.
    ///
    /// [JWT]: https://wikipedia.org/wiki/JSON_Web_Token
    #[default("secret".to_owned())]
    pub jwt_secret: String,

    /// Booking inquiry configuration.
    pub booking: Booking,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

/// Booking inquiry configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Booking {
    /// Operator WhatsApp phone number, in international format without the
    /// leading `+`.
    #[default("6281234567890".to_owned())]
    pub whatsapp_phone: String,
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `RefreshTours` task configuration.
    pub refresh_tours: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(time::Duration::from_secs(10 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

impl From<Task> for service::task::refresh_tours::Config {
    fn from(value: Task) -> Self {
        Self {
            interval: value.interval,
        }
    }
}

/// Strapi CMS configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Strapi {
    /// Base URL of the CMS API, including the `/api` prefix.
    #[default("http://127.0.0.1:1337/api".to_owned())]
    pub base_url: String,

    /// Origin prepended to CMS-relative media URLs.
    #[default("http://127.0.0.1:1337".to_owned())]
    pub media_origin: String,

    /// Bearer token authorizing the CMS requests.
    pub token: String,

    /// Timeout of a single CMS request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Strapi> for service::infra::strapi::Config {
    fn from(value: Strapi) -> Self {
        let Strapi {
            base_url,
            media_origin: _,
            token,
            timeout,
        } = value;

        Self {
            base_url,
            token: SecretString::from(token),
            timeout,
        }
    }
}

/// Google identity configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Google {
    /// OAuth client ID the sign-in credentials must be issued for.
    pub client_id: String,

    /// URL of the JSON Web Key Set the credentials are verified against.
    #[default("https://www.googleapis.com/oauth2/v3/certs".to_owned())]
    pub certs_url: String,

    /// Timeout of a single key set request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Google> for service::infra::google::Config {
    fn from(value: Google) -> Self {
        let Google {
            client_id,
            certs_url,
            timeout,
        } = value;

        Self {
            client_id,
            certs_url,
            timeout,
        }
    }
}

/// EmailOctopus configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct EmailOctopus {
    /// Base URL of the provider API.
    #[default("https://emailoctopus.com/api/1.6".to_owned())]
    pub api_url: String,

    /// Server-held API key authorizing the requests.
    pub api_key: String,

    /// Identifier of the mailing list to subscribe to.
    pub list_id: String,

    /// Timeout of a single provider request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<EmailOctopus> for service::infra::email_octopus::Config {
    fn from(value: EmailOctopus) -> Self {
        let EmailOctopus {
            api_url,
            api_key,
            list_id,
            timeout,
        } = value;

        Self {
            api_url,
            api_key: SecretString::from(api_key),
            list_id,
            timeout,
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
