use std::fmt;
use std::path::Path;
use std::time::Duration;

use dingtalk_http::{HttpClientConfig, TlsRootConfig, TransportSecurity};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, de};
use thiserror::Error;
use url::Url;

/// Default open API host.
pub const DEFAULT_BASE_URL: &str = "https://oapi.dingtalk.com/";

/// Default `User-Agent` sent by the contact client.
pub const DEFAULT_USER_AGENT: &str = concat!("dingtalk-contact/", env!("CARGO_PKG_VERSION"));

/// Prefix of environment variables read by [`ContactClientConfig::load`].
pub const ENV_PREFIX: &str = "DINGTALK_";

const ENV_KEYS: &[&str] = &[
    "base_url",
    "access_token",
    "request_timeout",
    "user_agent",
    "max_body_size",
    "allow_insecure_http",
    "tls_roots",
];

/// Read verbatim; the typed `Env` provider turns all-digit values into numbers.
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or merged.
    #[error("failed to load contact client configuration: {0}")]
    Load(#[source] Box<figment::Error>),

    /// A field has an unusable value.
    #[error("invalid contact client configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built from the configuration.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] dingtalk_http::HttpError),
}

/// Contact client configuration.
///
/// `Debug` is manually implemented to redact the access token.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactClientConfig {
    /// Open API host; endpoint paths are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token attached as the `access_token` query parameter of every call.
    #[serde(deserialize_with = "deserialize_secret")]
    pub access_token: SecretString,

    /// Per-request timeout, as a humantime string in config sources (`"30s"`).
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Largest response body accepted, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Permit plain `http://` base URLs. Mock servers only.
    #[serde(default)]
    pub allow_insecure_http: bool,

    /// Root certificates trusted for `https` base URLs.
    #[serde(default)]
    pub tls_roots: TlsRoots,
}

/// Root certificate source, spelled `webpki` or `native` in config sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsRoots {
    /// Mozilla roots bundled with the binary.
    #[default]
    WebPki,
    /// The operating system trust store.
    Native,
}

impl From<TlsRoots> for TlsRootConfig {
    fn from(roots: TlsRoots) -> Self {
        match roots {
            TlsRoots::WebPki => TlsRootConfig::WebPki,
            TlsRoots::Native => TlsRootConfig::Native,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_owned()
}

fn default_max_body_size() -> usize {
    10 * 1024 * 1024
}

/// Accepts a string, or an integer that a config source typed as a number.
fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    struct V;

    impl de::Visitor<'_> for V {
        type Value = SecretString;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an access token string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(SecretString::from(v.to_owned()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(SecretString::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(SecretString::from(v.to_string()))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(SecretString::from(v.to_string()))
        }
    }

    deserializer.deserialize_any(V)
}

/// Humantime string (`"30s"`, `"1m 30s"`) or a bare integer number of seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct V;

    impl de::Visitor<'_> for V {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            humantime::parse_duration(v)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v)
                .map(Duration::from_secs)
                .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }

    deserializer.deserialize_any(V)
}

impl ContactClientConfig {
    /// Configuration with defaults for everything but the token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            access_token: SecretString::from(access_token.into()),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            max_body_size: default_max_body_size(),
            allow_insecure_http: false,
            tls_roots: TlsRoots::default(),
        }
    }

    /// Load configuration from an optional YAML file overlaid with
    /// `DINGTALK_*` environment variables, then validate it.
    ///
    /// A missing file is treated as empty.
    ///
    /// # Errors
    /// - `ConfigError::Load` if a source is malformed or a field is missing
    /// - `ConfigError::Invalid` if validation fails
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .only(ENV_KEYS)
                .ignore(&[ACCESS_TOKEN_KEY]),
        );
        if let Some(token) = raw_env_token() {
            figment = figment.merge(Serialized::default(ACCESS_TOKEN_KEY, token));
        }

        let config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce a working client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if:
    /// - the access token is empty, or
    /// - `base_url` is not an absolute `http`/`https` URL, or
    /// - `base_url` is `http` while `allow_insecure_http` is off, or
    /// - `request_timeout` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid("access_token must not be empty".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "request_timeout must be greater than zero".into(),
            ));
        }
        self.parsed_base_url().map(|_| ())
    }

    /// Parsed `base_url` with a trailing slash, so relative endpoint paths
    /// append to it instead of replacing its last segment.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the URL is unusable.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url is not a valid URL: {e}")))?;

        match url.scheme() {
            "https" => {}
            "http" if self.allow_insecure_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "base_url uses http; set allow_insecure_http for mock servers".into(),
                ));
            }
            other => {
                return Err(ConfigError::Invalid(format!(
                    "base_url scheme '{other}' is not http or https"
                )));
            }
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("base_url has no host".into()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "base_url must not carry a query or fragment".into(),
            ));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.request_timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            tls_roots: self.tls_roots.into(),
            ..HttpClientConfig::default()
        }
    }
}

impl Clone for ContactClientConfig {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            access_token: SecretString::from(self.access_token.expose_secret().to_owned()),
            request_timeout: self.request_timeout,
            user_agent: self.user_agent.clone(),
            max_body_size: self.max_body_size,
            allow_insecure_http: self.allow_insecure_http,
            tls_roots: self.tls_roots,
        }
    }
}

fn raw_env_token() -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{}", ACCESS_TOKEN_KEY.to_uppercase())).ok()
}

/// `Debug` redacts `access_token`.
impl fmt::Debug for ContactClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("max_body_size", &self.max_body_size)
            .field("allow_insecure_http", &self.allow_insecure_http)
            .field("tls_roots", &self.tls_roots)
            .finish()
    }
}
