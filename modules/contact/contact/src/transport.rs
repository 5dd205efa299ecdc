use async_trait::async_trait;
use contact_sdk::{ContactError, OapiTransport, check_envelope};
use dingtalk_http::{HttpClient, HttpError};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{ConfigError, ContactClientConfig};

/// [`OapiTransport`] over HTTP(S).
///
/// Every call resolves the endpoint path against `base_url` and sends the
/// access token as the first query parameter. The token is never logged
/// and never appears in returned errors.
///
/// `HttpClient` is `Clone + Send + Sync`, so no external locking is needed.
pub struct HttpOapiTransport {
    client: HttpClient,
    base_url: Url,
    access_token: SecretString,
}

impl HttpOapiTransport {
    /// `base_url` should end with `/`; see [`ContactClientConfig::parsed_base_url`].
    #[must_use]
    pub fn new(client: HttpClient, base_url: Url, access_token: SecretString) -> Self {
        Self {
            client,
            base_url,
            access_token,
        }
    }

    /// Build the HTTP client and transport described by `config`.
    ///
    /// # Errors
    /// - `ConfigError::Invalid` if the configuration does not validate
    /// - `ConfigError::Http` if the HTTP client cannot be built
    pub fn from_config(config: &ContactClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let client = dingtalk_http::HttpClientBuilder::with_config(config.http_config()).build()?;
        Ok(Self::new(
            client,
            base_url,
            SecretString::from(config.access_token.expose_secret().to_owned()),
        ))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ContactError> {
        self.base_url
            .join(path)
            .map_err(|e| ContactError::transport(format!("invalid endpoint path '{path}': {e}")))
    }
}

#[async_trait]
impl OapiTransport for HttpOapiTransport {
    #[instrument(
        name = "dingtalk.oapi.invoke",
        skip_all,
        fields(endpoint = %path, method = if body.is_some() { "POST" } else { "GET" })
    )]
    async fn invoke(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ContactError> {
        let url = self.endpoint(path)?;

        let mut params: Vec<(&str, &str)> = Vec::with_capacity(query.len() + 1);
        params.push(("access_token", self.access_token.expose_secret()));
        params.extend_from_slice(query);

        let request = match body {
            Some(body) => self
                .client
                .post(url.as_str())
                .json(body)
                .map_err(map_http_error)?,
            None => self.client.get(url.as_str()),
        };

        let document: Value = request
            .query(&params)
            .map_err(map_http_error)?
            .send()
            .await
            .map_err(map_http_error)?
            .json()
            .await
            .map_err(map_http_error)?;

        if let Err(err) = check_envelope(&document) {
            if let ContactError::Api { code, message } = &err {
                warn!(errcode = code, errmsg = %message, "open API rejected the call");
            } else {
                warn!(error = %err, "malformed open API response");
            }
            return Err(err);
        }

        debug!("open API call succeeded");
        Ok(document)
    }
}

/// Map an HTTP client failure to `ContactError` without echoing the URL.
///
/// Malformed JSON becomes `Decode`; everything else is a transport failure.
fn map_http_error(e: HttpError) -> ContactError {
    let message = match e {
        HttpError::Json(err) => return ContactError::Decode(err),
        HttpError::HttpStatus { status, .. } => format!("HTTP {status}"),
        HttpError::Timeout(duration) => {
            format!("request timed out after {} ms", duration.as_millis())
        }
        HttpError::Transport(err) => format!("transport error: {err}"),
        HttpError::Tls(err) => format!("TLS error: {err}"),
        HttpError::BodyTooLarge { limit, actual } => {
            format!("response too large: limit {limit} bytes, got {actual} bytes")
        }
        HttpError::RequestBuild(err) => format!("request build failed: {err}"),
        HttpError::InvalidHeaderName(err) => format!("invalid header name: {err}"),
        HttpError::InvalidHeaderValue(err) => format!("invalid header value: {err}"),
        HttpError::QueryEncode(err) => format!("query encode failed: {err}"),
        HttpError::Overloaded => "request rejected: service overloaded".to_owned(),
        HttpError::ServiceClosed => "service unavailable".to_owned(),
        HttpError::InvalidUri { reason, .. } => format!("invalid URL: {reason}"),
        HttpError::InvalidScheme { scheme, reason } => {
            format!("invalid scheme '{scheme}': {reason}")
        }
        other => other.to_string(),
    };
    ContactError::transport(message)
}
