//! RPC seam between the contact binding and the open API.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ContactError;

/// Invokes one open API endpoint and returns the decoded response document.
///
/// Implementations attach credentials, perform the HTTP exchange and run
/// [`check_envelope`](crate::check_envelope) on the result, so a returned
/// document always has `errcode == 0` (or no `errcode` at all).
///
/// `body` selects the method: `None` issues a GET with `query` only,
/// `Some` issues a POST with the value as the JSON body.
#[async_trait]
pub trait OapiTransport: Send + Sync {
    /// # Errors
    /// - `ContactError::Transport` if the exchange fails or the status is not 2xx
    /// - `ContactError::Decode` if the body is not a JSON object
    /// - `ContactError::Api` if the envelope carries a non-zero `errcode`
    async fn invoke(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ContactError>;
}
