//! Response envelope shared by every open API result.
//!
//! The platform reports logical failures with HTTP 200 and a non-zero
//! `errcode`, so every transport runs [`check_envelope`] before a payload
//! is handed to the binding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnNull, serde_as};

use crate::error::ContactError;

/// `errcode` / `errmsg` pair carried by every open API response.
///
/// Flattened into each result type; an absent or `null` code means success.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OapiResponse {
    #[serde(rename = "errcode")]
    #[serde_as(as = "DefaultOnNull")]
    pub err_code: i64,
    #[serde(rename = "errmsg")]
    #[serde_as(as = "DefaultOnNull")]
    pub err_msg: String,
}

impl OapiResponse {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.err_code == 0
    }

    /// Turn a failure envelope into [`ContactError::Api`].
    ///
    /// # Errors
    /// Returns `ContactError::Api` when `err_code` is non-zero.
    pub fn check(&self) -> Result<(), ContactError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ContactError::api(self.err_code, self.err_msg.clone()))
        }
    }
}

/// Access to the envelope embedded in a typed result.
pub trait Envelope {
    fn envelope(&self) -> &OapiResponse;
}

/// Validate the envelope of a raw response document.
///
/// # Errors
/// - `ContactError::Decode` if the document is not a JSON object or its
///   envelope fields have the wrong type
/// - `ContactError::Api` if `errcode` is non-zero
pub fn check_envelope(document: &Value) -> Result<(), ContactError> {
    if !document.is_object() {
        return Err(ContactError::Decode(serde::de::Error::custom(
            "response is not a JSON object",
        )));
    }
    OapiResponse::deserialize(document)?.check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn zero_code_passes() {
        assert!(check_envelope(&json!({"errcode": 0, "errmsg": "ok", "id": 1})).is_ok());
    }

    #[test]
    fn absent_code_passes() {
        assert!(check_envelope(&json!({"chatid": "c1"})).is_ok());
    }

    #[test]
    fn null_envelope_fields_pass() {
        assert!(check_envelope(&json!({"errcode": null, "errmsg": null})).is_ok());
    }

    #[test]
    fn non_zero_code_is_api_error() {
        let err = check_envelope(&json!({"errcode": 60121, "errmsg": "user not found"}))
            .unwrap_err();
        match err {
            ContactError::Api { code, message } => {
                assert_eq!(code, 60121);
                assert_eq!(message, "user not found");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn non_object_is_decode_error() {
        let err = check_envelope(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ContactError::Decode(_)));
    }

    #[test]
    fn mistyped_code_is_decode_error() {
        let err = check_envelope(&json!({"errcode": "zero"})).unwrap_err();
        assert!(matches!(err, ContactError::Decode(_)));
    }
}
