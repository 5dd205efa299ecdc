//! DingTalk contact directory client
//!
//! Implements [`contact_sdk::ContactApi`] on top of an
//! [`OapiTransport`](contact_sdk::OapiTransport). The production transport,
//! [`HttpOapiTransport`], talks to the open API over `dingtalk-http`.
//!
//! ```ignore
//! use contact::{ContactClient, ContactClientConfig};
//! use contact_sdk::ContactApi;
//!
//! let config = ContactClientConfig::load(Some("dingtalk.yaml".as_ref()))?;
//! let client = ContactClient::from_config(&config)?;
//! let engineering = client.department_detail(5).await?;
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod transport;

pub use client::ContactClient;
pub use config::{ConfigError, ContactClientConfig, TlsRoots};
pub use transport::HttpOapiTransport;
