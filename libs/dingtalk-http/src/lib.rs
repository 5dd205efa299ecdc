#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP client infrastructure for the DingTalk open API bindings
//!
//! This crate provides a hyper-based HTTP client with:
//! - Automatic TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - A per-request timeout
//! - User-Agent header injection
//! - Query-string composition from serde values
//! - Transparent response decompression (gzip, brotli, deflate)
//!
//! There are no retry, redirect or rate-limit layers. Each request is sent
//! once and failures are reported to the caller as-is.
//!
//! # Example
//!
//! ```ignore
//! use dingtalk_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("my-app/1.0")
//!     .build()?;
//!
//! let data: serde_json::Value = client
//!     .get("https://oapi.dingtalk.com/department/list")
//!     .query(&[("access_token", token)])?
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod layers;
mod request;
mod response;
pub mod security;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, TlsRootConfig, TransportSecurity};
pub use error::{HttpError, InvalidUriKind};
pub use layers::{UserAgentLayer, UserAgentService};
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
