//! DingTalk contact directory SDK
//!
//! This crate provides the public contract for the contact directory
//! binding: the API trait, the transport seam it is built on, the wire
//! models and the error type.
//!
//! ## API Traits
//!
//! - `ContactApi` - one method per directory endpoint
//! - `OapiTransport` - RPC invoker the binding delegates to
//!
//! ## Usage
//!
//! ```ignore
//! use contact_sdk::ContactApi;
//!
//! let department = client.department_detail(5).await?;
//! let members = client.user_list(department.id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod envelope;
pub mod error;
pub mod models;
pub mod transport;

pub use api::ContactApi;
pub use envelope::{Envelope, OapiResponse, check_envelope};
pub use error::ContactError;
pub use models::{
    AuthOrgScopes, AuthScopes, Department, DepartmentList, User, UserList,
};
pub use transport::OapiTransport;
