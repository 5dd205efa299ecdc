//! Tower layers for HTTP client middleware
//!
//! - [`UserAgentLayer`] - Adds User-Agent header to all requests

mod user_agent;

pub use user_agent::{UserAgentLayer, UserAgentService};
