//! MDP data sources used to populate bound fields at render time.
//!
//! Modules:
//! - `null`: No-op source for deployments without MDP access and for tests
//! - `static_source`: Serves payloads fetched ahead of time (files, fixtures)
//!
//! The HTTP client that talks to the MDP lives outside this crate; it only
//! needs to implement [`MdpSource`].

mod null;
mod static_source;

pub use null::NullSource;
pub use static_source::StaticSource;

use serde_json::Value;
use thiserror::Error;

/// Failure to obtain an MDP record. Callers treat every variant as "no data".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("MDP source is unavailable")]
    Unavailable,

    #[error("{resource} '{id}' was not found")]
    NotFound { resource: String, id: String },

    #[error("MDP request failed: {message}")]
    Transport { message: String },
}

impl FetchError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }
}

/// Fetches JSON:API documents (`{ data, included }`) from the MDP.
pub trait MdpSource: Send + Sync {
    fn fetch_person_profile(&self, person_uuid: &str, includes: &[String]) -> Result<Value, FetchError>;
    fn fetch_organization(&self, organization_uuid: &str, includes: &[String]) -> Result<Value, FetchError>;
}
