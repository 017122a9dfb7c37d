//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of a pluggable asset backend.
///
/// The set is closed: adding a backend means adding a variant here and a
/// constructor in the registry factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendName {
    /// Filesystem root on the local machine
    Local,
    /// Remote HTTP asset store
    Cloud,
    /// External catalogue reachable only with privileged access
    Privileged,
}

impl BackendName {
    /// Every valid backend, in declaration order.
    pub const ALL: [BackendName; 3] = [Self::Local, Self::Cloud, Self::Privileged];

    /// Parse a backend name.
    ///
    /// # Examples
    /// ```
    /// use ngine_assets::BackendName;
    ///
    /// assert_eq!(BackendName::parse("cloud"), Some(BackendName::Cloud));
    /// assert_eq!(BackendName::parse(" Local "), Some(BackendName::Local));
    /// assert_eq!(BackendName::parse("s3"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "cloud" => Some(Self::Cloud),
            "privileged" => Some(Self::Privileged),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
            Self::Privileged => "privileged",
        }
    }

    /// String forms of [`BackendName::ALL`].
    pub fn valid_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|n| n.as_str()).collect()
    }
}

impl Default for BackendName {
    fn default() -> Self {
        // Needs neither network nor catalogue access.
        Self::Local
    }
}

impl std::fmt::Display for BackendName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something that owns a mutable host field, such as a catalogue client.
pub trait EndpointHandle: Send + Sync {
    fn host(&self) -> String;
    fn set_host(&self, host: &str);
}

/// Endpoint of an external service.
///
/// Either a bare host string owned by whoever holds the endpoint, or a handle
/// whose host lives inside another object and is changed in place.
#[derive(Clone)]
pub enum Endpoint {
    Plain(String),
    Handle(Arc<dyn EndpointHandle>),
}

impl Endpoint {
    /// Current host of this endpoint.
    pub fn host(&self) -> String {
        match self {
            Self::Plain(host) => host.clone(),
            Self::Handle(handle) => handle.host(),
        }
    }

    /// Point this endpoint at a new host.
    ///
    /// A plain endpoint is rebound to a new string; a handle is mutated.
    pub fn set_host(&mut self, host: &str) {
        match self {
            Self::Plain(current) => *current = host.to_string(),
            Self::Handle(handle) => handle.set_host(host),
        }
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(host) => f.debug_tuple("Plain").field(host).finish(),
            Self::Handle(handle) => f.debug_tuple("Handle").field(&handle.host()).finish(),
        }
    }
}
