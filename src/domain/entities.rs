//! Domain Entities - Core business objects
//!
//! Requests and resolutions exchanged between callers and asset backends.
//! They carry no I/O and no backend-specific state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request for a scene (floorplan) asset inside a backend namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRequest {
    /// Namespace the scene lives under (e.g. "kitchen")
    pub backend_namespace: String,
    /// Scene identifier within the namespace
    pub scene_id: String,
    /// Optional layout variant
    pub layout_id: Option<u32>,
    /// Optional style variant (only meaningful together with a layout)
    pub style_id: Option<u32>,
    /// Optional asset version
    pub version: Option<String>,
}

impl SceneRequest {
    pub fn new(backend_namespace: impl Into<String>, scene_id: impl Into<String>) -> Self {
        Self {
            backend_namespace: backend_namespace.into(),
            scene_id: scene_id.into(),
            ..Default::default()
        }
    }

    pub fn layout_id(mut self, layout_id: u32) -> Self {
        self.layout_id = Some(layout_id);
        self
    }

    pub fn style_id(mut self, style_id: u32) -> Self {
        self.style_id = Some(style_id);
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Metadata echoed back with a resolved scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Namespace the scene was resolved in
    pub scene: String,
    pub layout_id: Option<u32>,
    pub style_id: Option<u32>,
    pub version_id: Option<String>,
}

impl From<&SceneRequest> for SceneMetadata {
    fn from(request: &SceneRequest) -> Self {
        Self {
            scene: request.backend_namespace.clone(),
            layout_id: request.layout_id,
            style_id: request.style_id,
            version_id: request.version.clone(),
        }
    }
}

/// A resolved scene: where it is, and what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneResolution {
    /// Filesystem path or URL
    pub location: String,
    pub metadata: SceneMetadata,
}

/// Two-phase result of a resolution.
///
/// The backend has already validated the location when it hands out a
/// `Resolvable`; the value itself is only built when [`Resolvable::result`]
/// is called.
pub struct Resolvable<T> {
    inner: ResolvableInner<T>,
}

enum ResolvableInner<T> {
    Ready(T),
    Deferred(Box<dyn FnOnce() -> T + Send>),
}

impl<T> Resolvable<T> {
    /// Wrap an already materialized value.
    pub fn ready(value: T) -> Self {
        Self {
            inner: ResolvableInner::Ready(value),
        }
    }

    /// Defer building the value until it is requested.
    pub fn deferred<F>(build: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            inner: ResolvableInner::Deferred(Box::new(build)),
        }
    }

    /// Whether the value has already been materialized.
    pub fn is_ready(&self) -> bool {
        matches!(self.inner, ResolvableInner::Ready(_))
    }

    /// Materialize the resolved value.
    pub fn result(self) -> T {
        match self.inner {
            ResolvableInner::Ready(value) => value,
            ResolvableInner::Deferred(build) => build(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Resolvable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            ResolvableInner::Ready(value) => f.debug_tuple("Resolvable::Ready").field(value).finish(),
            ResolvableInner::Deferred(_) => f.write_str("Resolvable::Deferred"),
        }
    }
}

/// Request for an asset looked up by catalogue metadata.
///
/// Only `asset_type` and `source` are understood by every backend; the
/// remaining filters are consumed by the privileged catalogue and ignored
/// elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryQuery {
    pub asset_type: String,
    pub source: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub registry_names: Vec<String>,
    #[serde(default)]
    pub exclude_registry_names: Vec<String>,
    /// Equality filters
    #[serde(default)]
    pub eqs: Option<Map<String, Value>>,
    /// Containment filters
    #[serde(default)]
    pub contains: Option<Map<String, Value>>,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl RegistryQuery {
    pub fn new(asset_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            asset_type: asset_type.into(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn registry_names(mut self, names: Vec<String>) -> Self {
        self.registry_names = names;
        self
    }

    pub fn exclude_registry_names(mut self, names: Vec<String>) -> Self {
        self.exclude_registry_names = names;
        self
    }

    pub fn eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.eqs
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn contains(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.contains
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }
}

/// Uniform result of a catalogue lookup, whatever the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryResolution {
    /// Filesystem path or URL
    pub location: String,
    pub source: String,
    /// Backend-specific extras; absent for local and cloud
    #[serde(default)]
    pub extra_info: Option<Value>,
}

impl RegistryResolution {
    pub fn new(location: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            source: source.into(),
            extra_info: None,
        }
    }

    pub fn into_tuple(self) -> (String, String, Option<Value>) {
        (self.location, self.source, self.extra_info)
    }
}

/// One entry of a backend catalogue listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    #[serde(default)]
    pub registry_type: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}
