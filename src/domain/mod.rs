//! Domain Layer
//!
//! Asset requests, resolutions, errors and the ports backends implement.
//! Nothing here performs I/O.

pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{
    RegistryEntry, RegistryQuery, RegistryResolution, Resolvable, SceneMetadata, SceneRequest,
    SceneResolution,
};
pub use error::{AssetError, AssetResult};
pub use value_objects::{BackendName, Endpoint, EndpointHandle};
