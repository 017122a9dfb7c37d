//! Application Layer
//!
//! Use cases orchestrating the domain ports.

pub mod backend_registry;

pub use backend_registry::{
    cloud_backend, get_backend, get_current_backend, global, local_backend, privileged_backend,
    BackendFactory, BackendRegistry,
};
