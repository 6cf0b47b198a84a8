//! Time-evicted on-disk artifact cache
//!
//! Tracks rendered artifacts (input documents and their outputs) in an
//! in-memory registry keyed by path, stores them in a cache directory, and
//! reclaims them with a periodic eviction sweep once they outlive the
//! retention window.

mod error;
mod eviction;
mod key;
mod registry;
mod store;
mod types;

pub use error::{CacheError, Result};
pub use eviction::EvictionLoop;
pub use key::ArtifactKey;
pub use registry::{CacheRegistry, RegistryGuard};
pub use store::ArtifactStore;
pub use types::{ArtifactPair, EvictionConfig, RegistryEntry, SweepReport};
