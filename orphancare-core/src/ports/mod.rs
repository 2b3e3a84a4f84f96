//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The session and
//! request logic depend only on these traits, not on concrete storage.

mod credential_store;

pub use credential_store::{keys, CredentialStore};
