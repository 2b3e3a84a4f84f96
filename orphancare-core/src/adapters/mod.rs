//! Adapter implementations
//!
//! Adapters implement the port traits and external I/O with concrete
//! technologies:
//! - JSON file (locked, atomically replaced) for the CredentialStore port
//! - In-memory map for the CredentialStore port (tests, embedders)
//! - reqwest client for the OrphanCare HTTP API
//! - Demo statistics for the dashboard fallback

pub mod demo;
pub mod file_store;
pub mod http;
pub mod memory_store;
