//! # Connector Layer
//!
//! External integrations implementing the domain ports:
//! - Storage (DuckDB on disk, in-memory for tests and demos)
//! - Nose-print model (remote HTTP endpoint, synthetic stand-in for demos)
//! - CLI wiring (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::{Container, ContainerConfig, Router};
