//! # Domain Layer
//!
//! Core registry models, the error taxonomy, repository traits and the
//! matching policies. Independent of storage and transport.

mod error;
pub mod models;
pub mod repositories;
pub mod services;

pub use error::*;
pub use models::*;
pub use repositories::*;
pub use services::*;
