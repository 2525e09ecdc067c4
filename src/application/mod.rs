//! # Application Layer
//!
//! Use cases coordinating the matching policies with storage and the
//! external nose-print model.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
