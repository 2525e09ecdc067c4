//! Repository traits defining interfaces for data persistence.

mod embedding_store;
mod individual_repository;
mod report_repository;
mod verification_log_repository;

pub use embedding_store::*;
pub use individual_repository::*;
pub use report_repository::*;
pub use verification_log_repository::*;
