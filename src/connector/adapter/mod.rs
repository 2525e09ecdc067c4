mod duckdb_embedding_store;
mod duckdb_registry_repository;
mod in_memory_registry;
mod remote_model_client;
mod synthetic_extractor;

pub use duckdb_embedding_store::*;
pub use duckdb_registry_repository::*;
pub use in_memory_registry::*;
pub use remote_model_client::*;
pub use synthetic_extractor::*;
