//! Matching and registration policies built on the repository traits.

mod duplicate_guard;
mod match_engine;
mod tag_generator;
mod verification_policy;

pub use duplicate_guard::*;
pub use match_engine::*;
pub use tag_generator::*;
pub use verification_policy::*;
