mod dashboard_stats;
mod delete_individual;
mod list_individuals;
mod nose_print_reader;
mod register_individual;
mod reports;
mod transfer_ownership;
mod verification_history;
mod verify_by_tag;
mod verify_individual;

pub use dashboard_stats::*;
pub use delete_individual::*;
pub use list_individuals::*;
pub use nose_print_reader::*;
pub use register_individual::*;
pub use reports::*;
pub use transfer_ownership::*;
pub use verification_history::*;
pub use verify_by_tag::*;
pub use verify_individual::*;
