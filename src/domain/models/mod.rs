mod embedding;
mod individual;
mod match_result;
mod report;
mod thresholds;
mod verification;

pub use embedding::*;
pub use individual::*;
pub use match_result::*;
pub use report::*;
pub use thresholds::*;
pub use verification::*;

pub(crate) fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
