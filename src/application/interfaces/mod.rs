mod embedding_extractor;
mod nose_detector;

pub use embedding_extractor::*;
pub use nose_detector::*;
