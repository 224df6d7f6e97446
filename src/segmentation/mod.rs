pub mod algorithm;
pub mod config;

pub use algorithm::{segment_messages, split_fragments, RawRecord};
pub use config::SegmentationConfig;
