pub mod loader;
pub mod payload;

pub use loader::{fetch_payload, load_sequence, SourceLocation, DEFAULT_SOURCE};
pub use payload::{parse_envelope, sample_records, FeedPayload};
