//! Memory records: construction from paragraphs and JSON export.

pub mod builder;
pub mod export;
pub mod types;

pub use builder::MemoryBuilder;
pub use types::{MemoryRecord, MoodWeights};
