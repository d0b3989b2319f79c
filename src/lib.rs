//! Character memory extraction from narrative text.
//!
//! Pensieve reads a directory of books, splits each into paragraphs, tags the
//! people, places, things, times and activities of every paragraph, and
//! collects the paragraphs where a chosen character is dense enough to count
//! as one of that character's memories. Each memory carries the other people
//! in the scene, the setting, the leading verbs, an emotion profile, and
//! optionally an illustrative image.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`corpus`]: Segmentation, annotation, per-document aggregation, and filtering
//! - [`memory`]: Memory record construction and JSON export
//! - [`mood`]: Per-paragraph emotion tables
//! - [`images`]: Image search providers
//! - [`nlp`]: The linguistic analysis capability and its built-in analyzer

pub mod config;
pub mod corpus;
pub mod error;
pub mod images;
pub mod memory;
pub mod mood;
pub mod nlp;

pub use error::{PensieveError, Result};
