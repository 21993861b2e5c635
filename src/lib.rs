//! Bird Buddy sighting processing.
//!
//! Parses a postcard sighting event, matches its photos to the birds that were identified,
//! and renders the result as an automation report plus chat message blocks.

pub mod blocks;
pub mod config;
pub mod error;
pub mod formatter;
pub mod lookup;
pub mod models;
pub mod processor;
pub mod render;
pub mod token;
pub mod validate;

pub use error::{EnrichmentLookupError, Error, Result, TokenDecodeError, ValidationError};
pub use formatter::{build_report, ReportFormatter};
pub use processor::{EventProcessor, ProcessedEvent, EMIT_EVENT_NAME, LISTEN_EVENT_NAME};
