//! # kuvert-observability
//!
//! Structured Logging via tracing-subscriber (Text oder JSON).
//! Logs gehen nach stderr, stdout bleibt fuer Nutzdaten frei.

pub mod logging;

pub use logging::{log_format_gueltig, log_level_gueltig, logging_initialisieren};
