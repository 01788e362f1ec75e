//! Core types for Sift: the signal/bead data model, the stable bead-ID
//! function and the LLM completion seam consumed by `sift-analysis`.

pub mod config;
pub mod error;
pub mod id;
pub mod llm;
pub mod model;

pub use error::CoreError;
pub use id::{resolve_signal_ref, signal_id, signal_ref, DEFAULT_ID_PREFIX};
