//! Core types and trait definitions for the Haven wellness tracker.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::KeyValueStore`]; model clients
//! implement [`analysis::Analyzer`]. The domain operations in [`service`]
//! are written against those two seams only.

pub mod analysis;
pub mod catalog;
pub mod error;
pub mod mood;
pub mod scoring;
pub mod service;
pub mod store;
pub mod user;

pub use error::{Error, Result};
pub use service::Haven;

#[cfg(test)]
pub(crate) mod testing;
