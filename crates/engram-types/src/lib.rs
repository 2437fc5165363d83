//! Core types and traits for the Engram agent memory substrate.
//!
//! Shared across the workspace: the persisted memory data model, the
//! top-level error type, and the configuration layer.

pub mod config;
pub mod error;
pub mod memory;
