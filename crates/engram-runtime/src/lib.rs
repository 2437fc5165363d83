//! Agent runtime for Engram.
//!
//! Owns the external LLM boundary (the [`llm_driver::LlmDriver`] trait and
//! the shipped OpenAI-compatible driver) and the [`agent::Agent`]
//! orchestrator that wires user turns through the memory store.

pub mod agent;
pub mod command;
pub mod drivers;
pub mod llm_driver;

pub use agent::Agent;
pub use command::Command;
