//! Shipped LLM drivers.

pub mod openai;

pub use openai::OpenAIDriver;
