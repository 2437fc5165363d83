//! Memory substrate for the Engram agent.
//!
//! Provides a single [`MemoryStore`] over four collections:
//! - **Semantic** (facts): append-only, persisted to `facts_semantic.json`
//! - **Episodic** (conversations): append-only, persisted to `conversations_episodic.json`
//! - **Procedural** (procedures): keyed by name, persisted to `procedures.json`
//! - **Working memory**: volatile, capacity-bounded, importance-ranked
//!
//! Persistence is deliberately simple: each mutating call rewrites the whole
//! backing file. A missing or corrupt file loads as an empty collection.

pub mod store;
pub mod working;

pub use store::MemoryStore;
pub use working::WorkingMemory;
