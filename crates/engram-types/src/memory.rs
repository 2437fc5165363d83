//! Memory data model: facts, procedures, conversation turns, and the
//! volatile working-memory item.
//!
//! These structs define the on-disk JSON layout, which is a compatibility
//! contract: `facts_semantic.json` and `conversations_episodic.json` are
//! arrays, `procedures.json` is an object keyed by procedure name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A standalone factual statement in semantic memory.
///
/// Append-only: facts are never mutated or deleted in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// The textual content of the fact.
    pub content: String,
    /// Optional category label.
    pub category: Option<String>,
    /// When the fact was learned.
    pub timestamp: DateTime<Utc>,
}

impl Fact {
    /// Create a fact stamped with the current time.
    pub fn new(content: impl Into<String>, category: Option<String>) -> Self {
        Self {
            content: content.into(),
            category,
            timestamp: Utc::now(),
        }
    }
}

/// A named, ordered instruction sequence in procedural memory.
///
/// Keyed by `name`; a later add with the same name overwrites the earlier
/// procedure wholesale (no merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    /// Unique name (the map key, duplicated here for self-contained records).
    pub name: String,
    /// Ordered steps.
    pub steps: Vec<String>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// When the procedure was (last) stored.
    pub timestamp: DateTime<Utc>,
    /// How many times the procedure has been used.
    pub usage_count: u64,
    /// When the procedure was last used, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Procedure {
    /// Create a procedure with a zero usage count, stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        steps: Vec<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            steps,
            description,
            timestamp: Utc::now(),
            usage_count: 0,
            last_used: None,
        }
    }

    /// The text that procedure search matches against: `name + " " + description`.
    pub fn search_text(&self) -> String {
        format!(
            "{} {}",
            self.name,
            self.description.as_deref().unwrap_or_default()
        )
    }
}

/// One user/agent exchange in episodic memory.
///
/// Append-only; insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the user said.
    pub user_message: String,
    /// What the agent answered.
    pub agent_response: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
    /// Open metadata mapping.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ConversationTurn {
    /// Create a turn stamped with the current time.
    pub fn new(
        user_message: impl Into<String>,
        agent_response: impl Into<String>,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            agent_response: agent_response.into(),
            timestamp: Utc::now(),
            metadata: metadata.unwrap_or_default(),
        }
    }
}

/// A transient item in the working-memory buffer.
///
/// Never persisted; lives only for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingMemoryItem {
    /// The textual content.
    pub content: String,
    /// Relevance score used for eviction and context ordering.
    pub importance: f64,
    /// When the item was inserted.
    pub timestamp: DateTime<Utc>,
}

impl WorkingMemoryItem {
    /// Create an item stamped with the current time.
    pub fn new(content: impl Into<String>, importance: f64) -> Self {
        Self {
            content: content.into(),
            importance,
            timestamp: Utc::now(),
        }
    }

    /// Total order on `(importance, timestamp)`: lower importance ranks
    /// lower, ties broken by older timestamp first.
    pub fn rank_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.importance
            .total_cmp(&other.importance)
            .then_with(|| self.timestamp.cmp(&other.timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_serialization_round_trip() {
        let fact = Fact::new("Rust has no garbage collector", Some("programming".into()));
        let json = serde_json::to_string(&fact).unwrap();
        let back: Fact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fact);
    }

    #[test]
    fn test_conversation_turn_defaults_metadata() {
        // metadata is optional in the persisted format
        let json = r#"{
            "user_message": "hi",
            "agent_response": "hello",
            "timestamp": "2025-01-01T00:00:00Z"
        }"#;
        let turn: ConversationTurn = serde_json::from_str(json).unwrap();
        assert!(turn.metadata.is_empty());
    }

    #[test]
    fn test_procedure_search_text() {
        let proc = Procedure::new("Bake Cake", vec!["mix".into()], Some("oven steps".into()));
        assert_eq!(proc.search_text(), "Bake Cake oven steps");

        let bare = Procedure::new("Deploy", vec![], None);
        assert_eq!(bare.search_text(), "Deploy ");
    }

    #[test]
    fn test_procedure_last_used_not_serialized_when_none() {
        let proc = Procedure::new("X", vec![], None);
        let json = serde_json::to_string(&proc).unwrap();
        assert!(!json.contains("last_used"));
    }

    #[test]
    fn test_working_memory_rank_order() {
        let low = WorkingMemoryItem::new("low", 0.5);
        let high = WorkingMemoryItem::new("high", 0.9);
        assert_eq!(low.rank_cmp(&high), std::cmp::Ordering::Less);

        // Same importance: the older item ranks lower
        let older = WorkingMemoryItem {
            content: "older".into(),
            importance: 1.0,
            timestamp: Utc::now() - chrono::Duration::seconds(10),
        };
        let newer = WorkingMemoryItem::new("newer", 1.0);
        assert_eq!(older.rank_cmp(&newer), std::cmp::Ordering::Less);
    }
}
