//! Read-only memory visualizer.
//!
//! Loads the persisted JSON files directly (never through a live store) and
//! renders them for human inspection. Missing or corrupt files render an
//! "empty" notice rather than an error — this is a debugging tool, and the
//! store itself treats those files the same way.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use engram_memory::store::{CONVERSATIONS_FILE, FACTS_FILE, PROCEDURES_FILE};
use engram_types::memory::{ConversationTurn, Fact, Procedure};
use serde::de::DeserializeOwned;

use crate::table::Table;

/// Read-only reporting over a memory directory.
pub struct MemoryVisualizer {
    memory_dir: PathBuf,
}

impl MemoryVisualizer {
    /// Create a visualizer for the given memory directory.
    pub fn new(memory_dir: impl Into<PathBuf>) -> Self {
        Self {
            memory_dir: memory_dir.into(),
        }
    }

    /// Render semantic memory (facts) as a table.
    pub fn render_facts(&self) -> String {
        let facts: Option<Vec<Fact>> = load_lenient(&self.memory_dir.join(FACTS_FILE));
        let mut out = String::from("=== SEMANTIC MEMORY (Facts) ===\n");
        match facts {
            Some(facts) if !facts.is_empty() => {
                let mut table = Table::new(&["#", "Content", "Category", "Created"]);
                for (i, fact) in facts.iter().enumerate() {
                    table.add_row(&[
                        &(i + 1).to_string(),
                        &fact.content,
                        fact.category.as_deref().unwrap_or(""),
                        &short_time(fact.timestamp),
                    ]);
                }
                out.push_str(&table.render());
            }
            _ => out.push_str("Semantic memory is empty or could not be loaded."),
        }
        out
    }

    /// Render episodic memory (conversations), newest first, bounded by `limit`.
    pub fn render_conversations(&self, limit: usize) -> String {
        let turns: Option<Vec<ConversationTurn>> =
            load_lenient(&self.memory_dir.join(CONVERSATIONS_FILE));
        let mut out = String::from("=== EPISODIC MEMORY (Conversations) ===\n");
        match turns {
            Some(mut turns) if !turns.is_empty() => {
                turns.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
                for (i, turn) in turns.iter().take(limit).enumerate() {
                    out.push_str(&format!(
                        "\n--- Conversation {} - {} ---\n",
                        i + 1,
                        short_time(turn.timestamp)
                    ));
                    out.push_str(&format!("User: {}\n", turn.user_message));
                    out.push_str(&format!("Agent: {}\n", turn.agent_response));
                }
            }
            _ => out.push_str("Episodic memory is empty or could not be loaded."),
        }
        out
    }

    /// Render procedural memory as numbered-step blocks.
    pub fn render_procedures(&self) -> String {
        let procedures: Option<BTreeMap<String, Procedure>> =
            load_lenient(&self.memory_dir.join(PROCEDURES_FILE));
        let mut out = String::from("=== PROCEDURAL MEMORY (Procedures) ===\n");
        match procedures {
            Some(procedures) if !procedures.is_empty() => {
                for (i, (name, proc)) in procedures.iter().enumerate() {
                    out.push_str(&format!("\n--- Procedure {}: {name} ---\n", i + 1));
                    if let Some(desc) = &proc.description {
                        out.push_str(&format!("Description: {desc}\n"));
                    }
                    out.push_str("Steps:\n");
                    for (j, step) in proc.steps.iter().enumerate() {
                        out.push_str(&format!("  {}. {step}\n", j + 1));
                    }
                    out.push_str(&format!("Usage count: {}\n", proc.usage_count));
                    if let Some(last_used) = proc.last_used {
                        out.push_str(&format!("Last used: {}\n", short_time(last_used)));
                    }
                }
            }
            _ => out.push_str("Procedural memory is empty or could not be loaded."),
        }
        out
    }

    /// Render every collection, with a reminder that working memory is
    /// volatile and has no file to show.
    pub fn render_all(&self, conversation_limit: usize) -> String {
        format!(
            "======= AGENT MEMORY =======\nMemory directory: {}\n\n{}\n\n{}\n\n{}\n\n\
             Note: Working memory is volatile and only exists in RAM during runtime.",
            self.memory_dir.display(),
            self.render_facts(),
            self.render_procedures(),
            self.render_conversations(conversation_limit),
        )
    }
}

/// Load a JSON file, returning `None` on missing, unreadable, or corrupt
/// content.
fn load_lenient<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn short_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_memory::MemoryStore;

    #[test]
    fn test_renders_what_the_store_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::open(dir.path()).unwrap();
        store
            .add_fact("tea has caffeine", Some("food".into()))
            .unwrap();
        store
            .add_procedure(
                "Brew Tea",
                vec!["boil water".into(), "steep".into()],
                Some("hot drink".into()),
            )
            .unwrap();
        store.add_conversation("hi", "hello", None).unwrap();

        let viz = MemoryVisualizer::new(dir.path());

        let facts = viz.render_facts();
        assert!(facts.contains("tea has caffeine"));
        assert!(facts.contains("food"));

        let procs = viz.render_procedures();
        assert!(procs.contains("Procedure 1: Brew Tea"));
        assert!(procs.contains("Description: hot drink"));
        assert!(procs.contains("  1. boil water"));
        assert!(procs.contains("Usage count: 0"));

        let convs = viz.render_conversations(10);
        assert!(convs.contains("User: hi"));
        assert!(convs.contains("Agent: hello"));
    }

    #[test]
    fn test_empty_directory_renders_notices() {
        let dir = tempfile::tempdir().unwrap();
        let viz = MemoryVisualizer::new(dir.path());
        assert!(viz.render_facts().contains("empty or could not be loaded"));
        assert!(viz
            .render_conversations(5)
            .contains("empty or could not be loaded"));
        assert!(viz
            .render_procedures()
            .contains("empty or could not be loaded"));
    }

    #[test]
    fn test_corrupt_file_renders_notice_not_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FACTS_FILE), "{broken").unwrap();
        let viz = MemoryVisualizer::new(dir.path());
        assert!(viz.render_facts().contains("empty or could not be loaded"));
    }

    #[test]
    fn test_conversation_limit_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::open(dir.path()).unwrap();
        for i in 0..5 {
            store
                .add_conversation(&format!("q{i}"), &format!("a{i}"), None)
                .unwrap();
        }

        let viz = MemoryVisualizer::new(dir.path());
        let out = viz.render_conversations(2);
        // Newest two only
        assert!(out.contains("User: q4"));
        assert!(out.contains("User: q3"));
        assert!(!out.contains("User: q0"));
    }
}
