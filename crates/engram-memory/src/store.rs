//! File-backed memory store: facts, procedures, conversations, plus the
//! volatile working-memory buffer.
//!
//! Each mutating call rewrites the affected collection's file in full. Load
//! failures (missing or corrupt file) fall back to an empty collection;
//! write failures propagate to the caller.

use engram_types::error::{EngramError, EngramResult};
use engram_types::memory::{ConversationTurn, Fact, Procedure, WorkingMemoryItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::working::{WorkingMemory, DEFAULT_CAPACITY};

/// Backing file for semantic memory (facts).
pub const FACTS_FILE: &str = "facts_semantic.json";
/// Backing file for episodic memory (conversations).
pub const CONVERSATIONS_FILE: &str = "conversations_episodic.json";
/// Backing file for procedural memory.
pub const PROCEDURES_FILE: &str = "procedures.json";

/// How many recent turns the LLM context includes.
const CONTEXT_RECENT_TURNS: usize = 3;
/// How many matching facts the LLM context includes.
const CONTEXT_FACT_LIMIT: usize = 3;
/// How many matching procedures the LLM context includes.
const CONTEXT_PROCEDURE_LIMIT: usize = 2;

/// Durable-ish storage and naive relevance search over an agent's memory.
///
/// Single-owner: mutation goes through `&mut self`, which makes the
/// single-writer assumption a compile-time property. Callers that need
/// concurrent access must wrap the store in their own lock.
pub struct MemoryStore {
    dir: PathBuf,
    facts: Vec<Fact>,
    procedures: BTreeMap<String, Procedure>,
    conversations: Vec<ConversationTurn>,
    working: WorkingMemory,
}

impl MemoryStore {
    /// Open a store rooted at `dir` with the default working-memory capacity.
    pub fn open(dir: impl Into<PathBuf>) -> EngramResult<Self> {
        Self::open_with_capacity(dir, DEFAULT_CAPACITY)
    }

    /// Open a store rooted at `dir`, creating the directory if needed and
    /// loading the three persisted collections.
    pub fn open_with_capacity(dir: impl Into<PathBuf>, capacity: usize) -> EngramResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let facts: Vec<Fact> = load_collection(&dir.join(FACTS_FILE));
        let procedures: BTreeMap<String, Procedure> =
            load_collection(&dir.join(PROCEDURES_FILE));
        let conversations: Vec<ConversationTurn> =
            load_collection(&dir.join(CONVERSATIONS_FILE));
        debug!(
            dir = %dir.display(),
            facts = facts.len(),
            procedures = procedures.len(),
            conversations = conversations.len(),
            "Opened memory store"
        );

        Ok(Self {
            dir,
            facts,
            procedures,
            conversations,
            working: WorkingMemory::new(capacity),
        })
    }

    /// Directory holding the persisted files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // -- Semantic memory --

    /// Append a fact and persist the facts collection.
    pub fn add_fact(&mut self, content: &str, category: Option<String>) -> EngramResult<()> {
        self.facts.push(Fact::new(content, category));
        save_collection(&self.dir.join(FACTS_FILE), &self.facts)
    }

    /// All facts in insertion order.
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Keyword search over facts.
    ///
    /// The query is lower-cased and split on whitespace; each fact scores
    /// one point per query term that occurs as a substring of its
    /// lower-cased content. Zero-score facts are dropped, the rest sorted
    /// by descending score (stable, so insertion order holds among ties).
    pub fn search_facts(&self, query: &str, limit: usize) -> Vec<&Fact> {
        rank_by_term_count(self.facts.iter(), query, limit, |fact| {
            fact.content.to_lowercase()
        })
    }

    // -- Procedural memory --

    /// Insert or overwrite the procedure keyed by `name` and persist.
    ///
    /// Overwrite is wholesale: the usage count resets to zero.
    pub fn add_procedure(
        &mut self,
        name: &str,
        steps: Vec<String>,
        description: Option<String>,
    ) -> EngramResult<()> {
        self.procedures
            .insert(name.to_string(), Procedure::new(name, steps, description));
        save_collection(&self.dir.join(PROCEDURES_FILE), &self.procedures)
    }

    /// All procedures, keyed by name.
    pub fn procedures(&self) -> &BTreeMap<String, Procedure> {
        &self.procedures
    }

    /// Substring search over procedures.
    ///
    /// Unlike fact search this does NOT tokenize: the entire lower-cased
    /// query must appear as one substring of `name + " " + description`.
    /// Matches are sorted by descending usage count. The asymmetry with
    /// [`search_facts`](Self::search_facts) is documented behavior.
    pub fn search_procedures(&self, query: &str, limit: usize) -> Vec<&Procedure> {
        let needle = query.to_lowercase();
        let mut matches: Vec<&Procedure> = self
            .procedures
            .values()
            .filter(|proc| proc.search_text().to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        matches.truncate(limit);
        matches
    }

    /// Record a use of the named procedure: bump its usage count, stamp
    /// `last_used`, persist. Unknown names are an error.
    pub fn record_procedure_use(&mut self, name: &str) -> EngramResult<()> {
        let proc = self
            .procedures
            .get_mut(name)
            .ok_or_else(|| EngramError::ProcedureNotFound(name.to_string()))?;
        proc.usage_count += 1;
        proc.last_used = Some(chrono::Utc::now());
        save_collection(&self.dir.join(PROCEDURES_FILE), &self.procedures)
    }

    // -- Episodic memory --

    /// Append a conversation turn, persist, and mirror both sides into
    /// working memory (user at importance 1.0, agent at 0.9).
    pub fn add_conversation(
        &mut self,
        user_message: &str,
        agent_response: &str,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> EngramResult<()> {
        self.conversations
            .push(ConversationTurn::new(user_message, agent_response, metadata));
        save_collection(&self.dir.join(CONVERSATIONS_FILE), &self.conversations)?;

        self.add_to_working_memory(&format!("User: {user_message}"), 1.0);
        self.add_to_working_memory(&format!("Agent: {agent_response}"), 0.9);
        Ok(())
    }

    /// All conversation turns in insertion (chronological) order.
    pub fn conversations(&self) -> &[ConversationTurn] {
        &self.conversations
    }

    /// Keyword search over conversations, scoring the concatenation of the
    /// user message and agent response. Same rules as fact search.
    pub fn search_conversations(&self, query: &str, limit: usize) -> Vec<&ConversationTurn> {
        rank_by_term_count(self.conversations.iter(), query, limit, |turn| {
            format!("{} {}", turn.user_message, turn.agent_response).to_lowercase()
        })
    }

    /// The last `count` turns, oldest-first, or everything if fewer exist.
    pub fn get_recent_conversations(&self, count: usize) -> &[ConversationTurn] {
        let start = self.conversations.len().saturating_sub(count);
        &self.conversations[start..]
    }

    // -- Working memory --

    /// Insert into the volatile buffer; never touches persisted storage.
    pub fn add_to_working_memory(&mut self, content: &str, importance: f64) {
        self.working.insert(WorkingMemoryItem::new(content, importance));
    }

    /// The working-memory buffer.
    pub fn working_memory(&self) -> &WorkingMemory {
        &self.working
    }

    // -- Context assembly --

    /// Build the memory context block for an LLM prompt.
    ///
    /// Pure formatting over the current collections; no side effects.
    pub fn generate_context_for_llm(&self, current_message: &str) -> String {
        let working_memory_text = self
            .working
            .ranked_desc()
            .iter()
            .map(|item| format!("- {}", item.content))
            .collect::<Vec<_>>()
            .join("\n");

        let recent_text = self
            .get_recent_conversations(CONTEXT_RECENT_TURNS)
            .iter()
            .map(|turn| format!("User: {}\nAgent: {}", turn.user_message, turn.agent_response))
            .collect::<Vec<_>>()
            .join("\n");

        let facts_text = self
            .search_facts(current_message, CONTEXT_FACT_LIMIT)
            .iter()
            .map(|fact| format!("- {}", fact.content))
            .collect::<Vec<_>>()
            .join("\n");

        let mut procedures_text = String::new();
        for proc in self.search_procedures(current_message, CONTEXT_PROCEDURE_LIMIT) {
            let steps = proc
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("  {}. {step}", i + 1))
                .collect::<Vec<_>>()
                .join("\n");
            procedures_text.push_str(&format!("Procedure: {}\n{steps}\n\n", proc.name));
        }

        format!(
            "### Current Context (Working Memory):\n{working_memory_text}\n\n\
             ### Recent Conversation History:\n{recent_text}\n\n\
             ### Relevant Facts from Memory:\n{facts_text}\n\n\
             ### Relevant Procedures:\n{procedures_text}"
        )
        .trim()
        .to_string()
    }
}

/// Score items by the number of query terms occurring as substrings of the
/// item's lower-cased text, keep non-zero scores, stable-sort descending,
/// return the top `limit`.
fn rank_by_term_count<'a, T>(
    items: impl Iterator<Item = &'a T>,
    query: &str,
    limit: usize,
    text_of: impl Fn(&T) -> String,
) -> Vec<&'a T> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();

    let mut scored: Vec<(&T, usize)> = items
        .filter_map(|item| {
            let text = text_of(item);
            let score = terms.iter().filter(|term| text.contains(**term)).count();
            (score > 0).then_some((item, score))
        })
        .collect();

    // sort_by is stable, so equal scores keep insertion order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(limit);
    scored.into_iter().map(|(item, _)| item).collect()
}

/// Load a collection from a JSON file. Missing or unparsable files yield
/// the empty default; this is the accepted corrupt-file behavior.
fn load_collection<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %path.display(),
                    "Corrupt memory file, starting with empty collection"
                );
                T::default()
            }
        },
        Err(e) => {
            warn!(
                error = %e,
                path = %path.display(),
                "Unreadable memory file, starting with empty collection"
            );
            T::default()
        }
    }
}

/// Rewrite a collection's backing file in full. Failures propagate.
fn save_collection<T: Serialize>(path: &Path, value: &T) -> EngramResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| EngramError::Serialization(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| EngramError::Storage(format!("{}: {e}", path.display())))
}
