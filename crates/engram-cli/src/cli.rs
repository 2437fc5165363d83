//! Clap CLI definitions for Engram.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const AFTER_HELP: &str = "\
\x1b[1;36mExamples:\x1b[0m
  engram init                                   Write a default config file
  engram chat                                   Interactive chat with memory
  engram ask \"what do I like?\"                  One-shot question
  engram learn fact \"I prefer green tea\"        Store a fact directly
  engram learn procedure \"Brew Tea\" --steps \"boil water,steep,pour\"
  engram memory                                 Inspect all memory collections
  engram search tea                             Search facts and procedures

\x1b[1;36mIn chat, two commands bypass the model:\x1b[0m
  remember that <fact>
  remember the steps for <name>: <step1>, <step2>, ...";

/// Engram — a conversational agent with file-backed memory.
#[derive(Parser)]
#[command(
    name = "engram",
    version,
    about = "Engram \u{2014} a conversational agent with file-backed memory",
    after_help = AFTER_HELP,
)]
pub struct Cli {
    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize Engram (create ~/.engram/ and a default config).
    Init,
    /// Interactive chat session; `exit`, `quit`, or `bye` ends it.
    Chat,
    /// Ask a single question and print the reply.
    Ask {
        /// The message to send.
        message: String,
    },
    /// Store knowledge directly, without an LLM round trip [*].
    #[command(subcommand)]
    Learn(LearnCommands),
    /// Inspect persisted memory collections.
    Memory {
        /// Which collection to show.
        #[arg(value_enum, default_value = "all")]
        section: MemorySection,
        /// Maximum conversations to display.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Search facts and procedures.
    Search {
        /// The search query.
        query: String,
        /// Maximum results per collection.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum LearnCommands {
    /// Store a fact in semantic memory.
    Fact {
        /// The fact content.
        content: String,
        /// Optional category label.
        #[arg(long)]
        category: Option<String>,
    },
    /// Store a procedure in procedural memory (overwrites an existing name).
    Procedure {
        /// Procedure name.
        name: String,
        /// Comma-separated steps.
        #[arg(long, value_delimiter = ',')]
        steps: Vec<String>,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
    },
}

/// Memory collection selector for `engram memory`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MemorySection {
    /// Facts (semantic memory).
    Facts,
    /// Conversations (episodic memory).
    Conversations,
    /// Procedures (procedural memory).
    Procedures,
    /// Everything.
    All,
}
