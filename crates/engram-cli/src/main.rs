//! Engram CLI — chat with a memory-backed agent and inspect what it knows.

mod cli;
mod dotenv;
mod table;
mod visualize;

use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use engram_memory::MemoryStore;
use engram_runtime::drivers::OpenAIDriver;
use engram_runtime::Agent;
use engram_types::config::{default_config_path, engram_home, load_config, EngramConfig};

use crate::cli::{Cli, Commands, LearnCommands, MemorySection};
use crate::table::Table;
use crate::visualize::MemoryVisualizer;

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level.to_string())),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    // Load ~/.engram/.env first (system env takes priority).
    dotenv::load_dotenv();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Init => cmd_init(&config),
        Commands::Chat => cmd_chat(&config),
        Commands::Ask { message } => cmd_ask(&config, &message),
        Commands::Learn(learn) => cmd_learn(&config, learn),
        Commands::Memory { section, limit } => cmd_memory(&config, section, limit),
        Commands::Search { query, limit } => cmd_search(&config, &query, limit),
    }
}

fn cmd_init(config: &EngramConfig) -> anyhow::Result<()> {
    std::fs::create_dir_all(engram_home()).context("creating ~/.engram")?;
    std::fs::create_dir_all(&config.memory_dir).context("creating memory directory")?;

    let config_path = default_config_path();
    if config_path.exists() {
        println!(
            "{} config already exists at {}",
            "kept".yellow(),
            config_path.display()
        );
    } else {
        std::fs::write(&config_path, EngramConfig::default_toml())
            .context("writing default config")?;
        println!(
            "{} default config at {}",
            "wrote".green(),
            config_path.display()
        );
    }

    println!("Memory directory: {}", config.memory_dir.display());
    println!(
        "Set your API key ({}) in the environment or in {}",
        config.api_key_env,
        engram_home().join(".env").display()
    );
    Ok(())
}

fn build_agent(config: &EngramConfig) -> anyhow::Result<Agent> {
    let driver = OpenAIDriver::from_env(&config.api_key_env, config.api_base.clone())
        .with_context(|| {
            format!(
                "no API key found; set {} or add it to {}",
                config.api_key_env,
                engram_home().join(".env").display()
            )
        })?;
    let memory =
        MemoryStore::open_with_capacity(&config.memory_dir, config.working_memory_capacity)?;
    Ok(Agent::new(memory, Box::new(driver), config))
}

fn cmd_chat(config: &EngramConfig) -> anyhow::Result<()> {
    let mut agent = build_agent(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    println!("{}", "Engram chat — memory enabled.".bold());
    println!("Type 'exit' to quit. 'remember that ...' stores a fact directly.");
    println!("{}", "-".repeat(50));

    let stdin = io::stdin();
    loop {
        print!("\n{} ", "You:".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            println!(
                "\n{} Goodbye! It was nice talking with you.",
                "Assistant:".green().bold()
            );
            break;
        }

        let reply = runtime.block_on(agent.handle(input))?;
        println!("\n{} {reply}", "Assistant:".green().bold());
    }
    Ok(())
}

fn cmd_ask(config: &EngramConfig, message: &str) -> anyhow::Result<()> {
    let mut agent = build_agent(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let reply = runtime.block_on(agent.handle(message))?;
    println!("{reply}");
    Ok(())
}

fn cmd_learn(config: &EngramConfig, learn: LearnCommands) -> anyhow::Result<()> {
    let mut store =
        MemoryStore::open_with_capacity(&config.memory_dir, config.working_memory_capacity)?;
    match learn {
        LearnCommands::Fact { content, category } => {
            store.add_fact(&content, category)?;
            println!("{} fact: {content}", "stored".green());
        }
        LearnCommands::Procedure {
            name,
            steps,
            description,
        } => {
            let steps: Vec<String> = steps.iter().map(|s| s.trim().to_string()).collect();
            store.add_procedure(&name, steps, description)?;
            println!("{} procedure: {name}", "stored".green());
        }
    }
    Ok(())
}

fn cmd_memory(config: &EngramConfig, section: MemorySection, limit: usize) -> anyhow::Result<()> {
    let viz = MemoryVisualizer::new(&config.memory_dir);
    let output = match section {
        MemorySection::Facts => viz.render_facts(),
        MemorySection::Conversations => viz.render_conversations(limit),
        MemorySection::Procedures => viz.render_procedures(),
        MemorySection::All => viz.render_all(limit),
    };
    println!("{output}");
    Ok(())
}

fn cmd_search(config: &EngramConfig, query: &str, limit: usize) -> anyhow::Result<()> {
    let store =
        MemoryStore::open_with_capacity(&config.memory_dir, config.working_memory_capacity)?;

    let facts = store.search_facts(query, limit);
    println!("{}", format!("Facts matching '{query}':").bold());
    if facts.is_empty() {
        println!("  (none)");
    } else {
        let mut table = Table::new(&["#", "Content", "Category"]);
        for (i, fact) in facts.iter().enumerate() {
            table.add_row(&[
                &(i + 1).to_string(),
                &fact.content,
                fact.category.as_deref().unwrap_or(""),
            ]);
        }
        println!("{}", table.render());
    }

    let procedures = store.search_procedures(query, limit);
    println!("\n{}", format!("Procedures matching '{query}':").bold());
    if procedures.is_empty() {
        println!("  (none)");
    } else {
        for proc in procedures {
            println!("  {} (used {} times)", proc.name, proc.usage_count);
            for (i, step) in proc.steps.iter().enumerate() {
                println!("    {}. {step}", i + 1);
            }
        }
    }
    Ok(())
}
