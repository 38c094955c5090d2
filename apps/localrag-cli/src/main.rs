//! # localrag
//!
//! Ask questions about a directory of `.txt`, `.pdf` and `.docx` files.
//!
//! Usage:
//!   localrag ask "What is LangGraph?"      # one question, then exit
//!   localrag chat                           # interactive, `quit` to leave
//!   localrag demo                           # scripted sample questions
//!   localrag --fake-embeddings --data-dir ./notes chat

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use localrag_core::config::{AppConfig, Config};
use localrag_core::loader::DocumentLoader;
use localrag_core::types::QueryResponse;
use localrag_embed::get_default_embedder;
use localrag_llm::OpenAiChat;
use localrag_pipeline::{IndexMode, RagPipeline};

const DEMO_QUESTIONS: [&str; 4] = [
    "What is LangGraph?",
    "What are the key concepts?",
    "What can LangGraph be used for?",
    "How does state management work?",
];

const PREVIEW_CHARS: usize = 150;

#[derive(Parser)]
#[command(name = "localrag", version, about = "Retrieval-augmented answers over local documents")]
struct Cli {
    /// Extra TOML config merged after config.toml and before APP_* variables;
    /// a relative data.data_dir is resolved against its directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory to ingest (overrides data.data_dir)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Passages retrieved per question (overrides retrieval.top_k)
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Use the offline hashing embedder instead of the configured provider
    #[arg(long, global = true)]
    fake_embeddings: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single question
    Ask { question: String },
    /// Read questions from stdin until `quit` or end of input
    Chat,
    /// Run the sample questions
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let settings = load_settings(&cli)?;
    let pipeline = build_pipeline(&settings)?;

    println!("📚 Initializing from {} ...", settings.data.data_dir().display());
    let report = pipeline.initialize().context("initialization failed")?;
    println!(
        "✅ Ready: {} documents, {} passages indexed ({} without embeddings)",
        report.documents, report.indexed, report.failed_embeddings
    );
    if report.mode == IndexMode::Basic {
        println!("⚠️  No embeddings available; answering with keyword search");
    }

    let top_k = settings.retrieval.top_k;
    match cli.command {
        Command::Ask { question } => {
            let resp = pipeline.query(&question, top_k)?;
            print_response(&resp);
        }
        Command::Chat => chat(&pipeline, top_k)?,
        Command::Demo => demo(&pipeline, top_k),
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<AppConfig> {
    let config = Config::load_with(cli.config.as_deref()).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = config.settings()?;
    if let Some(base) = cli.config.as_deref().and_then(|p| p.parent()) {
        settings.rebase_paths(base);
    }
    if let Some(dir) = &cli.data_dir {
        settings.data.data_dir = dir.clone();
    }
    if let Some(k) = cli.top_k {
        settings.retrieval.top_k = k;
    }
    if cli.fake_embeddings {
        settings.embedding.provider = "fake".to_string();
    }
    tracing::info!(
        data_dir = %settings.data.data_dir().display(),
        provider = %settings.embedding.provider,
        top_k = settings.retrieval.top_k,
        "configuration loaded"
    );
    Ok(settings)
}

fn build_pipeline(settings: &AppConfig) -> Result<RagPipeline> {
    let source = DocumentLoader::new(settings.data.data_dir());
    let embedder = get_default_embedder(&settings.embedding)?;
    let answerer = OpenAiChat::new(&settings.generation)?;
    Ok(RagPipeline::from_settings(settings, Box::new(source), embedder, Box::new(answerer)))
}

fn chat(pipeline: &RagPipeline, top_k: usize) -> Result<()> {
    println!("💬 Ask a question (type 'quit' to exit)");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n❓ ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let question = line?;
        let question = question.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "quit" | "exit" | "q") {
            break;
        }
        let resp = pipeline.query(question, top_k)?;
        tracing::debug!(retrieval = ?resp.retrieval, answer = ?resp.answer_kind, sources = resp.sources.len(), "answered");
        print_response(&resp);
    }
    println!("👋 Bye");
    Ok(())
}

fn demo(pipeline: &RagPipeline, top_k: usize) {
    println!("\n🎯 Running demo questions...");
    for (i, question) in DEMO_QUESTIONS.iter().enumerate() {
        println!("\n❓ Question {}: {}", i + 1, question);
        println!("{}", "-".repeat(40));
        match pipeline.query(question, top_k) {
            Ok(resp) if !resp.sources.is_empty() => {
                println!("🤖 Answer: {}", resp.answer);
                println!("📚 Sources: {} chunks found", resp.sources.len());
                let top = &resp.sources[0];
                println!("📖 Top source: {}", top.passage.source);
                println!("🎯 Similarity: {:.3}", top.score);
            }
            Ok(_) => println!("❌ No relevant information found"),
            Err(e) => println!("❌ Error processing question: {}", e),
        }
    }
    println!("\n✅ Demo completed");
}

fn print_response(resp: &QueryResponse) {
    println!("\n🤖 {}", resp.answer);
    if resp.sources.is_empty() {
        return;
    }
    println!("\n📚 Sources ({:?} search):", resp.retrieval);
    for (i, result) in resp.sources.iter().enumerate() {
        let preview: String = result.passage.content.chars().take(PREVIEW_CHARS).collect();
        let ellipsis = if result.passage.content.chars().count() > PREVIEW_CHARS { "..." } else { "" };
        println!("  {}. {} (similarity: {:.3})", i + 1, result.passage.source, result.score);
        println!("     {}{}", preview, ellipsis);
    }
}
