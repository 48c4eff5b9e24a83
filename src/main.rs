//! Farm Intent CLI
//!
//! Runs the retrieval engine over the built-in knowledge base (or a JSON
//! corpus) for one-off detection, diagnostics and an interactive loop.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farm_intent::normalizer::{normalize, tokens};
use farm_intent::{
    complete_knowledge_base, Corpus, EngineConfig, FarmAction, IntentDetector, IntentEngine,
};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "farm-intent")]
#[command(about = "Farm Intent - map farmer utterances to actions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON array of examples replacing the built-in knowledge base
    #[arg(long, value_name = "FILE")]
    corpus: Option<PathBuf>,

    /// Expand example variants before serving queries
    #[arg(long)]
    variants: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the action for an utterance
    Detect {
        /// Utterance (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show the best scored examples for an utterance
    Top {
        #[arg(required = true)]
        text: Vec<String>,

        /// Number of matches (defaults to the configured default_top_n)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Print the normalized form of an utterance and its tokens
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Interactive detection loop (`exit` or `quit` to leave)
    Repl,

    /// Show engine statistics and configuration
    Info,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Cli {
        config: config_path,
        corpus,
        variants,
        command,
    } = Cli::parse();

    let config = match &config_path {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            EngineConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    match command {
        Commands::Normalize { text } => {
            let normalized = normalize(&text.join(" "));
            let tokens: Vec<&str> = tokens(&normalized, config.min_token_len).collect();
            println!("{}", normalized);
            println!("tokens: {:?}", tokens);
        }

        Commands::Detect { text } => {
            let engine = build_engine(corpus, variants, config)?;
            print_detection(&engine, &text.join(" ")).await?;
        }

        Commands::Top { text, count } => {
            let engine = build_engine(corpus, variants, config)?;
            let n = count.unwrap_or(engine.config().default_top_n);
            let matches = engine.find_top_matches(&text.join(" "), n).await;
            if matches.is_empty() {
                println!("No candidates");
            }
            for (rank, scored) in matches.iter().enumerate() {
                println!(
                    "{:>2}. {:.3}  {:<28} #{:<5} {:?}",
                    rank + 1,
                    scored.similarity,
                    scored.example.action.as_str(),
                    scored.index,
                    scored.example.text
                );
            }
        }

        Commands::Repl => {
            let engine = build_engine(corpus, variants, config)?;
            repl(&engine).await?;
        }

        Commands::Info => {
            let engine = build_engine(corpus, variants, config)?;
            let stats = engine.stats();
            println!("Examples:            {}", stats.examples);
            println!("Indexed tokens:      {}", stats.indexed_tokens);
            println!("Stopwords pruned:    {}", stats.stopwords_pruned);
            println!("Stopword threshold:  {}", stats.stopword_threshold);
            println!("Embeddings:          {}", engine.is_using_embeddings());
            println!();
            print!("{}", toml::to_string_pretty(engine.config())?);
        }
    }

    Ok(())
}

/// Built-in knowledge base unless a JSON corpus is given
fn build_engine(
    corpus: Option<PathBuf>,
    variants: bool,
    config: EngineConfig,
) -> Result<IntentEngine<FarmAction>> {
    let mut engine = match corpus {
        Some(path) => {
            let corpus: Corpus<FarmAction> = Corpus::load_json(&path)
                .with_context(|| format!("failed to load corpus {}", path.display()))?;
            config.validate()?;
            IntentEngine::from_corpus(config, corpus)
        }
        None => IntentEngine::new(config, complete_knowledge_base())?,
    };

    if variants {
        let added = engine.enrich_with_variants()?;
        log::info!("Expanded {} variants", added);
    }
    Ok(engine)
}

async fn print_detection<D>(detector: &D, text: &str) -> Result<()>
where
    D: IntentDetector<FarmAction>,
{
    match detector.detect_intent(text).await {
        Some(intent) => {
            println!("action:     {}", intent.action);
            println!("confidence: {:.3}", intent.confidence);
            println!("params:     {}", serde_json::to_string(&intent.params)?);
        }
        None => println!("No intent detected"),
    }
    Ok(())
}

async fn repl(engine: &IntentEngine<FarmAction>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        print_detection(engine, line).await?;
    }

    Ok(())
}
