use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use docchat::config::Config;
use docchat::extract::TextFileSource;
use docchat::llm::ChatMessage;
use docchat::session::DocumentSession;

#[derive(Parser)]
#[command(
    name = "docchat",
    about = "Ask questions about a single document from your terminal",
    version
)]
struct Cli {
    /// Document to ingest (pre-extracted plain text)
    document: PathBuf,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ask one question and exit instead of starting the interactive loop
    #[arg(long)]
    question: Option<String>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading {}", path.display()))
        }
        None => {
            let default_path = PathBuf::from("docchat.toml");
            if default_path.exists() {
                Config::load(&default_path).context("loading docchat.toml")
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let mut session = DocumentSession::with_provider(config, Box::new(TextFileSource))?;
    session
        .ingest(&cli.document)
        .with_context(|| format!("ingesting {}", cli.document.display()))?;
    println!(
        "Processed '{}' ({} chunks). Ask questions, or 'quit' to exit.",
        session.doc_id().unwrap_or("document"),
        session.chunk_count()
    );

    if let Some(question) = cli.question {
        let answer = session.ask(&question)?;
        println!("{answer}");
        return Ok(());
    }

    // Session-scoped transcript, mirrored to the screen
    let mut transcript: Vec<ChatMessage> = Vec::new();

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();

        match question {
            "" => continue,
            "quit" | "exit" => break,
            "/history" => {
                for turn in &transcript {
                    println!("{:?}: {}", turn.role, turn.content);
                }
                continue;
            }
            _ => {}
        }

        transcript.push(ChatMessage::user(question));
        match session.ask(question) {
            Ok(answer) => {
                println!("{answer}");
                transcript.push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                // A failed query aborts that question, not the session
                eprintln!("Query failed: {e}");
                log::warn!("ask failed: {e}");
                transcript.pop();
            }
        }
    }

    Ok(())
}
