// src/main.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::remote::{RemoteEndpoint, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::form::FormInput;
use crate::handler::SubmitHandler;
use crate::output::TerminalSink;
use crate::render::capability::Capabilities;
use crate::render::heuristic::MarkdownHeuristic;
use crate::render::renderer::ResponseRenderer;

mod client;
mod form;
mod handler;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "cropsight")]
#[command(about = "Ask a crop analysis backend about a photo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one image with a question and show the answer
    Analyze {
        /// Image file to upload
        #[arg(long, short = 'i')]
        image: Option<PathBuf>,

        /// Question about the image
        #[arg(long, short = 'q', default_value = "")]
        query: String,

        #[command(flatten)]
        settings: Settings,
    },
    /// Prompt for image and question repeatedly
    Interactive {
        #[command(flatten)]
        settings: Settings,
    },
    /// Check that the analysis backend answers
    Check {
        /// Analysis endpoint URL
        #[arg(long, env = "CROPSIGHT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

#[derive(Args)]
struct Settings {
    /// Analysis endpoint URL
    #[arg(long, env = "CROPSIGHT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Never render Markdown, always show plain text
    #[arg(long)]
    plain: bool,

    /// Write HTML results to this file instead of stdout
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Regex that marks a result as Markdown (repeatable, replaces the defaults)
    #[arg(long = "markdown-pattern")]
    markdown_patterns: Vec<String>,
}

impl Settings {
    fn build_handler(&self) -> Result<SubmitHandler<RemoteEndpoint>> {
        let heuristic = if self.markdown_patterns.is_empty() {
            MarkdownHeuristic::standard()
        } else {
            MarkdownHeuristic::new(&self.markdown_patterns)
        }
        .context("Invalid --markdown-pattern")?;

        let capabilities = if self.plain {
            Capabilities::none()
        } else {
            Capabilities::builtin()
        };

        let connector = RemoteEndpoint::new(&self.endpoint, Duration::from_secs(self.timeout))?;
        Ok(SubmitHandler::new(connector, ResponseRenderer::new(heuristic, capabilities)))
    }

    fn sink(&self) -> TerminalSink {
        TerminalSink::new(self.html_out.clone())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or("RUST_LOG", "info")
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { image, query, settings } => {
            run_analyze(image, query, &settings)
        }
        Commands::Interactive { settings } => {
            run_interactive_mode(&settings)
        }
        Commands::Check { endpoint } => {
            check_backend_status(&endpoint)
        }
    }
}

fn run_analyze(image: Option<PathBuf>, query: String, settings: &Settings) -> Result<()> {
    let handler = settings.build_handler()?;
    let mut sink = settings.sink();
    handler.submit(FormInput::new(image, query), &mut sink)?;
    Ok(())
}

fn check_backend_status(endpoint: &str) -> Result<()> {
    info!("Checking analysis backend at {}...", endpoint);

    let remote = RemoteEndpoint::new(endpoint, Duration::from_secs(10))?;
    match remote.probe() {
        Ok(status) => {
            println!("✓ Backend is answering at {} (HTTP {})", endpoint, status);
        }
        Err(e) => {
            error!("{}", e);
            println!("✗ Could not connect to the backend at {}", endpoint);
            println!("\nTroubleshooting:");
            println!("  1. Start the analysis server");
            println!("  2. Pass its URL with --endpoint or CROPSIGHT_ENDPOINT");
        }
    }

    Ok(())
}

fn run_interactive_mode(settings: &Settings) -> Result<()> {
    println!("🌾 CropSight Interactive Mode");
    println!("============================");

    let handler = settings.build_handler()?;
    let mut sink = settings.sink();
    println!("Backend: {}", handler.connector().endpoint());

    let stdin = io::stdin();
    let mut input = String::new();

    loop {
        println!("\nMain Menu:");
        println!("1. Analyze an image");
        println!("2. Exit");
        print!("\nEnter your choice (1-2): ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "1" => {
                let image = prompt(&stdin, "Image path: ")?;
                let query = prompt(&stdin, "Question: ")?;
                let image = (!image.is_empty()).then(|| PathBuf::from(image));
                handler.submit(FormInput::new(image, query), &mut sink)?;
            }
            "2" => {
                println!("Exiting CropSight");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.");
            }
        }
    }

    Ok(())
}

fn prompt(stdin: &io::Stdin, label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
