//! commitwise - CLI entry point.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use commitwise::git::check_git_installed;
use commitwise::{CommitResult, GitCliProvider, ProviderConfig, TracingLogger, generate_with, server};

/// Draft a conventional commit message from staged changes.
#[derive(Parser, Debug)]
#[command(name = "commitwise")]
#[command(about = "Draft a conventional commit message from staged changes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to the git repository (defaults to the current directory)
    directory: Option<PathBuf>,

    /// Commit message style
    #[arg(long, default_value = "conventional")]
    style: String,

    /// Print the full result as JSON instead of the message text
    #[arg(long)]
    json: bool,

    /// Seconds allowed for each git command (overrides COMMITWISE_GIT_TIMEOUT)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer JSON requests on stdin, one result per line on stdout
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = check_git_installed() {
        warn!("{e}");
    }

    let mut config = ProviderConfig::from_env();
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let provider = GitCliProvider::new(config);
    debug!(
        "Git timeout {:?}, rules file {}",
        provider.config().timeout,
        provider.config().rules_file
    );

    match cli.command {
        Some(Command::Serve) => {
            let stdin = BufReader::new(tokio::io::stdin());
            server::serve(stdin, tokio::io::stdout(), &provider, &TracingLogger)
                .await
                .context("Tool server stopped on an I/O error")?;
        }
        None => {
            let result = generate_with(
                &provider,
                &TracingLogger,
                cli.directory.as_deref(),
                &cli.style,
            )
            .await;
            print_result(&result, cli.json)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only the message or JSON.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_result(result: &CommitResult, json: bool) -> Result<()> {
    if json {
        let payload =
            serde_json::to_string_pretty(result).context("Failed to serialize result")?;
        println!("{payload}");
        return Ok(());
    }

    if !result.has_changes {
        println!("No staged changes to analyze.");
        return Ok(());
    }

    println!("{}", result.text);
    eprintln!(
        "\nConfidence: {:.2} | Files analyzed: {}",
        result.confidence, result.files_analyzed
    );
    Ok(())
}
