//! Inspection binary: resolve, suggest, and link references from the command line.
#![allow(clippy::cargo_common_metadata, reason = "not published; there is no public repository to point at")]
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hyperref::diagnostics;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "hyperref", about = "Resolve and autocomplete object references in chat messages")]
struct Cli {
    /// Base URL for relative widget and section URLs
    #[arg(long, global = true, default_value = "")]
    api_url: String,
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
    /// Platform configuration export, relative to the root
    #[arg(long, global = true, default_value = "platform.json")]
    platform: PathBuf,
    /// Serve widget payloads from a recorded `{url: payload}` file instead of HTTP
    #[arg(long, global = true)]
    responses: Option<PathBuf>,
    /// Directory holding `.hyperref.toml`
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
}

/// Subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Replace every reference in a message with a markdown link
    Link {
        /// Message text
        message: String,
    },
    /// Resolve a reference and print the coordinate as JSON
    Resolve {
        /// Reference, with or without the surrounding markers
        reference: String,
        /// Resolve as typed in a channel's side panel
        #[arg(long)]
        rhs: bool,
        /// Also read the anchored widget's raw value, as the `.value` option does
        #[arg(long)]
        value: bool,
    },
    /// List candidates for the token being typed
    Suggest {
        /// Print the text with the N-th candidate (0-based) accepted
        #[arg(long)]
        accept: Option<usize>,
        /// Byte offset of the cursor (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,
        /// Message text
        text: String,
    },
    /// Show the reference around the cursor and its tokens
    Tokens {
        /// Byte offset of the cursor (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,
        /// Message text
        text: String,
    },
}

/// Install logging, run one subcommand, map failures to exit code 3.
fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "hyperref=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let sources = commands::Sources {
        api_url: cli.api_url,
        platform: cli.root.join(&cli.platform),
        responses: cli.responses.map(|path| cli.root.join(path)),
        root: cli.root,
    };

    let result = match cli.command {
        Commands::Tokens { text, cursor } => commands::tokens(&sources, &text, cursor),
        Commands::Resolve { reference, rhs, value } => commands::resolve(&sources, &reference, rhs, value),
        Commands::Suggest { text, cursor, accept } => commands::suggest(&sources, &text, cursor, accept),
        Commands::Link { message } => commands::link(&sources, &message),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3)
        },
    }
}
