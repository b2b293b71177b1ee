//! Subcommands of the inspection binary: tokens, resolve, suggest, link.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use hyperref::config::{Config, Markers};
use hyperref::coordinate::ResolveOptions;
use hyperref::diagnostics;
use hyperref::engine::Engine;
use hyperref::error::Error;
use hyperref::fetch::{Fetcher, HttpFetcher, MemoryFetcher};
use hyperref::guard::Ticket;
use hyperref::hyperlink::Linker;
use hyperref::snapshot::ConfigStore;
use hyperref::tokenizer::{self, Tokens};

/// Exit code for a reference that did not fully resolve.
const DEGRADED: u8 = 1;

/// Where the binary reads its inputs from.
pub struct Sources {
    /// Base URL for relative widget and section URLs.
    pub api_url: String,
    /// Platform configuration export.
    pub platform: PathBuf,
    /// Recorded payloads; HTTP when absent.
    pub responses: Option<PathBuf>,
    /// Directory holding `.hyperref.toml`.
    pub root: PathBuf,
}

/// # Errors
///
/// Returns `Error::Io` if the runtime cannot start.
fn runtime() -> Result<tokio::runtime::Runtime, Error> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Load the platform snapshot and pick a fetcher.
///
/// # Errors
///
/// Returns `Error::ConfigNotFound` if the platform or responses file is
/// missing, `Error::Json` if either is malformed, or `Error::Fetch` if the
/// HTTP client cannot be built.
fn engine(sources: &Sources) -> Result<Engine, Error> {
    let store = ConfigStore::default();
    store.load(&sources.platform)?;
    let fetcher: Arc<dyn Fetcher> = match &sources.responses {
        Some(path) => Arc::new(MemoryFetcher::from_file(path)?),
        None => Arc::new(HttpFetcher::new(sources.api_url.as_str())?),
    };
    Ok(Engine::new(Arc::new(store), fetcher))
}

/// The reference body, whether or not it was passed with its markers.
fn strip_markers<'a>(reference: &'a str, markers: &Markers) -> &'a str {
    tokenizer::extract_reference(reference, reference.len(), markers).unwrap_or(reference)
}

/// Print the reference around the cursor and how it tokenizes.
///
/// # Errors
///
/// Returns config loading errors.
pub fn tokens(sources: &Sources, text: &str, cursor: Option<usize>) -> Result<ExitCode, Error> {
    let config = Config::load(&sources.root)?;
    let cursor = cursor.unwrap_or(text.len());
    let Some(reference) = tokenizer::extract_reference(text, cursor, &config.markers) else {
        eprintln!("No reference before the cursor.");
        return Ok(ExitCode::from(DEGRADED));
    };

    let tokens = Tokens::from_reference(reference, &config.markers);
    println!("reference: {}", tokens.reference);
    for token in &tokens.tokens {
        println!("token: {token}");
    }
    println!("boundary: {}", tokens.at_boundary);
    Ok(ExitCode::SUCCESS)
}

/// Resolve one reference and print the resolution as JSON. With `value`,
/// the anchored text box's raw value is included. A degraded resolution
/// also prints what the stopping stage would have accepted.
///
/// # Errors
///
/// Returns config, snapshot, or serialization errors.
pub fn resolve(sources: &Sources, reference: &str, rhs: bool, value: bool) -> Result<ExitCode, Error> {
    let config = Config::load(&sources.root)?;
    let engine = engine(sources)?;
    let runtime = runtime()?;
    let ticket = Ticket::detached();

    let raw = strip_markers(reference, &config.markers);
    let tokens = tokenizer::tokenize(raw, &config.markers);
    let options = ResolveOptions { is_rhs: rhs, reference: raw.to_owned(), value_requested: value };
    let resolution = runtime.block_on(engine.resolve(&tokens, &options, &ticket))?;
    println!("{}", serde_json::to_string_pretty(&resolution)?);

    let Some(reason) = &resolution.degraded else {
        return Ok(ExitCode::SUCCESS);
    };
    let settled = Tokens {
        at_boundary: true,
        reference: raw.to_owned(),
        tokens: tokens.get(..resolution.consumed).unwrap_or(&tokens).to_vec(),
    };
    let candidates = runtime.block_on(engine.suggest(&settled, &options, &ticket))?;
    diagnostics::print_unresolved(reason, resolution.consumed, &candidates);
    Ok(ExitCode::from(DEGRADED))
}

/// Print `id<TAB>text` candidates, or with `accept`, the text rewritten with
/// that candidate.
///
/// # Errors
///
/// Returns config or snapshot errors.
pub fn suggest(sources: &Sources, text: &str, cursor: Option<usize>, accept: Option<usize>) -> Result<ExitCode, Error> {
    let config = Config::load(&sources.root)?;
    let engine = engine(sources)?;
    let runtime = runtime()?;
    let ticket = Ticket::detached();

    let cursor = cursor.unwrap_or(text.len());
    let tokens = tokenizer::tokens_at(text, cursor, &config.markers);
    let options = ResolveOptions { reference: tokens.reference.clone(), ..ResolveOptions::default() };
    let suggestions = runtime.block_on(engine.suggest(&tokens, &options, &ticket))?;

    let Some(index) = accept else {
        for s in &suggestions {
            println!("{}\t{}", s.id, s.text);
        }
        return Ok(ExitCode::SUCCESS);
    };
    let Some(choice) = suggestions.get(index) else {
        eprintln!("No candidate {index}; {} available.", suggestions.len());
        return Ok(ExitCode::from(DEGRADED));
    };
    let Some(rewritten) = tokenizer::apply_suggestion(text, cursor, &config.markers, &choice.text) else {
        eprintln!("No reference before the cursor.");
        return Ok(ExitCode::from(DEGRADED));
    };
    println!("{rewritten}");
    Ok(ExitCode::SUCCESS)
}

/// Print the message with every resolvable reference linked.
///
/// # Errors
///
/// Returns config, snapshot, or marker errors.
pub fn link(sources: &Sources, message: &str) -> Result<ExitCode, Error> {
    let config = Config::load(&sources.root)?;
    let linker = Linker::new(Arc::new(engine(sources)?), &config)?;
    let runtime = runtime()?;
    println!("{}", runtime.block_on(linker.link(message, &Ticket::detached()))?);
    Ok(ExitCode::SUCCESS)
}
