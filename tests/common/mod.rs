#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::path::Path;
use std::sync::Arc;

use hyperref::config::Markers;
use hyperref::fetch::{Fetcher, MemoryFetcher};
use hyperref::snapshot::{ConfigStore, Snapshot};
use hyperref::tokenizer::{Tokens, tokenize};
use hyperref::{Engine, Resolution, ResolveOptions, Suggestion, Ticket};

pub const FIXTURE: &str = "tests/fixtures/acme";

pub fn snapshot() -> Snapshot {
    let json = std::fs::read_to_string(Path::new(FIXTURE).join("platform.json")).unwrap();
    Snapshot::from_json(&json).unwrap()
}

pub fn fetcher() -> Arc<MemoryFetcher> {
    Arc::new(MemoryFetcher::from_file(&Path::new(FIXTURE).join("responses.json")).unwrap())
}

pub fn engine_with(fetcher: Arc<dyn Fetcher>) -> Engine {
    Engine::new(Arc::new(ConfigStore::new(snapshot())), fetcher)
}

/// The fixture engine plus its fetcher, for inspecting requested URLs.
pub fn engine() -> (Engine, Arc<MemoryFetcher>) {
    let fetcher = fetcher();
    let dynamic: Arc<dyn Fetcher> = Arc::<MemoryFetcher>::clone(&fetcher);
    (engine_with(dynamic), fetcher)
}

pub fn tokens(reference: &str) -> Vec<String> {
    tokenize(reference, &Markers::default())
}

pub fn options(reference: &str) -> ResolveOptions {
    ResolveOptions { reference: reference.to_owned(), ..ResolveOptions::default() }
}

pub async fn resolve(engine: &Engine, reference: &str) -> Resolution {
    engine.resolve(&tokens(reference), &options(reference), &Ticket::detached()).await.unwrap()
}

pub async fn resolve_with(engine: &Engine, reference: &str, options: &ResolveOptions) -> Resolution {
    engine.resolve(&tokens(reference), options, &Ticket::detached()).await.unwrap()
}

pub async fn suggest(engine: &Engine, reference: &str) -> Vec<Suggestion> {
    let tokens = Tokens::from_reference(reference, &Markers::default());
    engine.suggest(&tokens, &options(reference), &Ticket::detached()).await.unwrap()
}

pub fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.text.as_str()).collect()
}
