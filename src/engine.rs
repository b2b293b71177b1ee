//! Entry points tying the snapshot, the fetcher and the walks together.
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::coordinate::{Coordinate, Resolution, ResolveOptions, Suggestion};
use crate::error::Error;
use crate::fetch::{Fetcher, format_url_with_id};
use crate::guard::{Superseded, Ticket};
use crate::relative::{self, ChannelContext, RelativeReference};
use crate::snapshot::{ConfigStore, Snapshot};
use crate::tokenizer::Tokens;
use crate::types::{
    GraphData,
    ListData,
    Record,
    Section,
    SectionInfo,
    TableData,
    TextBoxData,
    TimelineData,
    Widget,
};
use crate::{resolver, suggest};

/// Forward references nested deeper than this stop resolving.
pub const MAX_FORWARD_DEPTH: usize = 8;

/// Boxed future for the recursive walks.
pub(crate) type Step<'a, T> = Pin<Box<dyn Future<Output = Result<T, Superseded>> + Send + 'a>>;

/// Resolves and suggests references against the current configuration.
pub struct Engine {
    /// Source of record lists and widget payloads.
    fetcher: Arc<dyn Fetcher>,
    /// Snapshot read at the start of every call.
    store: Arc<ConfigStore>,
}

impl Engine {
    pub fn new(store: Arc<ConfigStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher, store }
    }

    /// The snapshot the next call will resolve against.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Per-call walk state over one snapshot.
    fn walker<'a>(&'a self, snapshot: &'a Snapshot, ticket: &'a Ticket, options: &ResolveOptions) -> Walker<'a> {
        Walker {
            fetcher: self.fetcher.as_ref(),
            options: options.clone(),
            snapshot,
            ticket,
        }
    }

    /// Resolve a token sequence as far as the configuration allows.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer ticket was issued while a fetch was in flight.
    pub async fn resolve(&self, tokens: &[String], options: &ResolveOptions, ticket: &Ticket) -> Result<Resolution, Superseded> {
        ticket.check()?;
        let snapshot = self.store.current();
        let walker = self.walker(&snapshot, ticket, options);
        let resolution = resolver::resolve(&walker, tokens).await?;
        if let Some(reason) = &resolution.degraded {
            debug!(consumed = resolution.consumed, %reason, "reference resolved partially");
        }
        Ok(resolution)
    }

    /// Candidates for the next token of a partially typed reference.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer ticket was issued while a fetch was in flight.
    pub async fn suggest(&self, tokens: &Tokens, options: &ResolveOptions, ticket: &Ticket) -> Result<Vec<Suggestion>, Superseded> {
        ticket.check()?;
        let snapshot = self.store.current();
        let walker = self.walker(&snapshot, ticket, options);
        suggest::suggest(&walker, tokens).await
    }

    /// Expand a reference written relative to the side panel's channel.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer ticket was issued while a fetch was in flight.
    pub async fn relative(&self, tokens: Vec<String>, channel: &ChannelContext, ticket: &Ticket) -> Result<RelativeReference, Superseded> {
        ticket.check()?;
        let snapshot = self.store.current();
        let walker = self.walker(&snapshot, ticket, &ResolveOptions::default());
        relative::expand(&walker, tokens, channel).await
    }

    /// Suggestions while typing inside a channel's side panel: relative
    /// references are expanded first, and the channel's own record is offered
    /// when the first token partially names it.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer ticket was issued while a fetch was in flight.
    pub async fn suggest_in_channel(&self, tokens: &Tokens, channel: &ChannelContext, ticket: &Ticket) -> Result<Vec<Suggestion>, Superseded> {
        ticket.check()?;
        let snapshot = self.store.current();
        let walker = self.walker(&snapshot, ticket, &ResolveOptions::default());
        relative::suggest(&walker, tokens, channel).await
    }
}

/// Per-call context shared by every stage of one walk.
pub(crate) struct Walker<'a> {
    /// Payload source.
    pub fetcher: &'a dyn Fetcher,
    /// Caller options for this walk.
    pub options: ResolveOptions,
    /// Snapshot pinned for the whole call.
    pub snapshot: &'a Snapshot,
    /// Checked after every fetch.
    pub ticket: &'a Ticket,
}

impl<'a> Walker<'a> {
    /// Context for a walk restarted at a forwarded coordinate. Only the value
    /// request carries over.
    pub fn forwarded(&self) -> Self {
        Walker {
            fetcher: self.fetcher,
            options: ResolveOptions {
                is_rhs: false,
                reference: self.options.reference.clone(),
                value_requested: self.options.value_requested,
            },
            snapshot: self.snapshot,
            ticket: self.ticket,
        }
    }

    /// Await a fetch, check the ticket, and fold failures into `None`.
    async fn settle<T>(&self, what: &str, url: &str, fetch: impl Future<Output = Result<T, Error>> + Send) -> Result<Option<T>, Superseded> {
        let outcome = fetch.await;
        self.ticket.check()?;
        match outcome {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                warn!(url, error = %e, "{what} unavailable, treating as no data");
                Ok(None)
            },
        }
    }

    /// Records of a section.
    pub async fn records(&self, section: &Section) -> Result<Option<Vec<Record>>, Superseded> {
        self.settle("records", &section.url, self.fetcher.records(&section.url)).await
    }

    /// Section info of the record a coordinate points at. No record or no
    /// section means no data, without a fetch.
    pub async fn section_info(&self, at: &Coordinate) -> Result<Option<SectionInfo>, Superseded> {
        let (Some(record), Some(section)) = (&at.record, &at.section) else {
            return Ok(None);
        };
        self.settle("section info", &section.url, self.fetcher.section_info(&record.id, &section.url)).await
    }

    /// Graph payload of a widget at a coordinate.
    pub async fn graph(&self, at: &Coordinate, widget: &Widget) -> Result<Option<GraphData>, Superseded> {
        let url = widget_url(at, widget);
        self.settle("graph", &url, self.fetcher.graph(&url)).await
    }

    /// Table payload of a widget at a coordinate.
    pub async fn table(&self, at: &Coordinate, widget: &Widget) -> Result<Option<TableData>, Superseded> {
        let url = widget_url(at, widget);
        self.settle("table", &url, self.fetcher.table(&url)).await
    }

    /// List payload of a widget at a coordinate.
    pub async fn list(&self, at: &Coordinate, widget: &Widget) -> Result<Option<ListData>, Superseded> {
        let url = widget_url(at, widget);
        self.settle("list", &url, self.fetcher.list(&url)).await
    }

    /// Timeline payload of a widget at a coordinate.
    pub async fn timeline(&self, at: &Coordinate, widget: &Widget) -> Result<Option<TimelineData>, Superseded> {
        let url = widget_url(at, widget);
        self.settle("timeline", &url, self.fetcher.timeline(&url)).await
    }

    /// Text-box payload of a widget at a coordinate.
    pub async fn text_box(&self, at: &Coordinate, widget: &Widget) -> Result<Option<TextBoxData>, Superseded> {
        let url = widget_url(at, widget);
        self.settle("text box", &url, self.fetcher.text_box(&url)).await
    }
}

/// Widget URL with the record id substituted, when there is a record.
fn widget_url(at: &Coordinate, widget: &Widget) -> String {
    at.record.as_ref().map_or_else(|| widget.url.clone(), |r| format_url_with_id(&widget.url, &r.id))
}
