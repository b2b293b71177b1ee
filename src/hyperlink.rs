//! Rewrites every reference in a message into a markdown link.
use std::sync::Arc;

use regex::{Captures, Regex};
use tracing::debug;

use crate::config::{Config, LinkConfig, Markers};
use crate::coordinate::{Coordinate, ResolveOptions};
use crate::engine::Engine;
use crate::error::Error;
use crate::guard::{Superseded, Ticket};
use crate::relative::ChannelContext;
use crate::tokenizer::tokenize;
use crate::widgets::slug;

/// Finds references in messages and links them to the page they resolve to.
pub struct Linker {
    /// Side-panel context for relative references.
    channel: Option<ChannelContext>,
    /// Resolver.
    engine: Arc<Engine>,
    /// Link targets.
    links: LinkConfig,
    /// Reference delimiters.
    markers: Markers,
    /// Matches one delimited reference.
    pattern: Regex,
}

/// One reference found in a message.
struct Found {
    /// Byte range of the whole reference, markers included.
    range: std::ops::Range<usize>,
    /// Reference body between the markers.
    reference: String,
    /// Whether the body ended in `.value`.
    value_requested: bool,
}

impl Linker {
    /// Build a linker for the configured markers and link targets.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMarkers` if a marker is empty or the markers do
    /// not form a usable pattern.
    pub fn new(engine: Arc<Engine>, config: &Config) -> Result<Self, Error> {
        let markers = &config.markers;
        markers.validate()?;
        let pattern = format!(
            r"{}{}(.+?){}((?:{}\S+)?)",
            regex::escape(&markers.symbol),
            regex::escape(&markers.start),
            regex::escape(&markers.end),
            regex::escape(&markers.separator),
        );
        let pattern = Regex::new(&pattern).map_err(|e| Error::InvalidMarkers { reason: e.to_string() })?;
        Ok(Self {
            channel: None,
            engine,
            links: config.links.clone(),
            markers: markers.clone(),
            pattern,
        })
    }

    /// Treat references as written inside this channel's side panel.
    #[must_use]
    pub fn in_channel(self, channel: ChannelContext) -> Self {
        Self { channel: Some(channel), ..self }
    }

    /// Whether the message contains any reference at all.
    pub fn has_references(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }

    /// The reference and option suffix of one match.
    fn parse(&self, cap: &Captures<'_>) -> Option<Found> {
        let whole = cap.get(0)?;
        let option = cap.get(2).map_or("", |m| m.as_str());
        let value_option = format!("{}value", self.markers.separator);
        Some(Found {
            range: whole.range(),
            reference: cap.get(1)?.as_str().to_owned(),
            value_requested: option.starts_with(&value_option),
        })
    }

    /// Replace every resolvable reference in `message` with `[text](url)`.
    /// References that name no known organization stay as typed.
    ///
    /// # Errors
    ///
    /// Returns `Superseded` if a newer ticket was issued while linking.
    pub async fn link(&self, message: &str, ticket: &Ticket) -> Result<String, Superseded> {
        let found: Vec<Found> = self.pattern.captures_iter(message).filter_map(|cap| self.parse(&cap)).collect();

        let mut out = String::with_capacity(message.len());
        let mut last = 0;
        for reference in found {
            out.push_str(message.get(last..reference.range.start).unwrap_or_default());
            let typed = message.get(reference.range.clone()).unwrap_or_default();
            match self.link_one(&reference, ticket).await? {
                Some(link) => out.push_str(&link),
                None => out.push_str(typed),
            }
            last = reference.range.end;
        }
        out.push_str(message.get(last..).unwrap_or_default());
        Ok(out)
    }

    /// Markdown link for one reference, or `None` to leave it as typed.
    async fn link_one(&self, found: &Found, ticket: &Ticket) -> Result<Option<String>, Superseded> {
        let mut tokens = tokenize(&found.reference, &self.markers);
        let mut is_rhs = false;
        if let Some(channel) = &self.channel {
            let expanded = self.engine.relative(tokens, channel, ticket).await?;
            tokens = expanded.tokens;
            is_rhs = expanded.is_rhs;
        }

        let options = ResolveOptions { is_rhs, reference: found.reference.clone(), value_requested: found.value_requested };
        let resolution = self.engine.resolve(&tokens, &options, ticket).await?;
        if resolution.coordinate.is_empty() {
            debug!(reference = %found.reference, "reference names no organization, left as typed");
            return Ok(None);
        }

        let (text, url) = if is_rhs {
            self.side_panel_link(&resolution.coordinate, &found.reference)
        } else {
            self.page_link(&resolution.coordinate, &found.reference)
        };
        Ok(Some(format!("[{text}]({url})")))
    }

    /// Site URL without a trailing slash.
    fn site(&self) -> &str {
        self.links.site_url.trim_end_matches('/')
    }

    /// Link into the channel, anchored at the widget or the record.
    fn side_panel_link(&self, coordinate: &Coordinate, reference: &str) -> (String, String) {
        let target = coordinate.target();
        let fragment = match (&target.widget_hash, &target.record) {
            (Some(hash), _) => format!("#{}", hash.hash),
            (None, Some(record)) => format!("#_{}", record.id),
            (None, None) => String::new(),
        };
        let url = format!("{}/{}/channels/{}{fragment}", self.site(), self.links.team, self.links.channel);

        let value = target.widget_hash.as_ref().and_then(|h| h.value.clone());
        let text = value.unwrap_or_else(|| {
            let separator = &self.markers.separator;
            let organization = target.organization.as_ref().map_or("", |o| o.name.as_str());
            let section = target.section.as_ref().map_or("", |s| s.name.as_str());
            format!("{organization}{separator}{section}{separator}{reference}")
        });
        (text, url)
    }

    /// Link to the object page of the deepest resolved level.
    fn page_link(&self, coordinate: &Coordinate, reference: &str) -> (String, String) {
        let target = coordinate.target();
        let organization = target.organization.as_ref();
        let mut url = format!(
            "{}/{}/organizations/{}",
            self.site(),
            self.links.plugin_path,
            organization.map_or("", |o| o.id.as_str()),
        );
        let hash = target.widget_hash.as_ref();
        let value_or_reference = || hash.and_then(|h| h.value.clone()).unwrap_or_else(|| reference.to_owned());

        let Some(section) = &target.section else {
            return match hash {
                Some(hash) => {
                    url.push('#');
                    url.push_str(&hash.hash);
                    (value_or_reference(), url)
                },
                None => (organization.map_or_else(|| reference.to_owned(), |o| o.name.clone()), url),
            };
        };

        url.push('/');
        url.push_str(&slug(&section.name));
        let Some(record) = &target.record else {
            return (reference.to_owned(), url);
        };
        url.push_str(&format!("/{}?parentId={}", record.id, section.id));
        if let Some(hash) = hash {
            url.push('#');
            url.push_str(&hash.hash);
        }
        (value_or_reference(), url)
    }
}
