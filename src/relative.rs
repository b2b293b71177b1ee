//! References typed inside a channel's side panel may start at the channel's
//! own record instead of at an organization.
use serde::Serialize;

use crate::coordinate::{Coordinate, ResolveOptions, Suggestion};
use crate::engine::Walker;
use crate::guard::Superseded;
use crate::suggest;
use crate::tokenizer::Tokens;
use crate::types::{Organization, Record, Section};

/// The section and record a channel belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelContext {
    pub record_id: String,
    pub section_id: String,
}

/// A token list after relative expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelativeReference {
    /// The reference was written relative to the channel and now starts at
    /// the organization; resolve it in side-panel mode.
    pub is_rhs: bool,
    /// The channel's record, when the first token only partially names it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
    pub tokens: Vec<String>,
}

impl RelativeReference {
    /// The tokens as typed, not side-panel relative.
    const fn unchanged(tokens: Vec<String>) -> Self {
        Self { is_rhs: false, record: None, tokens }
    }
}

/// The channel's organization, section, and record as named by its section info.
async fn channel_record<'s>(
    walker: &Walker<'s>,
    channel: &ChannelContext,
) -> Result<Option<(&'s Organization, &'s Section, Record)>, Superseded> {
    let Some((organization, section)) = walker.snapshot.section_by_id(&channel.section_id) else {
        tracing::debug!(section = %channel.section_id, "channel section is not configured");
        return Ok(None);
    };
    let at = Coordinate::at_record(None, Some(section.clone()), Record { id: channel.record_id.clone(), name: String::new() });
    let Some(info) = walker.section_info(&at).await? else {
        return Ok(None);
    };
    let id = if info.id.is_empty() { channel.record_id.clone() } else { info.id };
    Ok(Some((organization, section, Record { id, name: info.name })))
}

/// Rewrite a reference that starts with the channel record's name into an absolute one.
pub(crate) async fn expand(walker: &Walker<'_>, tokens: Vec<String>, channel: &ChannelContext) -> Result<RelativeReference, Superseded> {
    if tokens.is_empty() {
        return Ok(RelativeReference::unchanged(tokens));
    }
    let Some((organization, section, record)) = channel_record(walker, channel).await? else {
        return Ok(RelativeReference::unchanged(tokens));
    };

    let first = tokens.first().map_or("", String::as_str);
    if record.name == first {
        let mut absolute = vec![organization.name.clone(), section.name.clone()];
        absolute.extend(tokens);
        return Ok(RelativeReference { is_rhs: true, record: None, tokens: absolute });
    }
    if record.name.contains(first) {
        return Ok(RelativeReference { record: Some(record), ..RelativeReference::unchanged(tokens) });
    }
    Ok(RelativeReference::unchanged(tokens))
}

/// Suggestions for a reference typed in the channel's side panel.
pub(crate) async fn suggest(walker: &Walker<'_>, tokens: &Tokens, channel: &ChannelContext) -> Result<Vec<Suggestion>, Superseded> {
    if tokens.tokens.is_empty() {
        let own = channel_record(walker, channel).await?;
        let mut out: Vec<Suggestion> = own.into_iter().map(|(_, _, r)| Suggestion::new(r.id, r.name)).collect();
        out.extend(suggest::suggest(walker, tokens).await?);
        return Ok(out);
    }

    let expanded = expand(walker, tokens.tokens.clone(), channel).await?;
    let rewritten = Tokens { tokens: expanded.tokens, ..tokens.clone() };
    let nested = Walker {
        fetcher: walker.fetcher,
        options: ResolveOptions { is_rhs: expanded.is_rhs, ..walker.options.clone() },
        snapshot: walker.snapshot,
        ticket: walker.ticket,
    };

    let mut out = suggest::suggest(&nested, &rewritten).await?;
    out.extend(expanded.record.map(|r| Suggestion::new(r.id, r.name)));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::Markers;
    use crate::fetch::MemoryFetcher;
    use crate::guard::Ticket;
    use crate::snapshot::Snapshot;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "organizations": [{
                "id": "o1",
                "name": "Acme",
                "sections": [{ "id": "s1", "name": "Incidents", "url": "api/incidents" }]
            }]
        }))
        .unwrap()
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::new().with("api/incidents/r1", json!({ "id": "r1", "name": "Phishing-Jan" }))
    }

    fn channel() -> ChannelContext {
        ChannelContext { record_id: "r1".to_owned(), section_id: "s1".to_owned() }
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    #[tokio::test]
    async fn record_name_expands_to_absolute_reference() {
        let (snapshot, fetcher, ticket) = (snapshot(), fetcher(), Ticket::detached());
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        let expanded = expand(&walker, tokens(&["Phishing-Jan", "Severity"]), &channel()).await.unwrap();
        assert!(expanded.is_rhs);
        assert_eq!(expanded.tokens, ["Acme", "Incidents", "Phishing-Jan", "Severity"]);
    }

    #[tokio::test]
    async fn partial_record_name_is_offered_not_expanded() {
        let (snapshot, fetcher, ticket) = (snapshot(), fetcher(), Ticket::detached());
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        let expanded = expand(&walker, tokens(&["Phish"]), &channel()).await.unwrap();
        assert!(!expanded.is_rhs);
        assert_eq!(expanded.tokens, ["Phish"]);
        assert_eq!(expanded.record.unwrap().name, "Phishing-Jan");
    }

    #[tokio::test]
    async fn unreachable_channel_leaves_tokens_alone() {
        let (snapshot, ticket) = (snapshot(), Ticket::detached());
        let fetcher = MemoryFetcher::new();
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        let expanded = expand(&walker, tokens(&["Phishing-Jan"]), &channel()).await.unwrap();
        assert_eq!(expanded, RelativeReference::unchanged(tokens(&["Phishing-Jan"])));
    }

    #[tokio::test]
    async fn empty_reference_offers_channel_record_first() {
        let (snapshot, fetcher, ticket) = (snapshot(), fetcher(), Ticket::detached());
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        let suggestions = suggest(&walker, &Tokens::from_reference("", &Markers::default()), &channel()).await.unwrap();
        let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["Phishing-Jan", "Acme"]);
    }
}
