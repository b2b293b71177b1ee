//! Per-widget-type strategies.
//!
//! Each strategy has a resolve entry point and two suggest entry points: one
//! for right after a separator (no hint) and one filtering by what is typed.
mod accordion;
mod graph;
mod list;
mod paginated_table;
mod table;
mod text_box;
mod timeline;

use crate::coordinate::{Coordinate, Resolution, Suggestion, WidgetHash};
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::{Widget, WidgetKind};

/// Suggestion texts longer than this are cut and suffixed with `...`.
pub const MAX_SUGGESTION_LENGTH: usize = 94;

/// What a strategy produced for the tokens after the widget name.
#[derive(Debug)]
pub(crate) enum Target {
    /// The widget has no anchor strategy.
    Bare,
    /// Resolution restarted elsewhere but stopped short of an anchor. The
    /// widget keeps its own anchor and the caller navigates to `elsewhere`.
    Forward {
        /// Where the restarted walk stopped.
        elsewhere: Coordinate,
        /// This widget's anchor.
        own: WidgetHash,
    },
    /// Anchor inside (or on) this widget.
    Hash(WidgetHash),
    /// Resolution restarted elsewhere and reached an anchor there.
    Replaced(Coordinate),
}

/// Outcome of a widget strategy.
#[derive(Debug)]
pub(crate) struct Dispatch {
    /// Tokens used after the widget name.
    pub consumed: usize,
    /// Why a deeper lookup fell back, if it did.
    pub degraded: Option<Unresolved>,
    /// Where the strategy ended up.
    pub target: Target,
}

impl Dispatch {
    /// An anchor reached after `consumed` tokens.
    pub const fn hash(hash: WidgetHash, consumed: usize) -> Self {
        Self { consumed, degraded: None, target: Target::Hash(hash) }
    }

    /// The widget's own anchor, after a deeper lookup failed.
    pub const fn fallback(own: WidgetHash, reason: Unresolved) -> Self {
        Self { consumed: 0, degraded: Some(reason), target: Target::Hash(own) }
    }

    /// Fold into a resolution. `at` already carries the widget and
    /// `consumed_before` counts every token up to and including its name.
    pub fn into_resolution(self, at: Coordinate, consumed_before: usize) -> Resolution {
        let Self { consumed, degraded, target } = self;
        let coordinate = match target {
            Target::Hash(hash) => at.with_hash(hash),
            Target::Bare => at,
            Target::Replaced(elsewhere) => elsewhere,
            Target::Forward { elsewhere, own } => at.with_hash(own).with_forward(elsewhere),
        };
        Resolution { consumed: consumed_before.saturating_add(consumed), coordinate, degraded }
    }
}

/// Anchor slug: whitespace and apostrophes become dashes, then lower-case.
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() || c == '\'' { '-' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Anchor of a widget itself: `{slug}-{recordId}-{sectionId}-widget`,
/// dropping the ids that are not known and falling back to the organization id.
pub fn anchor(at: &Coordinate, name: &str) -> WidgetHash {
    let ids: Vec<&str> = [at.record.as_ref().map(|r| r.id.as_str()), at.section.as_ref().map(|s| s.id.as_str())]
        .into_iter()
        .flatten()
        .collect();
    let scope = if ids.is_empty() {
        at.organization.as_ref().map_or_else(String::new, |o| o.id.clone())
    } else {
        ids.join("-")
    };
    WidgetHash::new(format!("{}-{scope}-widget", slug(name)), name)
}

/// Shorten a suggestion text.
pub fn ellipsize(text: &str) -> String {
    if text.chars().count() < MAX_SUGGESTION_LENGTH {
        return text.to_owned();
    }
    let cut: String = text.chars().take(MAX_SUGGESTION_LENGTH).collect();
    format!("{}...", cut.trim())
}

/// Case-insensitive substring test used for every hint filter.
pub fn matches_hint(text: &str, hint: &str) -> bool {
    text.to_lowercase().contains(&hint.to_lowercase())
}

/// Identifier of a widget suggestion.
pub fn widget_suggestion(widget: &Widget) -> Suggestion {
    Suggestion::new(format!("{}-{}", widget.name, widget.kind), widget.name.as_str())
}

/// Resolve the tokens after a widget name.
pub(crate) async fn resolve(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
    depth: usize,
) -> Result<Dispatch, Superseded> {
    match widget.kind {
        WidgetKind::Accordion => accordion::resolve(walker, at, widget, tokens, depth).await,
        WidgetKind::Graph => graph::resolve(walker, at, widget, tokens).await,
        WidgetKind::List => list::resolve(walker, at, widget, tokens, is_issues).await,
        WidgetKind::PaginatedTable => paginated_table::resolve(walker, at, widget, tokens, is_issues).await,
        WidgetKind::Table => table::resolve(walker, at, widget, tokens).await,
        WidgetKind::TextBox => text_box::resolve(walker, at, widget, is_issues).await,
        WidgetKind::Timeline => timeline::resolve(walker, at, widget, tokens).await,
        WidgetKind::Other => Ok(Dispatch { consumed: 0, degraded: None, target: Target::Bare }),
    }
}

/// Candidates right after a separator. `rest` holds the tokens already
/// typed after the widget name.
pub(crate) async fn suggest(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    rest: &[String],
    is_issues: bool,
    depth: usize,
) -> Result<Vec<Suggestion>, Superseded> {
    match widget.kind {
        WidgetKind::Accordion => accordion::suggest(walker, at, rest, true, depth).await,
        WidgetKind::Graph => graph::suggest(walker, at, widget, rest).await,
        WidgetKind::List => list::suggest(walker, at, widget, rest, is_issues).await,
        WidgetKind::PaginatedTable => paginated_table::suggest(walker, at, widget, rest, is_issues).await,
        WidgetKind::Table => table::suggest(walker, at, widget, rest).await,
        WidgetKind::Timeline => timeline::suggest(walker, at, widget, rest).await,
        WidgetKind::TextBox | WidgetKind::Other => Ok(Vec::new()),
    }
}

/// Candidates filtered by the partially typed tokens after the widget name.
pub(crate) async fn suggest_with_hint(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
    depth: usize,
) -> Result<Vec<Suggestion>, Superseded> {
    match widget.kind {
        WidgetKind::Accordion => accordion::suggest(walker, at, tokens, false, depth).await,
        WidgetKind::Graph => graph::suggest_with_hint(walker, at, widget, tokens).await,
        WidgetKind::List => list::suggest_with_hint(walker, at, widget, tokens, is_issues).await,
        WidgetKind::PaginatedTable => paginated_table::suggest_with_hint(walker, at, widget, tokens, is_issues).await,
        WidgetKind::Table => table::suggest_with_hint(walker, at, widget, tokens).await,
        WidgetKind::Timeline => timeline::suggest_with_hint(walker, at, widget, tokens).await,
        WidgetKind::TextBox | WidgetKind::Other => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Organization, Record, Section};

    fn coordinate() -> Coordinate {
        let organization = Organization {
            description: String::new(),
            id: "o1".to_owned(),
            is_ecosystem: false,
            name: "Acme".to_owned(),
            sections: Vec::new(),
            widgets: Vec::new(),
        };
        Coordinate::at_organization(organization)
    }

    fn section() -> Section {
        Section { id: "s1".to_owned(), is_issues: false, name: "Incidents".to_owned(), url: String::new(), widgets: Vec::new() }
    }

    #[test]
    fn slug_replaces_spaces_and_apostrophes() {
        assert_eq!(slug("Analyst's Notes"), "analyst-s-notes");
        assert_eq!(slug("Observed  Data"), "observed--data");
    }

    #[test]
    fn anchor_uses_the_ids_it_has() {
        let org_level = anchor(&coordinate(), "Key Facts");
        assert_eq!(org_level.hash, "key-facts-o1-widget");

        let with_section = coordinate().with_section(section());
        assert_eq!(anchor(&with_section, "Summary").hash, "summary-s1-widget");

        let full = with_section.with_record(Record { id: "r1".to_owned(), name: "Phishing-Jan".to_owned() });
        let hash = anchor(&full, "Severity");
        assert_eq!(hash.hash, "severity-r1-s1-widget");
        assert_eq!(hash.text, "Severity");
    }

    #[test]
    fn long_texts_are_ellipsized() {
        let long = "word ".repeat(30);
        let short = ellipsize(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), MAX_SUGGESTION_LENGTH + 3);
        assert_eq!(ellipsize("short"), "short");
    }

    #[test]
    fn hints_match_case_insensitively() {
        assert!(matches_hint("Acme Corp", "ac"));
        assert!(!matches_hint("Globex", "ac"));
    }
}
