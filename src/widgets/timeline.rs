//! Timeline items, addressed by label or text.
use crate::coordinate::{Coordinate, Suggestion, WidgetHash};
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::{TimelineItem, Widget};

use super::{Dispatch, anchor, ellipsize, matches_hint};

/// An item is addressed by one token.
const MAX_TOKENS: usize = 1;

/// Suggestion for an item's label.
fn label_suggestion(item: &TimelineItem) -> Suggestion {
    Suggestion::new(format!("{}_label", item.id), ellipsize(&item.label))
}

/// Suggestion for an item's text.
fn text_suggestion(item: &TimelineItem) -> Suggestion {
    Suggestion::new(format!("{}_text", item.id), ellipsize(&item.text))
}

/// `timeline-item-{id}` of the event whose label or text equals the token.
pub(crate) async fn resolve(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let Some(content) = tokens.first() else {
        return Ok(Dispatch::hash(own, 0));
    };

    let data = walker.timeline(at, widget).await?.unwrap_or_default();
    let found = data.items.into_iter().find(|item| item.label == *content || item.text == *content);
    Ok(match found {
        Some(item) => Dispatch::hash(WidgetHash::new(format!("timeline-item-{}", item.id), item.text), 1),
        None => Dispatch::fallback(own, Unresolved::UnknownWidget { name: content.clone(), widget: widget.name.clone() }),
    })
}

/// Labels first, then texts.
pub(crate) async fn suggest(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, rest: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    if rest.len() >= MAX_TOKENS {
        return Ok(Vec::new());
    }
    let data = walker.timeline(at, widget).await?.unwrap_or_default();
    let labels = data.items.iter().map(label_suggestion);
    let texts = data.items.iter().map(text_suggestion);
    Ok(labels.chain(texts).collect())
}

/// Labels and texts containing the hint.
pub(crate) async fn suggest_with_hint(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    let [hint] = tokens else {
        return Ok(Vec::new());
    };
    let data = walker.timeline(at, widget).await?.unwrap_or_default();
    let labels = data.items.iter().filter(|item| matches_hint(&item.label, hint)).map(label_suggestion);
    let texts = data.items.iter().filter(|item| matches_hint(&item.text, hint)).map(text_suggestion);
    Ok(labels.chain(texts).collect())
}
