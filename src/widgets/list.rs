//! List items, addressed by the start of their text.
use crate::coordinate::{Coordinate, Suggestion, WidgetHash};
use crate::ecosystem::EcosystemWidget;
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::Widget;

use super::{Dispatch, anchor, ellipsize, matches_hint};

/// A list is addressed by at most one item.
const MAX_TOKENS: usize = 1;

/// `(id, text)` of every item. Ecosystem outcomes and attachments live in
/// the record's section info; other lists have their own payload.
async fn items(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, is_issues: bool) -> Result<Vec<(String, String)>, Superseded> {
    if !is_issues {
        let data = walker.list(at, widget).await?.unwrap_or_default();
        return Ok(data.items.into_iter().map(|item| (item.id, item.text)).collect());
    }

    let Some(info) = walker.section_info(at).await? else {
        return Ok(Vec::new());
    };
    let items = match EcosystemWidget::from_name(&widget.name) {
        Some(EcosystemWidget::Outcomes) => info.outcomes.into_iter().map(|o| (o.id, o.outcome)).collect(),
        Some(EcosystemWidget::Attachments) => info.attachments.into_iter().map(|a| (a.id, a.attachment)).collect(),
        _ => Vec::new(),
    };
    Ok(items)
}

/// `list-item-{id}` of the first item whose text starts with the token.
pub(crate) async fn resolve(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let Some(content) = tokens.first() else {
        return Ok(Dispatch::hash(own, 0));
    };

    let found = items(walker, at, widget, is_issues).await?.into_iter().find(|(_, text)| text.starts_with(content.as_str()));
    Ok(match found {
        Some((id, text)) => Dispatch::hash(WidgetHash::new(format!("list-item-{id}"), text), 1),
        None => Dispatch::fallback(own, Unresolved::UnknownWidget { name: content.clone(), widget: widget.name.clone() }),
    })
}

/// Every item, shortened.
pub(crate) async fn suggest(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    rest: &[String],
    is_issues: bool,
) -> Result<Vec<Suggestion>, Superseded> {
    if rest.len() >= MAX_TOKENS {
        return Ok(Vec::new());
    }
    let items = items(walker, at, widget, is_issues).await?;
    Ok(items.into_iter().map(|(id, text)| Suggestion::new(id, ellipsize(&text))).collect())
}

/// Items containing the hint, shortened.
pub(crate) async fn suggest_with_hint(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
) -> Result<Vec<Suggestion>, Superseded> {
    let [hint] = tokens else {
        return Ok(Vec::new());
    };
    let items = items(walker, at, widget, is_issues).await?;
    Ok(items
        .into_iter()
        .filter(|(_, text)| matches_hint(text, hint))
        .map(|(id, text)| Suggestion::new(id, ellipsize(&text)))
        .collect())
}
