//! Accordions list elements that each point at a record of another section.
//! Naming an element restarts the walk at that record.
use tracing::debug;

use crate::coordinate::{Coordinate, Suggestion};
use crate::engine::{MAX_FORWARD_DEPTH, Walker};
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::snapshot::Snapshot;
use crate::types::{Element, Record, Widget};
use crate::{resolver, suggest as suggestions};

use super::{Dispatch, Target, anchor, matches_hint};

/// Where the walk restarts for an element. `None` when its organization or
/// section is not in the snapshot.
fn restart_point(snapshot: &Snapshot, element: Element) -> Option<Coordinate> {
    let organization = snapshot.organization_by_id(&element.organization_id)?;
    let (_, section) = snapshot.section_by_id(&element.parent_id)?;
    let record = Record { id: element.id, name: element.name };
    Some(Coordinate::at_record(Some(organization.clone()), Some(section.clone()), record))
}

/// Elements listed in the record's section info.
async fn elements(walker: &Walker<'_>, at: &Coordinate) -> Result<Vec<Element>, Superseded> {
    Ok(walker.section_info(at).await?.map(|info| info.elements).unwrap_or_default())
}

/// Element with this exact name.
async fn element(walker: &Walker<'_>, at: &Coordinate, name: &str) -> Result<Option<Element>, Superseded> {
    Ok(elements(walker, at).await?.into_iter().find(|e| e.name == name))
}

/// Forward through the named element to its record.
pub(crate) async fn resolve(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    depth: usize,
) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let Some((name, rest)) = tokens.split_first() else {
        return Ok(Dispatch::hash(own, 0));
    };
    if depth >= MAX_FORWARD_DEPTH {
        return Ok(Dispatch::fallback(own, Unresolved::ForwardTooDeep { depth: MAX_FORWARD_DEPTH }));
    }
    let Some(element) = element(walker, at, name).await? else {
        return Ok(Dispatch::fallback(own, Unresolved::UnknownElement { name: name.clone() }));
    };

    let Some(restart) = restart_point(walker.snapshot, element) else {
        debug!(element = %name, "element points outside the snapshot");
        return Ok(Dispatch::fallback(own, Unresolved::UnknownElement { name: name.clone() }));
    };
    let nested = walker.forwarded();
    let inner = resolver::widget_stage(&nested, restart, rest, depth.saturating_add(1)).await?;

    let target = if inner.coordinate.is_resolved() {
        Target::Replaced(inner.coordinate)
    } else {
        Target::Forward { elsewhere: inner.coordinate, own }
    };
    Ok(Dispatch { consumed: inner.consumed.saturating_add(1), degraded: inner.degraded, target })
}

/// Element names, or, once an element is named, the suggestions of the
/// record it points at. `boundary` selects between the no-hint and the
/// hint-filtered flavour for the last token.
pub(crate) async fn suggest(
    walker: &Walker<'_>,
    at: &Coordinate,
    tokens: &[String],
    boundary: bool,
    depth: usize,
) -> Result<Vec<Suggestion>, Superseded> {
    if depth >= MAX_FORWARD_DEPTH {
        return Ok(Vec::new());
    }
    match tokens {
        [] if boundary => {
            let all = elements(walker, at).await?;
            Ok(all.into_iter().map(|e| Suggestion::new(e.id, e.name)).collect())
        },
        [] => Ok(Vec::new()),
        [hint] if !boundary => {
            let all = elements(walker, at).await?;
            Ok(all.into_iter().filter(|e| matches_hint(&e.name, hint)).map(|e| Suggestion::new(e.id, e.name)).collect())
        },
        [name, more @ ..] => {
            let Some(element) = element(walker, at, name).await? else {
                return Ok(Vec::new());
            };
            let Some(restart) = restart_point(walker.snapshot, element) else {
                return Ok(Vec::new());
            };
            let nested = walker.forwarded();
            suggestions::widget_stage(&nested, restart, more, boundary, depth.saturating_add(1)).await
        },
    }
}
