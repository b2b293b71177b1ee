//! Ecosystem participants and support-technology tables.
//!
//! Only the synthesized ecosystem tables have rows to address; a configured
//! paginated table resolves to its own anchor.
use crate::coordinate::{Coordinate, Suggestion, WidgetHash};
use crate::ecosystem::{EcosystemWidget, capitalize};
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::snapshot::Snapshot;
use crate::types::{Element, Role, SectionInfo, Widget};

use super::{Dispatch, anchor, matches_hint};

/// A row is addressed as `column, value`.
const MAX_TOKENS: usize = 2;

/// Rows of one ecosystem table.
enum Rows {
    /// Ecosystem elements (technologies).
    Elements(Vec<Element>),
    /// Ecosystem participants.
    Roles(Vec<Role>),
}

impl Rows {
    /// Rows of `table` from the section info; `None` for non-table widgets.
    fn from_info(table: EcosystemWidget, info: SectionInfo) -> Option<Self> {
        match table {
            EcosystemWidget::Roles => Some(Self::Roles(info.roles)),
            EcosystemWidget::Elements => Some(Self::Elements(info.elements)),
            EcosystemWidget::Objectives | EcosystemWidget::Outcomes | EcosystemWidget::Attachments => None,
        }
    }

    /// `(id, text)` of every non-empty cell in `column`, keeping only the
    /// ones whose text passes `keep`.
    fn cells(&self, snapshot: &Snapshot, column: &str, keep: impl Fn(&str) -> bool) -> Vec<Suggestion> {
        let mut out = Vec::new();
        match (self, column) {
            (Self::Roles(rows), "user") => {
                for row in rows.iter().filter(|r| keep(&r.user_id)) {
                    out.push(Suggestion::new(row.user_id.as_str(), row.user_id.as_str()));
                }
            },
            (Self::Roles(rows), "roles") => {
                for role in rows.iter().flat_map(|r| &r.roles).filter(|role| keep(role)) {
                    out.push(Suggestion::new(role.as_str(), role.as_str()));
                }
            },
            (Self::Elements(rows), "organization") => {
                for (index, element) in rows.iter().enumerate() {
                    let Some(org) = snapshot.organization_by_id(&element.organization_id) else {
                        continue;
                    };
                    if keep(&org.name) {
                        out.push(Suggestion::new(format!("{}-{index}", element.organization_id), org.name.as_str()));
                    }
                }
            },
            (Self::Elements(rows), "name") => {
                for element in rows.iter().filter(|e| keep(&e.name)) {
                    out.push(Suggestion::new(element.id.as_str(), element.name.as_str()));
                }
            },
            (Self::Elements(rows), "description") => {
                for element in rows.iter().filter(|e| !e.description.is_empty() && keep(&e.description)) {
                    out.push(Suggestion::new(element.id.as_str(), element.description.as_str()));
                }
            },
            _ => {},
        }
        out
    }

    /// Row id and display text of the row matching `value` in `column`.
    /// User and role values match exactly; descriptions match by prefix.
    fn find(&self, snapshot: &Snapshot, column: &str, value: &str) -> Option<(String, String)> {
        match (self, column) {
            (Self::Roles(rows), "user") => rows.iter().find(|r| r.user_id == value).map(|r| (r.row_id().to_owned(), r.user_id.clone())),
            (Self::Roles(rows), "roles") => rows.iter().find_map(|r| {
                r.roles.iter().find(|role| *role == value).map(|role| (r.row_id().to_owned(), role.clone()))
            }),
            (Self::Elements(rows), "organization") => rows.iter().find_map(|e| {
                snapshot
                    .organization_by_id(&e.organization_id)
                    .filter(|org| org.name == value)
                    .map(|org| (e.id.clone(), org.name.clone()))
            }),
            (Self::Elements(rows), "name") => rows.iter().find(|e| e.name == value).map(|e| (e.id.clone(), e.name.clone())),
            (Self::Elements(rows), "description") => rows
                .iter()
                .find(|e| e.description.starts_with(value))
                .map(|e| (e.id.clone(), e.description.clone())),
            _ => None,
        }
    }
}

/// The ecosystem table behind a widget, with its rows loaded.
async fn load(walker: &Walker<'_>, at: &Coordinate, widget: &Widget) -> Result<Option<(EcosystemWidget, Rows)>, Superseded> {
    let Some(table) = EcosystemWidget::from_name(&widget.name).filter(|t| !t.fields().is_empty()) else {
        return Ok(None);
    };
    let info = walker.section_info(at).await?;
    Ok(info.and_then(|info| Rows::from_info(table, info)).map(|rows| (table, rows)))
}

/// Columns matching the hint.
fn column_suggestions(table: EcosystemWidget, hint: Option<&str>) -> Vec<Suggestion> {
    table
        .fields()
        .iter()
        .filter(|field| hint.is_none_or(|hint| matches_hint(field, hint)))
        .map(|field| Suggestion::new(*field, capitalize(field)))
        .collect()
}

/// `column, value` to a row anchor of an ecosystem table.
pub(crate) async fn resolve(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let [column, value, ..] = tokens else {
        return Ok(Dispatch::hash(own, 0));
    };
    if !is_issues {
        return Ok(Dispatch::hash(own, 0));
    }

    let column = column.to_lowercase();
    let found = load(walker, at, widget)
        .await?
        .and_then(|(_, rows)| rows.find(walker.snapshot, &column, value));
    Ok(match found {
        Some((id, text)) => Dispatch::hash(WidgetHash::new(format!("paginated-table-row-{id}"), text), 2),
        None => Dispatch::fallback(own, Unresolved::UnknownWidget { name: format!("{column}.{value}"), widget: widget.name.clone() }),
    })
}

/// Columns, or the cells of a column when the last typed token names one.
pub(crate) async fn suggest(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    rest: &[String],
    is_issues: bool,
) -> Result<Vec<Suggestion>, Superseded> {
    if !is_issues || rest.len() >= MAX_TOKENS {
        return Ok(Vec::new());
    }
    let Some((table, rows)) = load(walker, at, widget).await? else {
        return Ok(Vec::new());
    };
    let last = rest.last().map(|t| t.to_lowercase());
    match last {
        Some(column) if table.fields().contains(&column.as_str()) => Ok(rows.cells(walker.snapshot, &column, |_| true)),
        _ => Ok(column_suggestions(table, None)),
    }
}

/// Columns by hint, or a column's cells by hint.
pub(crate) async fn suggest_with_hint(
    walker: &Walker<'_>,
    at: &Coordinate,
    widget: &Widget,
    tokens: &[String],
    is_issues: bool,
) -> Result<Vec<Suggestion>, Superseded> {
    if !is_issues || tokens.is_empty() || tokens.len() > MAX_TOKENS {
        return Ok(Vec::new());
    }
    let Some((table, rows)) = load(walker, at, widget).await? else {
        return Ok(Vec::new());
    };
    match tokens {
        [hint] => Ok(column_suggestions(table, Some(hint))),
        [column, hint] => Ok(rows.cells(walker.snapshot, &column.to_lowercase(), |text| matches_hint(text, hint))),
        _ => Ok(Vec::new()),
    }
}
