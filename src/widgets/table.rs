//! Header/row tables, addressed as `header, value`.
use crate::coordinate::{Coordinate, Suggestion, WidgetHash};
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::{TableData, Widget};

use super::{Dispatch, anchor, matches_hint};

/// A row is addressed as `header, value`.
const MAX_TOKENS: usize = 2;

/// `table-row-{id}` of the row whose cell under `header` equals `value`.
pub(crate) async fn resolve(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let [header, value, ..] = tokens else {
        return Ok(Dispatch::hash(own, 0));
    };

    let data = walker.table(at, widget).await?.unwrap_or_default();
    let row = data
        .column(header)
        .and_then(|column| data.rows.iter().find(|row| TableData::cell(row, column) == Some(value.as_str())));

    Ok(match row {
        Some(row) => Dispatch::hash(WidgetHash::new(format!("table-row-{}", row.id), value.as_str()), 2),
        None => Dispatch::fallback(own, Unresolved::UnknownWidget { name: format!("{header}.{value}"), widget: widget.name.clone() }),
    })
}

/// Headers matching the hint.
fn header_suggestions<'a>(data: &'a TableData, hint: Option<&'a str>) -> impl Iterator<Item = Suggestion> + 'a {
    data.headers
        .iter()
        .filter(move |h| hint.is_none_or(|hint| matches_hint(&h.name, hint)))
        .map(|h| Suggestion::new(h.name.as_str(), h.name.as_str()))
}

/// Non-empty cells of a column matching the hint.
fn row_suggestions<'a>(data: &'a TableData, column: usize, hint: Option<&'a str>) -> impl Iterator<Item = Suggestion> + 'a {
    data.rows.iter().filter_map(move |row| {
        let value = TableData::cell(row, column)?;
        hint.is_none_or(|hint| matches_hint(value, hint)).then(|| Suggestion::new(row.id.as_str(), value))
    })
}

/// Columns, or the rows of a column when the last typed token names one.
pub(crate) async fn suggest(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, rest: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    if rest.len() >= MAX_TOKENS {
        return Ok(Vec::new());
    }
    let data = walker.table(at, widget).await?.unwrap_or_default();
    let last = rest.last().map(String::as_str);

    if let Some(column) = last.and_then(|name| data.column(name)) {
        return Ok(row_suggestions(&data, column, None).collect());
    }
    if last.is_some_and(|name| data.rows.iter().any(|row| row.name == name)) {
        return Ok(Vec::new());
    }
    Ok(header_suggestions(&data, None).collect())
}

/// One token filters columns; a second one filters the rows of the column
/// the first token names.
pub(crate) async fn suggest_with_hint(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    if tokens.is_empty() || tokens.len() > MAX_TOKENS {
        return Ok(Vec::new());
    }
    let data = walker.table(at, widget).await?.unwrap_or_default();
    match tokens {
        [header] => Ok(header_suggestions(&data, Some(header)).collect()),
        [header, value] => Ok(data
            .column(header)
            .map_or_else(Vec::new, |column| row_suggestions(&data, column, Some(value)).collect())),
        _ => Ok(Vec::new()),
    }
}
