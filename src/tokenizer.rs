//! Reference extraction from free text.
//!
//! A reference is whatever follows the last opener (`&(` by default) at or
//! before the cursor, up to the first closing marker or the end of the text
//! when the author has not closed it yet.
use crate::config::Markers;

/// A tokenized reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Whether the raw reference ends with the separator, meaning the next
    /// stage has been started but nothing of it is typed yet.
    pub at_boundary: bool,
    /// The raw reference between the markers.
    pub reference: String,
    /// Non-empty segments in order.
    pub tokens: Vec<String>,
}

impl Tokens {
    /// Tokenize an already extracted reference.
    pub fn from_reference(reference: &str, markers: &Markers) -> Self {
        Self {
            at_boundary: ends_at_boundary(reference, markers),
            reference: reference.to_owned(),
            tokens: tokenize(reference, markers),
        }
    }

    /// The last token, used as the suggestion hint.
    pub fn hint(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }
}

/// Byte offset of the opener that governs `cursor`, if any.
fn opener_before(text: &str, cursor: usize, markers: &Markers) -> Option<usize> {
    let opener = markers.opener();
    text.match_indices(opener.as_str())
        .map(|(index, _)| index)
        .take_while(|&index| index <= cursor)
        .last()
}

/// Extract the raw reference around `cursor` (a byte offset, clamped to the text).
/// Returns `None` when no opener precedes the cursor.
pub fn extract_reference<'a>(text: &'a str, cursor: usize, markers: &Markers) -> Option<&'a str> {
    let start = opener_before(text, cursor, markers)?;
    let body = text.get(start.saturating_add(markers.opener().len())..)?;
    let end = body.find(markers.end.as_str()).unwrap_or(body.len());
    body.get(..end)
}

/// Split a reference on the separator, dropping empty segments.
pub fn tokenize(reference: &str, markers: &Markers) -> Vec<String> {
    reference
        .split(markers.separator.as_str())
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Whether the reference stops exactly at a stage boundary.
pub fn ends_at_boundary(reference: &str, markers: &Markers) -> bool {
    reference.ends_with(markers.separator.as_str())
}

/// Extract and tokenize the reference around `cursor`. Text with no opener
/// before the cursor yields an empty token list.
pub fn tokens_at(text: &str, cursor: usize, markers: &Markers) -> Tokens {
    extract_reference(text, cursor, markers)
        .map(|reference| Tokens::from_reference(reference, markers))
        .unwrap_or_default()
}

/// Rewrite `text` so the reference around `cursor` ends with `suggestion`.
///
/// At a stage boundary (or with nothing typed) the suggestion is appended as a
/// new token; otherwise it replaces the partially typed last token. The
/// closing marker, if present, is kept. Returns `None` when the cursor is not
/// inside a reference.
pub fn apply_suggestion(text: &str, cursor: usize, markers: &Markers, suggestion: &str) -> Option<String> {
    let start = opener_before(text, cursor, markers)?;
    let opener = markers.opener();
    let body_start = start.saturating_add(opener.len());
    let body = text.get(body_start..)?;
    let body_end = body_start.saturating_add(body.find(markers.end.as_str()).unwrap_or(body.len()));

    let current = Tokens::from_reference(text.get(body_start..body_end)?, markers);
    let mut tokens = current.tokens;
    if current.at_boundary || tokens.is_empty() {
        tokens.push(suggestion.to_owned());
    } else if let Some(last) = tokens.last_mut() {
        suggestion.clone_into(last);
    }

    let mut rewritten = String::with_capacity(text.len().saturating_add(suggestion.len()));
    rewritten.push_str(text.get(..start)?);
    rewritten.push_str(&opener);
    rewritten.push_str(&tokens.join(markers.separator.as_str()));
    rewritten.push_str(text.get(body_end..)?);
    Some(rewritten)
}
