//! Resolver working state and results.
use serde::Serialize;

use crate::error::Unresolved;
use crate::types::{Organization, Record, Section, Widget};

/// Anchor inside a rendered widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetHash {
    /// Element id to scroll to.
    pub hash: String,
    /// Human-readable label of the anchored element.
    pub text: String,
    /// Raw value, when `.value` was requested and the widget has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl WidgetHash {
    /// A hash without a raw value.
    pub fn new(hash: impl Into<String>, text: impl Into<String>) -> Self {
        Self { hash: hash.into(), text: text.into(), value: None }
    }
}

/// How far a reference got. Each stage fills one more field; none of them
/// ever overwrites a field an earlier stage set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Coordinate {
    /// Set when an accordion element named another section's record but no
    /// deeper widget resolved there. Callers navigate here instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward: Option<Box<Coordinate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_hash: Option<WidgetHash>,
}

impl Coordinate {
    /// A coordinate rooted at an organization.
    pub fn at_organization(organization: Organization) -> Self {
        Self { organization: Some(organization), ..Self::default() }
    }

    /// A coordinate rooted at a record of another organization's section,
    /// used as the restart point of forward resolution.
    pub const fn at_record(organization: Option<Organization>, section: Option<Section>, record: Record) -> Self {
        Self {
            forward: None,
            organization,
            record: Some(record),
            section,
            widget: None,
            widget_hash: None,
        }
    }

    #[must_use]
    pub fn with_section(self, section: Section) -> Self {
        Self { section: Some(section), ..self }
    }

    #[must_use]
    pub fn with_record(self, record: Record) -> Self {
        Self { record: Some(record), ..self }
    }

    #[must_use]
    pub fn with_widget(self, widget: Widget) -> Self {
        Self { widget: Some(widget), ..self }
    }

    #[must_use]
    pub fn with_hash(self, widget_hash: WidgetHash) -> Self {
        Self { widget_hash: Some(widget_hash), ..self }
    }

    #[must_use]
    pub fn with_forward(self, forward: Self) -> Self {
        Self { forward: Some(Box::new(forward)), ..self }
    }

    /// Whether nothing resolved at all.
    pub const fn is_empty(&self) -> bool {
        self.organization.is_none()
    }

    /// Whether the walk reached a widget-internal anchor.
    pub const fn is_resolved(&self) -> bool {
        self.widget_hash.is_some()
    }

    /// The coordinate a caller should navigate to: the forwarded one when
    /// present, this one otherwise.
    pub fn target(&self) -> &Self {
        self.forward.as_deref().map_or(self, Self::target)
    }
}

/// Result of resolving one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Tokens consumed before the walk stopped.
    pub consumed: usize,
    pub coordinate: Coordinate,
    /// Why the walk stopped short, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Unresolved>,
}

impl Resolution {
    /// Whether every token was used and nothing degraded.
    pub const fn is_complete(&self) -> bool {
        self.degraded.is_none()
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Resolving for the side panel; switches the ecosystem elements default to an accordion.
    pub is_rhs: bool,
    /// Raw reference text, used to pick between column and row candidates.
    pub reference: String,
    /// A trailing `.value` asked for the raw value instead of a display hash.
    pub value_requested: bool,
}

/// One autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub text: String,
}

impl Suggestion {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record { id: id.to_owned(), name: id.to_owned() }
    }

    #[test]
    fn target_follows_forward_chain() {
        let inner = Coordinate::at_record(None, None, record("r2"));
        let outer = Coordinate::at_record(None, None, record("r1")).with_forward(inner.clone());
        assert_eq!(outer.target(), &inner);
        assert_eq!(inner.target(), &inner);
    }

    #[test]
    fn empty_fields_are_not_serialized() {
        let json = serde_json::to_value(Coordinate::default().with_hash(WidgetHash::new("h", "t"))).unwrap();
        assert_eq!(json, serde_json::json!({"widget_hash": {"hash": "h", "text": "t"}}));
    }
}
