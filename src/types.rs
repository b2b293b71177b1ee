//! Configuration tree and remote payload types.
//!
//! Field names follow the platform's camelCase JSON so payloads decode as-is.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A top-level tenant of the configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Free-form description, unused by resolution.
    #[serde(default)]
    pub description: String,
    /// Stable identifier.
    pub id: String,
    /// Whether this is the ecosystem organization, whose sections get default widgets.
    #[serde(default)]
    pub is_ecosystem: bool,
    /// Display name; references address organizations by this exact string.
    pub name: String,
    /// Ordered sections.
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Widgets attached to the organization page itself.
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Organization {
    /// Section with this exact name, if any.
    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Organization-level widget with this exact name, if any.
    pub fn widget_by_name(&self, name: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.name == name)
    }
}

/// A collection of records sharing one widget layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier.
    pub id: String,
    /// Ecosystem "issues" section.
    #[serde(default)]
    pub is_issues: bool,
    /// Display name.
    pub name: String,
    /// Endpoint listing the section's records; `{url}/{recordId}` returns one record's info.
    #[serde(default)]
    pub url: String,
    /// Widgets shown on every record page of this section.
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// A widget declaration. `url` may contain the `:id` placeholder for the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    /// Widget variant.
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    /// Display name; references address widgets by this string.
    #[serde(default)]
    pub name: String,
    /// URL template for the widget's own payload.
    #[serde(default)]
    pub url: String,
}

/// Widget variants the resolver can descend into. Everything else the
/// platform renders (charts, channels, playbooks, ...) decodes as `Other`
/// and resolves no deeper than the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[expect(clippy::arbitrary_source_item_ordering, reason = "serde's catch-all variant must come last")]
pub enum WidgetKind {
    /// Collapsible list of elements pointing into other sections.
    Accordion,
    /// Node/edge graph.
    Graph,
    /// Flat list of text items.
    List,
    /// Server-paginated table.
    PaginatedTable,
    /// Header/row table.
    Table,
    /// Single text value.
    TextBox,
    /// Labelled events.
    Timeline,
    /// Widget type without a reference strategy.
    #[serde(other)]
    Other,
}

impl WidgetKind {
    /// The wire tag, as used in widget suggestion ids.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::Graph => "graph",
            Self::List => "list",
            Self::PaginatedTable => "paginated-table",
            Self::Table => "table",
            Self::TextBox => "text-box",
            Self::Timeline => "timeline",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named row of a section ("object").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Record list returned by a section URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordPage {
    /// Rows; extra columns are ignored.
    #[serde(default)]
    pub rows: Vec<Record>,
}

/// An accordion or ecosystem element: a pointer to a record of another organization's section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Identifier of the record the element points at.
    pub id: String,
    /// Name of the record the element points at.
    pub name: String,
    /// Organization owning the target section.
    #[serde(default)]
    pub organization_id: String,
    /// Target section id.
    #[serde(default)]
    pub parent_id: String,
}

/// Ecosystem outcome item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Outcome {
    /// Identifier.
    #[serde(default)]
    pub id: String,
    /// Outcome text.
    pub outcome: String,
}

/// Ecosystem participant row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Identifier.
    #[serde(default)]
    pub id: String,
    /// Roles held by the user.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Participant user id.
    pub user_id: String,
}

impl Role {
    /// Anchor key of the row: its id, or the user id for rows exported without one.
    pub fn row_id(&self) -> &str {
        if self.id.is_empty() { &self.user_id } else { &self.id }
    }
}

/// Ecosystem attachment item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Attachment text or link.
    pub attachment: String,
    /// Identifier.
    #[serde(default)]
    pub id: String,
}

/// Payload behind one record: its name plus whatever the section stores.
/// Ecosystem records fill the typed lists; other keys land in `fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionInfo {
    /// Ecosystem attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Ecosystem elements (accordion children, technology rows).
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Any remaining top-level keys.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Record id.
    #[serde(default)]
    pub id: String,
    /// Record name.
    #[serde(default)]
    pub name: String,
    /// Ecosystem outcomes.
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
    /// Ecosystem participants.
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl SectionInfo {
    /// A string-valued field by key, if present.
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(serde_json::Value::as_str)
    }
}

/// Graph widget payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    /// Optional graph-level description block.
    #[serde(default)]
    pub description: Option<GraphDescription>,
    /// Nodes; edges are not needed for references.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
}

/// Graph-level description block.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDescription {
    /// Title, referenced like a node label.
    pub name: String,
    /// Body text.
    #[serde(default)]
    pub text: String,
}

/// A graph node.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    /// Node payload.
    pub data: GraphNodeData,
    /// Node id.
    pub id: String,
}

/// Node payload fields used for references.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeData {
    /// Visible label.
    pub label: String,
    /// Record the node belongs to.
    #[serde(default)]
    pub parent_id: String,
    /// Section the node belongs to.
    #[serde(default)]
    pub section_id: String,
}

/// Table widget payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableData {
    /// Column headers.
    #[serde(default)]
    pub headers: Vec<TableHeader>,
    /// Rows; `values` line up with `headers` by index.
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl TableData {
    /// Index of the header with this exact name.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.name == header)
    }

    /// Cell value of `row` in `column`, if the row is long enough.
    pub fn cell(row: &TableRow, column: usize) -> Option<&str> {
        row.values.get(column).map(|v| v.value.as_str())
    }
}

/// Table column header.
#[derive(Debug, Clone, Deserialize)]
pub struct TableHeader {
    /// Header text.
    pub name: String,
}

/// Table row.
#[derive(Debug, Clone, Deserialize)]
pub struct TableRow {
    /// Row id.
    pub id: String,
    /// Row name.
    #[serde(default)]
    pub name: String,
    /// Cells, by column index.
    #[serde(default)]
    pub values: Vec<TableValue>,
}

/// Table cell.
#[derive(Debug, Clone, Deserialize)]
pub struct TableValue {
    /// Cell text.
    #[serde(default)]
    pub value: String,
}

/// List widget payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListData {
    /// Items.
    #[serde(default)]
    pub items: Vec<ListItem>,
}

/// List item.
#[derive(Debug, Clone, Deserialize)]
pub struct ListItem {
    /// Item id.
    pub id: String,
    /// Item text.
    pub text: String,
}

/// Timeline widget payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineData {
    /// Events.
    #[serde(default)]
    pub items: Vec<TimelineItem>,
}

/// Timeline event.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineItem {
    /// Event id.
    pub id: String,
    /// Short label (usually a date).
    #[serde(default)]
    pub label: String,
    /// Event text.
    #[serde(default)]
    pub text: String,
}

/// Text-box widget payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBoxData {
    /// The text value.
    #[serde(default)]
    pub text: String,
}
