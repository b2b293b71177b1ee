//! Default widgets synthesized for every section of the ecosystem organization.
//!
//! These never appear in stored configuration. Their payloads come from the
//! record's section info rather than from a widget URL.
use crate::types::{Section, Widget, WidgetKind};

/// Fields of the participants table, in column order.
pub const ROLES_FIELDS: [&str; 2] = ["user", "roles"];

/// Fields of the support-technology table, in column order.
pub const ELEMENTS_FIELDS: [&str; 3] = ["organization", "name", "description"];

/// The synthesized widgets. `ALL` lists them in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcosystemWidget {
    /// Attachments list.
    Attachments,
    /// Support technology data: a paginated table, or an accordion in the side panel.
    Elements,
    /// Objectives and research area text box.
    Objectives,
    /// Outcomes list.
    Outcomes,
    /// Participants and roles table.
    Roles,
}

impl EcosystemWidget {
    /// Every default widget, in display order.
    pub const ALL: [Self; 5] = [Self::Objectives, Self::Outcomes, Self::Roles, Self::Elements, Self::Attachments];

    /// Lower-case name; widget names are compared against this case-insensitively.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Objectives => "objectives and research area",
            Self::Outcomes => "outcomes",
            Self::Roles => "participants and roles",
            Self::Elements => "support technology data",
            Self::Attachments => "attachments",
        }
    }

    /// Match a widget name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_lowercase();
        Self::ALL.into_iter().find(|w| w.key() == lowered)
    }

    /// Render kind. The elements table becomes an accordion in the side panel.
    pub const fn kind(self, is_rhs: bool) -> WidgetKind {
        match self {
            Self::Objectives => WidgetKind::TextBox,
            Self::Outcomes | Self::Attachments => WidgetKind::List,
            Self::Roles => WidgetKind::PaginatedTable,
            Self::Elements if is_rhs => WidgetKind::Accordion,
            Self::Elements => WidgetKind::PaginatedTable,
        }
    }

    /// Column fields, for the two table-shaped defaults.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Roles => &ROLES_FIELDS,
            Self::Elements => &ELEMENTS_FIELDS,
            Self::Objectives | Self::Outcomes | Self::Attachments => &[],
        }
    }

    /// Key of the section-info field holding the text value.
    pub fn property(self) -> String {
        camel_case(self.key())
    }

    /// Build the widget declaration for a section.
    pub fn widget(self, section: &Section, is_rhs: bool) -> Widget {
        Widget {
            kind: self.kind(is_rhs),
            name: capitalize(self.key()),
            url: format!("{}/{}", section.url, crate::fetch::RECORD_ID_PLACEHOLDER),
        }
    }
}

/// All default widgets for a section, in display order.
pub fn default_widgets(section: &Section, is_rhs: bool) -> Vec<Widget> {
    EcosystemWidget::ALL.into_iter().map(|w| w.widget(section, is_rhs)).collect()
}

/// The default widget whose name matches, ignoring case.
pub fn default_widget_by_name(section: &Section, name: &str, is_rhs: bool) -> Option<Widget> {
    EcosystemWidget::from_name(name).map(|w| w.widget(section, is_rhs))
}

/// Words of a name, split on whitespace.
fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// The word with its first character upper-cased.
fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect())
}

/// `"participants and roles"` becomes `"Participants And Roles"`.
pub fn capitalize(s: &str) -> String {
    words(s).map(upper_first).collect::<Vec<_>>().join(" ")
}

/// `"objectives and research area"` becomes `"objectivesAndResearchArea"`.
pub fn camel_case(s: &str) -> String {
    words(s)
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { upper_first(w) })
        .collect()
}
