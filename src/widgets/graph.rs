//! Graph nodes, the graph description, and per-node info sections.
use crate::coordinate::{Coordinate, Suggestion, WidgetHash};
use crate::engine::Walker;
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::{GraphData, GraphNode, Widget};

use super::{Dispatch, anchor, matches_hint, slug};

/// A node, then at most one of its info sections.
const MAX_TOKENS: usize = 2;

/// Sections of the node info panel that can be referenced.
pub const NODE_INFO_SECTIONS: [&str; 1] = ["Description"];

/// Anchor of a node info section.
fn node_info_anchor(node_id: &str, section_id: &str, record_id: &str) -> String {
    format!("{node_id}-{section_id}-{record_id}-node-info-widget")
}

/// What a graph token names.
enum Pick<'a> {
    /// The description block, by its title.
    Description(&'a str),
    /// A node, by its label.
    Node(&'a GraphNode),
}

/// The graph description wins over a node with the same label.
fn pick<'a>(data: &'a GraphData, label: &str) -> Option<Pick<'a>> {
    if let Some(description) = &data.description
        && description.name == label
    {
        return Some(Pick::Description(&description.name));
    }
    data.nodes.iter().find(|n| n.data.label == label).map(Pick::Node)
}

/// `(recordId, sectionId)` of a coordinate, empty when unknown.
fn ids(at: &Coordinate) -> (&str, &str) {
    (
        at.record.as_ref().map_or("", |r| r.id.as_str()),
        at.section.as_ref().map_or("", |s| s.id.as_str()),
    )
}

/// Node, node info section, or graph description.
pub(crate) async fn resolve(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Dispatch, Superseded> {
    let own = anchor(at, &widget.name);
    let Some((label, rest)) = tokens.split_first() else {
        return Ok(Dispatch::hash(own, 0));
    };
    let unknown = |name: &str| Unresolved::UnknownWidget { name: name.to_owned(), widget: widget.name.clone() };

    let data = walker.graph(at, widget).await?.unwrap_or_default();
    let Some(picked) = pick(&data, label) else {
        return Ok(Dispatch::fallback(own, unknown(label)));
    };
    let (record_id, section_id) = ids(at);

    match (picked, rest.first()) {
        (Pick::Description(name), None) => {
            let hash = format!("graph-{}-{record_id}-{section_id}-widget", slug(name));
            Ok(Dispatch::hash(WidgetHash::new(hash, name), 1))
        },
        (Pick::Node(node), None) => {
            let hash = format!("{}-{record_id}-{section_id}", node.id);
            Ok(Dispatch::hash(WidgetHash::new(hash, node.data.label.as_str()), 1))
        },
        (Pick::Node(node), Some(info)) if NODE_INFO_SECTIONS.contains(&info.as_str()) => {
            let hash = node_info_anchor(&node.id, section_id, record_id);
            Ok(Dispatch::hash(WidgetHash::new(hash, info.as_str()), 2))
        },
        (_, Some(info)) => Ok(Dispatch::fallback(own, unknown(info))),
    }
}

/// Info sections of a node.
fn info_suggestions(node: &GraphNode, hint: Option<&str>) -> Vec<Suggestion> {
    NODE_INFO_SECTIONS
        .iter()
        .filter(|label| hint.is_none_or(|hint| matches_hint(label, hint)))
        .map(|label| Suggestion::new(node_info_anchor(&node.id, &node.data.section_id, &node.data.parent_id), *label))
        .collect()
}

/// Nodes, then the description, matching the hint.
fn node_suggestions(data: &GraphData, hint: Option<&str>) -> Vec<Suggestion> {
    let nodes = data
        .nodes
        .iter()
        .filter(|n| hint.is_none_or(|hint| matches_hint(&n.data.label, hint)))
        .map(|n| Suggestion::new(n.id.as_str(), n.data.label.as_str()));
    let description = data
        .description
        .iter()
        .filter(|d| hint.is_none_or(|hint| matches_hint(&d.name, hint)))
        .map(|d| Suggestion::new(d.name.as_str(), d.name.as_str()));
    nodes.chain(description).collect()
}

/// Nodes and the description; after a node, its info sections.
pub(crate) async fn suggest(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, rest: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    if rest.len() >= MAX_TOKENS {
        return Ok(Vec::new());
    }
    let data = walker.graph(at, widget).await?.unwrap_or_default();
    let Some(label) = rest.first() else {
        return Ok(node_suggestions(&data, None));
    };
    Ok(match pick(&data, label) {
        Some(Pick::Node(node)) => info_suggestions(node, None),
        Some(Pick::Description(_)) | None => Vec::new(),
    })
}

/// Nodes and description by hint, or a node's info sections.
pub(crate) async fn suggest_with_hint(walker: &Walker<'_>, at: &Coordinate, widget: &Widget, tokens: &[String]) -> Result<Vec<Suggestion>, Superseded> {
    if tokens.is_empty() || tokens.len() > MAX_TOKENS {
        return Ok(Vec::new());
    }
    let data = walker.graph(at, widget).await?.unwrap_or_default();
    match tokens {
        [hint] => Ok(node_suggestions(&data, Some(hint))),
        [label, hint] => Ok(data
            .nodes
            .iter()
            .find(|n| matches_hint(&n.data.label, label))
            .map_or_else(Vec::new, |node| info_suggestions(node, Some(hint)))),
        _ => Ok(Vec::new()),
    }
}
