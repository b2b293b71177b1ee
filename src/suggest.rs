//! The suggest walk. It follows the resolve walk stage by stage and, at the
//! first stage the typed tokens do not settle, offers that stage's candidates:
//! all of them right after a separator, or only those containing the
//! partially typed token.
use crate::coordinate::{Coordinate, Suggestion};
use crate::ecosystem::default_widgets;
use crate::engine::{Step, Walker};
use crate::guard::Superseded;
use crate::resolver;
use crate::snapshot::Snapshot;
use crate::tokenizer::Tokens;
use crate::types::{Organization, Record, Widget};
use crate::widgets::{self, matches_hint, widget_suggestion};

/// Whether a candidate passes the hint, if any.
fn keep(text: &str, hint: Option<&str>) -> bool {
    hint.is_none_or(|hint| matches_hint(text, hint))
}

/// Organizations matching the hint.
fn organization_suggestions(snapshot: &Snapshot, hint: Option<&str>) -> Vec<Suggestion> {
    snapshot
        .organizations
        .iter()
        .filter(|o| keep(&o.name, hint))
        .map(|o| Suggestion::new(o.id.as_str(), o.name.as_str()))
        .collect()
}

/// Sections and organization-level widgets, which share the second stage.
fn section_suggestions(organization: &Organization, hint: Option<&str>) -> Vec<Suggestion> {
    let sections = organization
        .sections
        .iter()
        .filter(|s| keep(&s.name, hint))
        .map(|s| Suggestion::new(s.id.as_str(), s.name.as_str()));
    let widgets = organization
        .widgets
        .iter()
        .filter(|w| !w.name.is_empty() && keep(&w.name, hint))
        .map(widget_suggestion);
    sections.chain(widgets).collect()
}

/// Records matching the hint.
fn record_suggestions(records: &[Record], hint: Option<&str>) -> Vec<Suggestion> {
    records
        .iter()
        .filter(|r| keep(&r.name, hint))
        .map(|r| Suggestion::new(r.id.as_str(), r.name.as_str()))
        .collect()
}

/// Widgets addressable under a coordinate: ecosystem defaults first, then
/// the section's own widgets, or the organization's when there is no section.
fn widget_candidates(walker: &Walker<'_>, at: &Coordinate, hint: Option<&str>) -> Vec<Suggestion> {
    let widgets: Vec<Widget> = match (&at.organization, &at.section) {
        (Some(organization), Some(section)) if organization.is_ecosystem => {
            let mut all = default_widgets(section, walker.options.is_rhs);
            all.extend(section.widgets.iter().cloned());
            all
        },
        (_, Some(section)) => section.widgets.clone(),
        (Some(organization), None) => organization.widgets.clone(),
        (None, None) => Vec::new(),
    };
    widgets
        .iter()
        .filter(|w| !w.name.is_empty() && keep(&w.name, hint))
        .map(widget_suggestion)
        .collect()
}

/// Candidates for the token being typed, stage by stage.
pub(crate) async fn suggest(walker: &Walker<'_>, tokens: &Tokens) -> Result<Vec<Suggestion>, Superseded> {
    let boundary = tokens.at_boundary;
    let snapshot = walker.snapshot;

    let Some((org_name, after_org)) = tokens.tokens.split_first() else {
        return Ok(organization_suggestions(snapshot, None));
    };
    let Some(organization) = snapshot.organization_by_name(org_name) else {
        return Ok(organization_suggestions(snapshot, Some(org_name)));
    };
    let at = Coordinate::at_organization(organization.clone());

    let Some((section_name, after_section)) = after_org.split_first() else {
        return Ok(if boundary {
            section_suggestions(organization, None)
        } else {
            organization_suggestions(snapshot, Some(org_name))
        });
    };
    let Some(section) = organization.section_by_name(section_name) else {
        if organization.widget_by_name(section_name).is_some() {
            return widget_stage(walker, at, after_org, boundary, 0).await;
        }
        return Ok(section_suggestions(organization, Some(section_name)));
    };
    let at = at.with_section(section.clone());

    let Some((record_name, after_record)) = after_section.split_first() else {
        if boundary {
            let records = walker.records(section).await?.unwrap_or_default();
            return Ok(record_suggestions(&records, None));
        }
        return Ok(section_suggestions(organization, Some(section_name)));
    };
    let records = walker.records(section).await?.unwrap_or_default();
    let Some(record) = records.iter().find(|r| r.name == *record_name) else {
        return Ok(record_suggestions(&records, Some(record_name)));
    };
    if after_record.is_empty() && !boundary {
        return Ok(record_suggestions(&records, Some(record_name)));
    }

    widget_stage(walker, at.with_record(record.clone()), after_record, boundary, 0).await
}

/// Suggestions from the widget stage on. Boxed because accordions re-enter it.
pub(crate) fn widget_stage<'a>(
    walker: &'a Walker<'a>,
    at: Coordinate,
    tokens: &'a [String],
    boundary: bool,
    depth: usize,
) -> Step<'a, Vec<Suggestion>> {
    Box::pin(async move {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(if boundary { widget_candidates(walker, &at, None) } else { Vec::new() });
        };
        let Some((widget, is_issues)) = resolver::find_widget(walker, &at, name) else {
            return Ok(widget_candidates(walker, &at, Some(name)));
        };

        if boundary {
            widgets::suggest(walker, &at, &widget, rest, is_issues, depth).await
        } else if rest.is_empty() {
            Ok(widget_candidates(walker, &at, Some(name)))
        } else {
            widgets::suggest_with_hint(walker, &at, &widget, rest, is_issues, depth).await
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::Markers;
    use crate::coordinate::ResolveOptions;
    use crate::fetch::MemoryFetcher;
    use crate::guard::Ticket;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "organizations": [
                {
                    "id": "o1",
                    "name": "Acme",
                    "sections": [{
                        "id": "s1",
                        "name": "Incidents",
                        "url": "api/incidents",
                        "widgets": [
                            { "type": "text-box", "name": "Severity", "url": "api/severity/:id" },
                            { "type": "table", "name": "Indicators", "url": "api/indicators/:id" }
                        ]
                    }],
                    "widgets": [{ "type": "chart", "name": "Trends", "url": "api/trends" }]
                },
                { "id": "o2", "name": "Acorn Labs" },
                { "id": "o3", "name": "Globex" }
            ]
        }))
        .unwrap()
    }

    async fn run(reference: &str) -> Vec<Suggestion> {
        let snapshot = snapshot();
        let fetcher = MemoryFetcher::new().with(
            "api/incidents",
            json!({ "rows": [{ "id": "r1", "name": "Phishing-Jan" }, { "id": "r2", "name": "Phishing-Feb" }] }),
        );
        let ticket = Ticket::detached();
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        suggest(&walker, &Tokens::from_reference(reference, &Markers::default())).await.unwrap()
    }

    fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.text.as_str()).collect()
    }

    #[tokio::test]
    async fn partial_organization_filters_case_insensitively() {
        assert_eq!(texts(&run("ac").await), ["Acme", "Acorn Labs"]);
    }

    #[tokio::test]
    async fn empty_reference_lists_every_organization() {
        assert_eq!(run("").await.len(), 3);
    }

    #[tokio::test]
    async fn boundary_after_organization_offers_sections_and_widgets() {
        assert_eq!(texts(&run("Acme.").await), ["Incidents", "Trends"]);
    }

    #[tokio::test]
    async fn boundary_after_section_offers_records() {
        assert_eq!(texts(&run("Acme.Incidents.").await), ["Phishing-Jan", "Phishing-Feb"]);
    }

    #[tokio::test]
    async fn partial_record_filters() {
        assert_eq!(texts(&run("Acme.Incidents.feb").await), ["Phishing-Feb"]);
    }

    #[tokio::test]
    async fn boundary_after_record_offers_widgets() {
        let suggestions = run("Acme.Incidents.Phishing-Jan.").await;
        assert_eq!(texts(&suggestions), ["Severity", "Indicators"]);
        assert_eq!(suggestions[0].id, "Severity-text-box");
    }

    #[tokio::test]
    async fn partial_widget_filters() {
        assert_eq!(texts(&run("Acme.Incidents.Phishing-Jan.ind").await), ["Indicators"]);
    }
}
