//! The resolve walk: organization, then section (or an organization widget),
//! then record, then widget. Each stage only adds to the coordinate; a stage
//! that cannot match its token stops the walk and reports why.
use crate::coordinate::{Coordinate, Resolution};
use crate::ecosystem::default_widget_by_name;
use crate::engine::{Step, Walker};
use crate::error::Unresolved;
use crate::guard::Superseded;
use crate::types::Widget;
use crate::widgets;

/// A walk that stopped at a stage it could not match.
fn stopped(coordinate: Coordinate, consumed: usize, reason: Unresolved) -> Resolution {
    Resolution { consumed, coordinate, degraded: Some(reason) }
}

/// Shift a nested resolution's count by the tokens used before it.
fn offset(resolution: Resolution, by: usize) -> Resolution {
    Resolution { consumed: resolution.consumed.saturating_add(by), ..resolution }
}

/// Name of the innermost thing a coordinate points at.
fn scope_name(at: &Coordinate) -> String {
    at.record
        .as_ref()
        .map(|r| r.name.clone())
        .or_else(|| at.section.as_ref().map(|s| s.name.clone()))
        .or_else(|| at.organization.as_ref().map(|o| o.name.clone()))
        .unwrap_or_default()
}

/// Walk `tokens` from the organization stage down as far as they match.
pub(crate) async fn resolve(walker: &Walker<'_>, tokens: &[String]) -> Result<Resolution, Superseded> {
    let Some((org_name, after_org)) = tokens.split_first() else {
        return Ok(Resolution::default());
    };
    let Some(organization) = walker.snapshot.organization_by_name(org_name) else {
        return Ok(stopped(Coordinate::default(), 0, Unresolved::UnknownOrganization { name: org_name.clone() }));
    };
    let at = Coordinate::at_organization(organization.clone());

    let Some((section_name, after_section)) = after_org.split_first() else {
        return Ok(Resolution { consumed: 1, coordinate: at, degraded: None });
    };
    let Some(section) = organization.section_by_name(section_name) else {
        if organization.widget_by_name(section_name).is_none() {
            let reason = Unresolved::UnknownSection { name: section_name.clone(), organization: organization.name.clone() };
            return Ok(stopped(at, 1, reason));
        }
        return Ok(offset(widget_stage(walker, at, after_org, 0).await?, 1));
    };
    let at = at.with_section(section.clone());

    let Some((record_name, after_record)) = after_section.split_first() else {
        return Ok(Resolution { consumed: 2, coordinate: at, degraded: None });
    };
    let records = walker.records(section).await?.unwrap_or_default();
    let Some(record) = records.into_iter().find(|r| r.name == *record_name) else {
        let reason = Unresolved::UnknownRecord { name: record_name.clone(), section: section.name.clone() };
        return Ok(stopped(at, 2, reason));
    };

    Ok(offset(widget_stage(walker, at.with_record(record), after_record, 0).await?, 3))
}

/// Widget named `name` under a coordinate, and whether it is one of the
/// synthesized ecosystem widgets. Section widgets win over ecosystem
/// defaults, which win over organization widgets.
pub(crate) fn find_widget(walker: &Walker<'_>, at: &Coordinate, name: &str) -> Option<(Widget, bool)> {
    if let Some(section) = &at.section {
        if let Some(widget) = section.widgets.iter().find(|w| w.name == name) {
            return Some((widget.clone(), false));
        }
        if at.organization.as_ref().is_some_and(|o| o.is_ecosystem)
            && let Some(widget) = default_widget_by_name(section, name, walker.options.is_rhs)
        {
            return Some((widget, true));
        }
    }
    at.organization
        .as_ref()
        .and_then(|o| o.widget_by_name(name))
        .map(|w| (w.clone(), false))
}

/// Resolve a widget name and whatever follows it. `consumed` counts from
/// the first of `tokens`. Boxed because accordions re-enter it.
pub(crate) fn widget_stage<'a>(walker: &'a Walker<'a>, at: Coordinate, tokens: &'a [String], depth: usize) -> Step<'a, Resolution> {
    Box::pin(async move {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(Resolution { consumed: 0, coordinate: at, degraded: None });
        };
        let Some((widget, is_issues)) = find_widget(walker, &at, name) else {
            let reason = Unresolved::UnknownWidget { name: name.clone(), widget: scope_name(&at) };
            return Ok(stopped(at, 0, reason));
        };

        let dispatch = widgets::resolve(walker, &at, &widget, rest, is_issues, depth).await?;
        Ok(dispatch.into_resolution(at.with_widget(widget), 1))
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::coordinate::ResolveOptions;
    use crate::fetch::MemoryFetcher;
    use crate::guard::Ticket;
    use crate::snapshot::Snapshot;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "organizations": [{
                "id": "o1",
                "name": "Acme",
                "sections": [{
                    "id": "s1",
                    "name": "Incidents",
                    "url": "api/incidents",
                    "widgets": [{ "type": "text-box", "name": "Severity", "url": "api/severity/:id" }]
                }],
                "widgets": [{ "type": "chart", "name": "Trends", "url": "api/trends" }]
            }]
        }))
        .unwrap()
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::new().with("api/incidents", json!({ "rows": [{ "id": "r1", "name": "Phishing-Jan" }] }))
    }

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    async fn run(parts: &[&str]) -> Resolution {
        let snapshot = snapshot();
        let fetcher = fetcher();
        let ticket = Ticket::detached();
        let walker = Walker { fetcher: &fetcher, options: ResolveOptions::default(), snapshot: &snapshot, ticket: &ticket };
        resolve(&walker, &tokens(parts)).await.unwrap()
    }

    #[tokio::test]
    async fn full_reference_reaches_widget_anchor() {
        let resolution = run(&["Acme", "Incidents", "Phishing-Jan", "Severity"]).await;
        assert_eq!(resolution.consumed, 4);
        assert!(resolution.is_complete());
        let hash = resolution.coordinate.widget_hash.unwrap();
        assert_eq!(hash.hash, "severity-r1-s1-widget");
    }

    #[tokio::test]
    async fn unknown_organization_consumes_nothing() {
        let resolution = run(&["Nope", "Incidents"]).await;
        assert_eq!(resolution.consumed, 0);
        assert!(resolution.coordinate.is_empty());
        assert_eq!(resolution.degraded, Some(Unresolved::UnknownOrganization { name: "Nope".to_owned() }));
    }

    #[tokio::test]
    async fn unknown_record_keeps_section() {
        let resolution = run(&["Acme", "Incidents", "Phishing-Feb"]).await;
        assert_eq!(resolution.consumed, 2);
        assert_eq!(resolution.coordinate.section.unwrap().id, "s1");
        assert!(resolution.coordinate.record.is_none());
        assert!(matches!(resolution.degraded, Some(Unresolved::UnknownRecord { .. })));
    }

    #[tokio::test]
    async fn organization_widget_stands_in_for_section() {
        let resolution = run(&["Acme", "Trends"]).await;
        assert_eq!(resolution.consumed, 2);
        assert!(resolution.coordinate.section.is_none());
        assert_eq!(resolution.coordinate.widget.unwrap().name, "Trends");
    }

    #[tokio::test]
    async fn unknown_widget_stops_at_record() {
        let resolution = run(&["Acme", "Incidents", "Phishing-Jan", "Missing"]).await;
        assert_eq!(resolution.consumed, 3);
        assert_eq!(resolution.coordinate.record.unwrap().name, "Phishing-Jan");
        assert_eq!(
            resolution.degraded,
            Some(Unresolved::UnknownWidget { name: "Missing".to_owned(), widget: "Phishing-Jan".to_owned() })
        );
    }

    #[tokio::test]
    async fn neither_section_nor_widget_is_unknown_section() {
        let resolution = run(&["Acme", "Audits"]).await;
        assert_eq!(resolution.consumed, 1);
        assert!(matches!(resolution.degraded, Some(Unresolved::UnknownSection { .. })));
    }
}
