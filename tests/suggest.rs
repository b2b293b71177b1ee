mod common;

use hyperref::config::Markers;
use hyperref::relative::ChannelContext;
use hyperref::tokenizer::{Tokens, apply_suggestion};
use hyperref::{MAX_SUGGESTION_LENGTH, ResolveOptions, Ticket};

use common::{engine, resolve, suggest, texts, tokens};

#[tokio::test]
async fn partial_organization_matches_case_insensitively() {
    let (engine, _) = engine();
    assert_eq!(texts(&suggest(&engine, "Ac").await), ["Acme"]);
    assert_eq!(texts(&suggest(&engine, "O").await), ["Globex", "Commons"]);
}

#[tokio::test]
async fn boundary_offers_every_candidate_of_the_next_stage() {
    let (engine, _) = engine();
    assert_eq!(texts(&suggest(&engine, "Acme.").await), ["Incidents", "Key Facts"]);
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.").await), ["Phishing-Jan", "Phishing-Feb"]);
    assert_eq!(
        texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.").await),
        ["Severity", "Indicators", "Notes", "Timeline", "Attack Graph", "Related"]
    );
}

#[tokio::test]
async fn without_boundary_the_last_token_filters() {
    let (engine, _) = engine();
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.feb").await), ["Phishing-Feb"]);
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.in").await), ["Indicators", "Timeline"]);
}

#[tokio::test]
async fn ecosystem_sections_offer_default_widgets_first() {
    let (engine, _) = engine();
    let suggestions = suggest(&engine, "Commons.Issues.Supply Chain.").await;
    assert_eq!(
        texts(&suggestions),
        ["Objectives And Research Area", "Outcomes", "Participants And Roles", "Support Technology Data", "Attachments"]
    );
    assert_eq!(suggestions[2].id, "Participants And Roles-paginated-table");
}

#[tokio::test]
async fn table_offers_columns_then_rows() {
    let (engine, _) = engine();
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Indicators.").await), ["Type", "Value"]);
    assert_eq!(
        texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Indicators.Value.").await),
        ["login-portal", "mail-relay"]
    );
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Indicators.Value.mail").await), ["mail-relay"]);
}

#[tokio::test]
async fn paginated_table_columns_match_resolve_fields() {
    let (engine, _) = engine();
    let columns = suggest(&engine, "Commons.Issues.Supply Chain.Participants And Roles.").await;
    let ids: Vec<&str> = columns.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["user", "roles"]);
    assert_eq!(texts(&columns), ["User", "Roles"]);

    let roles = suggest(&engine, "Commons.Issues.Supply Chain.Participants And Roles.roles.").await;
    assert_eq!(texts(&roles), ["lead", "analyst", "reviewer"]);

    let organizations = suggest(&engine, "Commons.Issues.Supply Chain.Support Technology Data.organization.glo").await;
    assert_eq!(texts(&organizations), ["Globex"]);
    assert_eq!(organizations[0].id, "o2-0");
}

#[tokio::test]
async fn graph_offers_nodes_description_then_info_sections() {
    let (engine, _) = engine();
    assert_eq!(
        texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Attack Graph.").await),
        ["Mailbox", "Payroll Server", "Overview"]
    );
    let info = suggest(&engine, "Acme.Incidents.Phishing-Jan.Attack Graph.Mailbox.").await;
    assert_eq!(texts(&info), ["Description"]);
    assert_eq!(info[0].id, "g1-s1-r1-node-info-widget");
}

#[tokio::test]
async fn accordion_elements_lead_into_the_target_record() {
    let (engine, _) = engine();
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Related.").await), ["Ransomware-Q3"]);
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Related.Ransomware-Q3.").await), ["Summary"]);
    assert_eq!(texts(&suggest(&engine, "Acme.Incidents.Phishing-Jan.Related.Ransomware-Q3.sum").await), ["Summary"]);
}

#[tokio::test]
async fn timeline_offers_labels_then_texts() {
    let (engine, _) = engine();
    let suggestions = suggest(&engine, "Acme.Incidents.Phishing-Jan.Timeline.").await;
    assert_eq!(texts(&suggestions), ["Jan 3", "Jan 5", "First report", "Contained"]);
    assert_eq!(suggestions[0].id, "t1_label");
    assert_eq!(suggestions[3].id, "t2_text");
}

#[tokio::test]
async fn long_list_items_are_shortened() {
    let (engine, _) = engine();
    for suggestion in suggest(&engine, "Acme.Incidents.Phishing-Jan.Notes.").await {
        assert!(suggestion.text.chars().count() <= MAX_SUGGESTION_LENGTH + 3);
    }
}

#[tokio::test]
async fn every_resolvable_reference_is_suggested_by_its_last_token() {
    let (engine, _) = engine();
    let references = [
        "Acme",
        "Acme.Incidents",
        "Acme.Incidents.Phishing-Jan",
        "Acme.Incidents.Phishing-Jan.Severity",
        "Acme.Incidents.Phishing-Jan.Indicators.Type",
        "Acme.Incidents.Phishing-Jan.Indicators.Value.login-portal",
        "Acme.Incidents.Phishing-Jan.Notes.Mail filter rule added",
        "Acme.Incidents.Phishing-Jan.Timeline.Jan 3",
        "Acme.Incidents.Phishing-Jan.Attack Graph.Mailbox",
        "Acme.Incidents.Phishing-Jan.Attack Graph.Mailbox.Description",
        "Acme.Incidents.Phishing-Jan.Related.Ransomware-Q3",
        "Acme.Incidents.Phishing-Jan.Related.Ransomware-Q3.Summary",
        "Acme.Key Facts",
        "Commons.Issues.Supply Chain.Participants And Roles.user.alice",
        "Commons.Issues.Supply Chain.Support Technology Data.organization.Globex",
        "Commons.Issues.Supply Chain.Outcomes.Vendor inventory published",
    ];
    for reference in references {
        let resolution = resolve(&engine, reference).await;
        assert!(resolution.is_complete(), "{reference} did not resolve: {:?}", resolution.degraded);

        let last = tokens(reference).pop().unwrap();
        let suggestions = suggest(&engine, reference).await;
        assert!(texts(&suggestions).contains(&last.as_str()), "{reference}: {:?}", texts(&suggestions));
    }
}

#[tokio::test]
async fn channel_relative_references_expand_and_offer_the_record() {
    let (engine, _) = engine();
    let channel = ChannelContext { record_id: "r1".to_owned(), section_id: "s1".to_owned() };
    let markers = Markers::default();

    let empty = engine.suggest_in_channel(&Tokens::from_reference("", &markers), &channel, &Ticket::detached()).await.unwrap();
    assert_eq!(texts(&empty), ["Phishing-Jan", "Acme", "Globex", "Commons"]);

    let relative = Tokens::from_reference("Phishing-Jan.", &markers);
    let widgets = engine.suggest_in_channel(&relative, &channel, &Ticket::detached()).await.unwrap();
    assert!(texts(&widgets).contains(&"Severity"));

    let expanded = engine.relative(tokens("Phishing-Jan.Severity"), &channel, &Ticket::detached()).await.unwrap();
    assert!(expanded.is_rhs);
    let options = ResolveOptions { is_rhs: true, ..ResolveOptions::default() };
    let resolution = engine.resolve(&expanded.tokens, &options, &Ticket::detached()).await.unwrap();
    assert_eq!(resolution.coordinate.widget_hash.unwrap().hash, "severity-r1-s1-widget");
}

#[test]
fn accepting_a_suggestion_rewrites_the_reference() {
    let markers = Markers::default();
    let text = "see &(Acme.Inc";
    assert_eq!(apply_suggestion(text, text.len(), &markers, "Incidents").as_deref(), Some("see &(Acme.Incidents"));
}
