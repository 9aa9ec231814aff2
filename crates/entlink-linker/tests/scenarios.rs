//! End-to-end linking of the Marshall sentence.

mod common;

use std::sync::Arc;

use common::*;
use entlink_linker::{EntityLinkerConfig, RedirectMode};
use entlink_nlp::{AnalysedText, Pos, PosTag, Span, TextProcessingConfig};
use entlink_search::testing::FlakySearcher;
use entlink_search::{Entity, FieldMapping, InMemorySearcher, RDFS_LABEL, RDFS_SEE_ALSO};

fn follow() -> EntityLinkerConfig {
    EntityLinkerConfig::default().with_redirect_mode(RedirectMode::Follow)
}

#[tokio::test]
async fn nouns_with_redirects_followed() {
    let linker = linker(Arc::new(marshall_searcher()), nouns(), follow());
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();

    assert_eq!(
        result.surface_texts(),
        vec![
            "Patrick Marshall",
            "geologist",
            "New Zealand",
            "University of Otago"
        ]
    );
    assert_eq!(
        result.get("Patrick Marshall").unwrap().suggestion_ids(),
        vec!["PatrickMarshall"]
    );

    let geologist = result.get("geologist").unwrap();
    assert_eq!(geologist.suggestion_ids(), vec!["redirect:Geologist"]);
    assert_eq!(
        geologist.top().unwrap().redirected_from.as_deref(),
        Some("Geologist")
    );

    assert_eq!(
        result.get("New Zealand").unwrap().suggestion_ids(),
        vec!["NewZealand"]
    );

    let otago = result.get("University of Otago").unwrap();
    assert_eq!(
        otago.suggestion_ids(),
        vec!["UniversityOfOtago", "UniversityOfOtago_Texas"]
    );
    assert!(otago.suggestions[0].score >= otago.suggestions[1].score);
    assert!(!result.report.has_failures());
}

#[tokio::test]
async fn proper_nouns_only() {
    let linker = linker(Arc::new(marshall_searcher()), proper_nouns(), follow());
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();

    assert_eq!(
        result.surface_texts(),
        vec!["Patrick Marshall", "New Zealand", "University of Otago"]
    );
    assert!(result.get("geologist").is_none());
    assert_eq!(
        result.get("University of Otago").unwrap().suggestion_ids(),
        vec!["UniversityOfOtago", "UniversityOfOtago_Texas"]
    );
    let otago = result.get("University of Otago").unwrap();
    assert_eq!(otago.occurrences, vec![Span::new(103, 122)]);
}

#[tokio::test]
async fn redirects_ignored() {
    let linker = linker(
        Arc::new(marshall_searcher()),
        nouns(),
        EntityLinkerConfig::default(),
    );
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert_eq!(
        result.get("geologist").unwrap().suggestion_ids(),
        vec!["Geologist"]
    );
}

#[tokio::test]
async fn redirect_targets_added_when_their_label_matches() {
    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([
            Entity::new("Geologist")
                .with_text(RDFS_LABEL, "Geologist", Some("en"))
                .with_reference(RDFS_SEE_ALSO, "Geologist_(occupation)")
                .with_reference(RDFS_SEE_ALSO, "redirect:Geologist"),
            Entity::new("Geologist_(occupation)")
                .with_text(RDFS_LABEL, "Geologist (occupation)", Some("en")),
            Entity::new("redirect:Geologist").with_text(RDFS_LABEL, "Geologe", Some("de")),
        ])
        .unwrap();
    let linker = linker(
        Arc::new(searcher),
        nouns(),
        EntityLinkerConfig::default().with_redirect_mode(RedirectMode::Add),
    );
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();

    let geologist = result.get("geologist").unwrap();
    // The occupation entity is also a direct hit (score 0.5), the redirect
    // carries the source score 1.0 and wins the deduplication.
    assert_eq!(
        geologist.suggestion_ids(),
        vec!["Geologist", "Geologist_(occupation)"]
    );
    assert_eq!(geologist.suggestions[1].score, 1.0);
    assert_eq!(
        geologist.suggestions[1].redirected_from.as_deref(),
        Some("Geologist")
    );
}

#[tokio::test]
async fn follow_keeps_candidate_with_several_targets() {
    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([
            Entity::new("Geologist")
                .with_text(RDFS_LABEL, "Geologist", Some("en"))
                .with_reference(RDFS_SEE_ALSO, "a")
                .with_reference(RDFS_SEE_ALSO, "b"),
            Entity::new("a").with_text(RDFS_LABEL, "A", None),
            Entity::new("b").with_text(RDFS_LABEL, "B", None),
        ])
        .unwrap();
    let linker = linker(Arc::new(searcher), nouns(), follow());
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert_eq!(
        result.get("geologist").unwrap().suggestion_ids(),
        vec!["Geologist"]
    );
}

#[tokio::test]
async fn follow_is_one_hop() {
    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([
            Entity::new("Geologist")
                .with_text(RDFS_LABEL, "Geologist", Some("en"))
                .with_reference(RDFS_SEE_ALSO, "hop1"),
            Entity::new("hop1")
                .with_text(RDFS_LABEL, "Hop", None)
                .with_reference(RDFS_SEE_ALSO, "hop2"),
            Entity::new("hop2").with_text(RDFS_LABEL, "Hop", None),
        ])
        .unwrap();
    let linker = linker(Arc::new(searcher), nouns(), follow());
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert_eq!(
        result.get("geologist").unwrap().suggestion_ids(),
        vec!["hop1"]
    );
}

#[tokio::test]
async fn type_constraints_filter_suggestions() {
    let linker = linker(
        Arc::new(marshall_searcher()),
        nouns(),
        follow().with_type_constraints([PLACE, PERSON]),
    );
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert_eq!(
        result.surface_texts(),
        vec!["Patrick Marshall", "New Zealand"]
    );
}

#[tokio::test]
async fn max_suggestions_truncates() {
    let linker = linker(
        Arc::new(marshall_searcher()),
        nouns(),
        follow().with_max_suggestions(1),
    );
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert_eq!(
        result.get("University of Otago").unwrap().suggestion_ids(),
        vec!["UniversityOfOtago"]
    );
}

#[tokio::test]
async fn partial_label_hits_only_pass_a_lower_floor() {
    let lenient = linker(
        Arc::new(marshall_searcher()),
        nouns(),
        follow()
            .with_min_match_factor(0.3)
            .with_max_suggestions(5),
    );
    let result = lenient
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    let ids = result.get("University of Otago").unwrap().suggestion_ids();
    assert_eq!(ids.len(), 5);
    assert_eq!(ids[..2], ["UniversityOfOtago", "UniversityOfOtago_Texas"]);
    assert!(ids.iter().any(|id| *id == "Otago_Texas"));
}

#[tokio::test]
async fn match_factor_floor() {
    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([
            Entity::new("UniversityOfOtago").with_text(RDFS_LABEL, "University of Otago", None),
            Entity::new("Otago").with_text(RDFS_LABEL, "Otago", None),
        ])
        .unwrap();
    let searcher = Arc::new(searcher);

    // "Otago" covers one of three mention tokens
    let strict = linker(searcher.clone(), nouns(), EntityLinkerConfig::default());
    let result = strict.process(&marshall_document(), None).await.unwrap();
    assert_eq!(
        result.get("University of Otago").unwrap().suggestion_ids(),
        vec!["UniversityOfOtago"]
    );

    let lenient = linker(
        searcher,
        nouns(),
        EntityLinkerConfig::default().with_min_match_factor(0.3),
    );
    let result = lenient.process(&marshall_document(), None).await.unwrap();
    assert_eq!(
        result.get("University of Otago").unwrap().suggestion_ids(),
        vec!["UniversityOfOtago", "Otago"]
    );
}

#[tokio::test]
async fn repeated_surface_text_merged() {
    let text = format!("I am Otago and{}Otago", " ".repeat(26));
    let mut at = AnalysedText::new(text);
    at.add_token(5, 10)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
    at.add_token(11, 14)
        .annotate_pos(PosTag::new("CC", Pos::Conjunction), 1.0);
    at.add_token(40, 45)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);

    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([Entity::new("Otago").with_text(RDFS_LABEL, "Otago", None)])
        .unwrap();
    let flaky = Arc::new(FlakySearcher::new(Arc::new(searcher)));
    let linker = linker(
        flaky.clone(),
        TextProcessingConfig::default(),
        EntityLinkerConfig::default(),
    );
    let result = linker.process(&at, None).await.unwrap();

    assert_eq!(result.len(), 1);
    let otago = result.get("Otago").unwrap();
    assert_eq!(otago.occurrences, vec![Span::new(5, 10), Span::new(40, 45)]);
    assert_eq!(otago.suggestion_ids(), vec!["Otago"]);
    assert_eq!(flaky.queries(), vec!["Otago"]);
}

#[tokio::test]
async fn case_insensitive_merge() {
    let mut at = AnalysedText::new("OTAGO and Otago");
    at.add_token(0, 5)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
    at.add_token(6, 9)
        .annotate_pos(PosTag::new("CC", Pos::Conjunction), 1.0);
    at.add_token(10, 15)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
    let searcher = InMemorySearcher::new(FieldMapping::default())
        .with_entities([Entity::new("Otago").with_text(RDFS_LABEL, "Otago", None)])
        .unwrap();
    let searcher = Arc::new(searcher);

    let insensitive = linker(
        searcher.clone(),
        TextProcessingConfig::default(),
        EntityLinkerConfig::default(),
    );
    let result = insensitive.process(&at, None).await.unwrap();
    assert_eq!(result.surface_texts(), vec!["OTAGO"]);
    assert_eq!(result.get("OTAGO").unwrap().occurrences.len(), 2);

    let sensitive = linker(
        searcher,
        TextProcessingConfig::default().with_case_sensitive_matching(true),
        EntityLinkerConfig::default(),
    );
    let result = sensitive.process(&at, None).await.unwrap();
    assert_eq!(result.surface_texts(), vec!["OTAGO", "Otago"]);
}

#[tokio::test]
async fn nothing_configured_links_nothing() {
    let flaky = Arc::new(FlakySearcher::new(Arc::new(marshall_searcher())));
    let linker = linker(
        flaky.clone(),
        TextProcessingConfig::new()
            .with_lexical_categories([])
            .with_pos([]),
        follow(),
    );
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    assert!(result.is_empty());
    assert!(flaky.queries().is_empty());
}

#[tokio::test]
async fn short_mentions_never_searched() {
    let mut at = AnalysedText::new("Al met Patrick Marshall");
    at.add_token(0, 2)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
    at.add_token(3, 6)
        .annotate_pos(PosTag::new("VVD", Pos::MainVerb), 1.0);
    at.add_token(7, 14)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);
    at.add_token(15, 23)
        .annotate_pos(PosTag::new("NP", Pos::ProperNoun), 1.0);

    let flaky = Arc::new(FlakySearcher::new(Arc::new(marshall_searcher())));
    let linker = linker(
        flaky.clone(),
        TextProcessingConfig::default(),
        EntityLinkerConfig::default(),
    );
    let result = linker.process(&at, Some("en")).await.unwrap();
    assert_eq!(result.surface_texts(), vec!["Patrick Marshall"]);
    assert_eq!(flaky.queries(), vec!["Patrick Marshall"]);
}

#[tokio::test]
async fn result_serializes_in_document_order() {
    let linker = linker(Arc::new(marshall_searcher()), nouns(), follow());
    let result = linker
        .process(&marshall_document(), Some("en"))
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["report"]["linked_entities"], 4);
    assert_eq!(
        json["linked"]["geologist"]["suggestions"][0]["entity_id"],
        "redirect:Geologist"
    );
}
