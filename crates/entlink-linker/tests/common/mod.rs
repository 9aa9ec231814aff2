//! Common test utilities for linker integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use entlink_linker::{EntityLinker, EntityLinkerConfig};
use entlink_nlp::{
    AnalysedText, LexicalCategory, PhraseTag, Pos, PosTag, SimpleTokenizer, TextProcessingConfig,
};
use entlink_search::{
    Entity, FieldMapping, InMemorySearcher, SharedSearcher, RDFS_LABEL, RDFS_SEE_ALSO, RDF_TYPE,
};

pub const MARSHALL: &str = "Dr. Patrick Marshall (1869 - November 1950) was a geologist who \
                            lived in New Zealand and worked at the University of Otago.";

pub const PERSON: &str = "http://dbpedia.org/ontology/Person";
pub const PLACE: &str = "http://dbpedia.org/ontology/Place";
pub const ORGANISATION: &str = "http://dbpedia.org/ontology/Organisation";
pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

/// The Marshall sentence with noun phrase chunks and POS tags.
pub fn marshall_document() -> AnalysedText {
    let mut at = AnalysedText::new(MARSHALL);
    at.add_sentence(0, MARSHALL.len());

    for phrase in [
        "Dr. Patrick Marshall",
        "geologist",
        "New Zealand",
        "the University of Otago",
    ] {
        let start = MARSHALL.find(phrase).unwrap();
        at.add_chunk(start, start + phrase.len())
            .annotate_phrase(PhraseTag::new("NP", LexicalCategory::Noun), 1.0);
    }

    let mut offset = 0;
    for (word, tag, pos) in [
        ("Dr", "ABBR", Pos::Abbreviation),
        (".", "$.", Pos::Point),
        ("Patrick", "NP", Pos::ProperNoun),
        ("Marshall", "NP", Pos::ProperNoun),
        ("(", "$(", Pos::OpenBracket),
        ("1869", "CD", Pos::Numeral),
        ("-", "$-", Pos::Hyphen),
        ("November", "NP", Pos::ProperNoun),
        ("1950", "CD", Pos::Numeral),
        (")", "$)", Pos::CloseBracket),
        ("was", "VBD", Pos::AuxiliaryVerb),
        ("a", "DT", Pos::Article),
        ("geologist", "NN", Pos::CommonNoun),
        ("who", "WP", Pos::PersonalPronoun),
        ("lived", "VVD", Pos::MainVerb),
        ("in", "IN", Pos::Preposition),
        ("New", "JJ", Pos::Adjective),
        ("Zealand", "NP", Pos::ProperNoun),
        ("and", "CC", Pos::Conjunction),
        ("worked", "VVD", Pos::MainVerb),
        ("at", "IN", Pos::Preposition),
        ("the", "DT", Pos::Article),
        ("University", "NN", Pos::CommonNoun),
        ("of", "IN", Pos::Preposition),
        ("Otago", "NP", Pos::ProperNoun),
        (".", "$.", Pos::Point),
    ] {
        let start = offset + MARSHALL[offset..].find(word).unwrap();
        offset = start + word.len();
        at.add_token(start, offset)
            .annotate_pos(PosTag::new(tag, pos), 1.0);
    }
    at
}

fn labelled(id: &str, label: &str, language: &str) -> Entity {
    Entity::new(id).with_text(RDFS_LABEL, label, Some(language))
}

/// Knowledge base for the Marshall sentence.
pub fn marshall_entities() -> Vec<Entity> {
    vec![
        labelled("PatrickMarshall", "Patrick Marshall", "en").with_reference(RDF_TYPE, PERSON),
        labelled("Geologist", "Geologist", "en").with_reference(RDFS_SEE_ALSO, "redirect:Geologist"),
        labelled("redirect:Geologist", "Geologe", "de"),
        labelled("NewZealand", "New Zealand", "en").with_reference(RDF_TYPE, PLACE),
        labelled("UniversityOfOtago", "University of Otago", "en")
            .with_reference(RDF_TYPE, ORGANISATION),
        labelled("UniversityOfOtago_Texas", "University of Otago (Texas)", "en")
            .with_reference(RDF_TYPE, ORGANISATION),
        // Match single tokens of "University of Otago" only
        labelled("University", "University", "en").with_reference(RDF_TYPE, CONCEPT),
        labelled("Otago", "Otago", "en").with_reference(RDF_TYPE, PLACE),
        labelled("Otago_Texas", "Otago (Texas)", "en")
            .with_text(RDFS_LABEL, "Otago", Some("en"))
            .with_reference(RDF_TYPE, PLACE),
    ]
}

pub fn marshall_searcher() -> InMemorySearcher {
    InMemorySearcher::new(FieldMapping::default())
        .with_entities(marshall_entities())
        .unwrap()
}

/// Noun processing only (Scenario A configuration).
pub fn nouns() -> TextProcessingConfig {
    TextProcessingConfig::new().with_pos([])
}

/// Proper noun processing only (Scenario B configuration).
pub fn proper_nouns() -> TextProcessingConfig {
    TextProcessingConfig::new().with_lexical_categories([])
}

pub fn linker(
    searcher: SharedSearcher,
    text_config: TextProcessingConfig,
    config: EntityLinkerConfig,
) -> EntityLinker {
    EntityLinker::new(searcher, Arc::new(SimpleTokenizer), text_config, config).unwrap()
}
