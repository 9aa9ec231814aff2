//! Knowledge base entities.
//!
//! An [`Entity`] stores its values under concrete field names (usually
//! URIs). Callers never hard-code those names: they ask for a logical
//! [`Field`] and a [`FieldMapping`] resolves it, so the same code works
//! against knowledge bases that keep labels under `rdfs:label`,
//! `skos:prefLabel` or anything else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `rdfs:label`
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdf:type`
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdfs:seeAlso`
pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";

/// A logical field, resolved to a concrete name by a [`FieldMapping`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Label,
    Type,
    Redirect,
    Other(String),
}

/// Concrete field names used for the logical fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub label_field: String,
    pub type_field: String,
    pub redirect_field: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            label_field: RDFS_LABEL.to_string(),
            type_field: RDF_TYPE.to_string(),
            redirect_field: RDFS_SEE_ALSO.to_string(),
        }
    }
}

impl FieldMapping {
    /// The concrete field name for a logical field.
    pub fn resolve<'a>(&'a self, field: &'a Field) -> &'a str {
        match field {
            Field::Label => &self.label_field,
            Field::Type => &self.type_field,
            Field::Redirect => &self.redirect_field,
            Field::Other(name) => name,
        }
    }
}

/// A literal value with an optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Text {
    pub fn new(value: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            value: value.into(),
            language: language.map(str::to_string),
        }
    }
}

/// An entity of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    texts: BTreeMap<String, Vec<Text>>,
    #[serde(default)]
    references: BTreeMap<String, Vec<String>>,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            texts: BTreeMap::new(),
            references: BTreeMap::new(),
        }
    }

    /// Add a literal value under a concrete field name.
    pub fn with_text(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
        language: Option<&str>,
    ) -> Self {
        self.texts
            .entry(field.into())
            .or_default()
            .push(Text::new(value, language));
        self
    }

    /// Add a reference (entity id or URI) under a concrete field name.
    pub fn with_reference(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.references
            .entry(field.into())
            .or_default()
            .push(target.into());
        self
    }

    /// Literal values of a logical field.
    pub fn texts(&self, mapping: &FieldMapping, field: &Field) -> &[Text] {
        self.texts
            .get(mapping.resolve(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// References of a logical field.
    pub fn references(&self, mapping: &FieldMapping, field: &Field) -> &[String] {
        self.references
            .get(mapping.resolve(field))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn labels(&self, mapping: &FieldMapping) -> &[Text] {
        self.texts(mapping, &Field::Label)
    }

    pub fn types(&self, mapping: &FieldMapping) -> &[String] {
        self.references(mapping, &Field::Type)
    }

    pub fn redirects(&self, mapping: &FieldMapping) -> &[String] {
        self.references(mapping, &Field::Redirect)
    }

    /// Labels usable for `language`: those in that language or without one.
    /// Falls back to all labels when none qualify.
    pub fn labels_for(&self, mapping: &FieldMapping, language: Option<&str>) -> Vec<&Text> {
        let labels = self.labels(mapping);
        let matching: Vec<&Text> = labels
            .iter()
            .filter(|l| language_matches(l.language.as_deref(), language))
            .collect();
        if matching.is_empty() {
            labels.iter().collect()
        } else {
            matching
        }
    }

}

/// Whether a value tagged `value_language` is usable for a query in
/// `query_language`. Untagged values match every language and an untagged
/// query matches every value.
pub fn language_matches(value_language: Option<&str>, query_language: Option<&str>) -> bool {
    match (value_language, query_language) {
        (Some(value), Some(query)) => same_language(value, query),
        _ => true,
    }
}

/// Compare BCP 47 tags on their primary subtag, case-insensitively.
fn same_language(a: &str, b: &str) -> bool {
    let primary = |tag: &str| tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
    primary(a) == primary(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zealand() -> Entity {
        Entity::new("NewZealand")
            .with_text(RDFS_LABEL, "Neuseeland", Some("de"))
            .with_text(RDFS_LABEL, "New Zealand", Some("en"))
            .with_text(RDFS_LABEL, "Aotearoa", None)
            .with_reference(RDF_TYPE, "http://dbpedia.org/ontology/Country")
    }

    #[test]
    fn test_default_mapping_resolves_rdfs() {
        let mapping = FieldMapping::default();
        assert_eq!(mapping.resolve(&Field::Label), RDFS_LABEL);
        assert_eq!(mapping.resolve(&Field::Type), RDF_TYPE);
        assert_eq!(mapping.resolve(&Field::Redirect), RDFS_SEE_ALSO);
        assert_eq!(mapping.resolve(&Field::Other("x:y".into())), "x:y");
    }

    #[test]
    fn test_remapped_label_field() {
        let mapping = FieldMapping {
            label_field: "skos:prefLabel".into(),
            ..Default::default()
        };
        let entity = Entity::new("a").with_text("skos:prefLabel", "Alpha", None);
        assert_eq!(entity.labels(&mapping)[0].value, "Alpha");
        assert!(entity.labels(&FieldMapping::default()).is_empty());
    }

    #[test]
    fn test_labels_for_language() {
        let mapping = FieldMapping::default();
        let entity = zealand();
        let en: Vec<&str> = entity
            .labels_for(&mapping, Some("en-NZ"))
            .iter()
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(en, vec!["New Zealand", "Aotearoa"]);
        assert_eq!(entity.labels_for(&mapping, None).len(), 3);
    }

    #[test]
    fn test_labels_for_falls_back_to_all() {
        let mapping = FieldMapping::default();
        let entity = Entity::new("x").with_text(RDFS_LABEL, "Geologe", Some("de"));
        assert_eq!(entity.labels_for(&mapping, Some("en")).len(), 1);
    }

    #[test]
    fn test_types_and_redirects() {
        let mapping = FieldMapping::default();
        let entity = zealand().with_reference(RDFS_SEE_ALSO, "Aotearoa");
        assert_eq!(entity.types(&mapping).len(), 1);
        assert_eq!(entity.redirects(&mapping), ["Aotearoa".to_string()]);
    }

    #[test]
    fn test_deserialize_entity() {
        let json = format!(
            r#"{{"id": "Geologist", "texts": {{"{RDFS_LABEL}": [{{"value": "Geologist", "language": "en"}}]}}}}"#
        );
        let entity: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(entity.labels(&FieldMapping::default())[0].value, "Geologist");
        assert!(entity.redirects(&FieldMapping::default()).is_empty());
    }
}
