// Glossaire
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use glossary_core::model::{ModelError, ModelResult};
use serde::de::{DeserializeOwned, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Maximum length, in characters, of the short text columns in the schema.
pub(crate) const MAX_SHORT_TEXT_LENGTH: usize = 255;

/// Domain assigned to terms that do not specify one.
pub(crate) const DEFAULT_DOMAIN: &str = "Disruptive Technologies";

/// Subdomains assigned to terms that do not specify any.
pub(crate) const DEFAULT_SUBDOMAINS: [&str; 3] = ["Big Data", "AI", "Blockchain"];

/// Identifier of a term, assigned by the database on creation.
#[derive(
    Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub(crate) struct TermId(i64);

impl TermId {
    /// Returns the identifier as stored in the database.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

/// Free-form text that fits in one of the short text columns of the schema.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct ShortText(String);

impl ShortText {
    /// Creates a new short text from an untrusted string `s`, making sure it is not too long.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();

        let length = s.chars().count();
        if length > MAX_SHORT_TEXT_LENGTH {
            return Err(ModelError(format!(
                "Text is too long ({} characters, maximum is {})",
                length, MAX_SHORT_TEXT_LENGTH
            )));
        }

        Ok(Self(s))
    }

    /// Returns a string view of the text.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ShortText {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        ShortText::new(s)
    }
}

#[cfg(test)]
impl From<&'static str> for ShortText {
    /// Creates a new short text from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        ShortText::new(s).expect("Hardcoded texts must be valid")
    }
}

/// The English or French wording of a term.
///
/// Terms are trimmed of leading and trailing whitespace on construction and cannot be empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct TermText(String);

impl TermText {
    /// Creates a new term from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: AsRef<str>>(s: S) -> ModelResult<Self> {
        let s = s.as_ref().trim();

        if s.is_empty() {
            return Err(ModelError("Term cannot be empty".to_owned()));
        }
        let s = ShortText::new(s)?;

        Ok(Self(s.0))
    }

    /// Returns a string view of the term.
    pub(crate) fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for TermText {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        TermText::new(s)
    }
}

#[cfg(test)]
impl From<&'static str> for TermText {
    /// Creates a new term from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        assert_eq!(s, s.trim(), "Hardcoded terms must not need trimming");
        TermText::new(s).expect("Hardcoded terms must be valid")
    }
}

/// A deserialization visitor for the validated text types.
struct TextVisitor<T>(PhantomData<T>);

impl<T> Visitor<'_> for TextVisitor<T>
where
    T: TryFrom<String, Error = ModelError>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        T::try_from(v.to_owned()).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        T::try_from(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for ShortText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(TextVisitor(PhantomData))
    }
}

impl<'de> Deserialize<'de> for TermText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(TextVisitor(PhantomData))
    }
}

/// Lexical relations of a term: maps a relation kind (such as "hypernym") to the related terms.
pub(crate) type LexicalRelations = BTreeMap<String, Vec<String>>;

/// All the properties of a glossary term except for its identifier.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct TermFields {
    /// Domain the term belongs to.
    pub(crate) domain: ShortText,

    /// Ordered list of subdomains the term belongs to.
    pub(crate) subdomains: Vec<String>,

    /// The term in English.
    pub(crate) english_term: TermText,

    /// The term in French.
    pub(crate) french_term: TermText,

    /// Spelling or morphological variant in English.
    pub(crate) variant_en: Option<ShortText>,

    /// Spelling or morphological variant in French.
    pub(crate) variant_fr: Option<ShortText>,

    /// Near-synonym in English.
    pub(crate) near_synonym_en: Option<ShortText>,

    /// Near-synonym in French.
    pub(crate) near_synonym_fr: Option<ShortText>,

    /// Definition in English.
    pub(crate) definition_en: Option<String>,

    /// Definition in French.
    pub(crate) definition_fr: Option<String>,

    /// Words that typically co-occur with the English term.
    pub(crate) syntactic_cooccurrence_en: Option<Vec<String>>,

    /// Words that typically co-occur with the French term.
    pub(crate) syntactic_cooccurrence_fr: Option<Vec<String>>,

    /// Lexical relations of the English term.
    pub(crate) lexical_relations_en: Option<LexicalRelations>,

    /// Lexical relations of the French term.
    pub(crate) lexical_relations_fr: Option<LexicalRelations>,

    /// Usage note in English.
    pub(crate) note_en: Option<String>,

    /// Usage note in French.
    pub(crate) note_fr: Option<String>,

    /// English expression that is easily confused with the term.
    pub(crate) not_to_be_confused_with_en: Option<ShortText>,

    /// French expression that is easily confused with the term.
    pub(crate) not_to_be_confused_with_fr: Option<ShortText>,

    /// Frequent expression in English.
    pub(crate) frequent_expression_en: Option<String>,

    /// Frequent expression in French.
    pub(crate) frequent_expression_fr: Option<String>,

    /// Phraseology in English.
    pub(crate) phraseology_en: Option<String>,

    /// Phraseology in French.
    pub(crate) phraseology_fr: Option<String>,

    /// Sample context in English.
    pub(crate) context_en: Option<String>,

    /// Sample context in French.
    pub(crate) context_fr: Option<String>,
}

/// Returns the domain assigned to terms that do not specify one.
fn default_domain() -> ShortText {
    ShortText(DEFAULT_DOMAIN.to_owned())
}

/// Returns the subdomains assigned to terms that do not specify any.
fn default_subdomains() -> Vec<String> {
    DEFAULT_SUBDOMAINS.iter().map(|s| (*s).to_owned()).collect()
}

impl TermFields {
    /// Creates the fields of a term given its English and French wordings.  The classification
    /// takes the default values and all other fields are left unset.
    pub(crate) fn new(english_term: TermText, french_term: TermText) -> Self {
        Self {
            domain: default_domain(),
            subdomains: default_subdomains(),
            english_term,
            french_term,
            variant_en: None,
            variant_fr: None,
            near_synonym_en: None,
            near_synonym_fr: None,
            definition_en: None,
            definition_fr: None,
            syntactic_cooccurrence_en: None,
            syntactic_cooccurrence_fr: None,
            lexical_relations_en: None,
            lexical_relations_fr: None,
            note_en: None,
            note_fr: None,
            not_to_be_confused_with_en: None,
            not_to_be_confused_with_fr: None,
            frequent_expression_en: None,
            frequent_expression_fr: None,
            phraseology_en: None,
            phraseology_fr: None,
            context_en: None,
            context_fr: None,
        }
    }
}

/// A glossary term as stored in the database.
#[derive(Clone, Constructor, Debug, Getters, PartialEq, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub(crate) struct Term {
    /// Identifier of the term.
    tid: TermId,

    /// Properties of the term.
    #[serde(flatten)]
    fields: TermFields,
}

impl Term {
    /// Consumes the term and returns its properties.
    pub(crate) fn into_fields(self) -> TermFields {
        self.fields
    }
}

/// Returns true if the JSON `value` does not carry a usable term.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Extracts the optional field `key` from `json`.
///
/// Returns `None` if the key is absent, `Some(None)` if it is explicitly `null`, and `Some(value)`
/// otherwise.  Values of the wrong type yield an error naming the field.
fn optional_field<T: DeserializeOwned>(
    json: &Map<String, Value>,
    key: &str,
) -> ModelResult<Option<Option<T>>> {
    match json.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(value) => match T::deserialize(value) {
            Ok(value) => Ok(Some(Some(value))),
            Err(e) => Err(ModelError(format!("Invalid value for {}: {}", key, e))),
        },
    }
}

/// Validated contents of a request to create or update a term.
///
/// Optional fields are nested `Option`s: the outer level records whether the key was present in
/// the request and the inner level whether it carried a value or `null`.
#[derive(Debug, PartialEq)]
pub(crate) struct TermInput {
    /// The term in English.
    english_term: TermText,

    /// The term in French.
    french_term: TermText,

    /// Domain, where `null` requests the default.
    domain: Option<Option<ShortText>>,

    /// Subdomains, where `null` requests the default.
    subdomains: Option<Option<Vec<String>>>,

    /// Spelling or morphological variant in English.
    variant_en: Option<Option<ShortText>>,

    /// Spelling or morphological variant in French.
    variant_fr: Option<Option<ShortText>>,

    /// Near-synonym in English.
    near_synonym_en: Option<Option<ShortText>>,

    /// Near-synonym in French.
    near_synonym_fr: Option<Option<ShortText>>,

    /// Definition in English.
    definition_en: Option<Option<String>>,

    /// Definition in French.
    definition_fr: Option<Option<String>>,

    /// Words that typically co-occur with the English term.
    syntactic_cooccurrence_en: Option<Option<Vec<String>>>,

    /// Words that typically co-occur with the French term.
    syntactic_cooccurrence_fr: Option<Option<Vec<String>>>,

    /// Lexical relations of the English term.
    lexical_relations_en: Option<Option<LexicalRelations>>,

    /// Lexical relations of the French term.
    lexical_relations_fr: Option<Option<LexicalRelations>>,

    /// Usage note in English.
    note_en: Option<Option<String>>,

    /// Usage note in French.
    note_fr: Option<Option<String>>,

    /// English expression that is easily confused with the term.
    not_to_be_confused_with_en: Option<Option<ShortText>>,

    /// French expression that is easily confused with the term.
    not_to_be_confused_with_fr: Option<Option<ShortText>>,

    /// Frequent expression in English.
    frequent_expression_en: Option<Option<String>>,

    /// Frequent expression in French.
    frequent_expression_fr: Option<Option<String>>,

    /// Phraseology in English.
    phraseology_en: Option<Option<String>>,

    /// Phraseology in French.
    phraseology_fr: Option<Option<String>>,

    /// Sample context in English.
    context_en: Option<Option<String>>,

    /// Sample context in French.
    context_fr: Option<Option<String>>,
}

impl TermInput {
    /// Validates the raw JSON object of a request.
    ///
    /// The presence of both terms is checked before their types.  Keys that do not name a field
    /// are ignored.
    pub(crate) fn from_json(json: &Map<String, Value>) -> ModelResult<Self> {
        let english_term = json.get("english_term");
        let french_term = json.get("french_term");
        if is_blank(english_term) {
            return Err(ModelError("English Term is required.".to_owned()));
        }
        if is_blank(french_term) {
            return Err(ModelError("French Term is required.".to_owned()));
        }
        let (english_term, french_term) = match (english_term, french_term) {
            (Some(Value::String(english)), Some(Value::String(french))) => (english, french),
            _ => {
                return Err(ModelError(
                    "Invalid data types: English and French terms should be strings.".to_owned(),
                ))
            }
        };
        let english_term = TermText::new(english_term)
            .map_err(|e| ModelError(format!("Invalid value for english_term: {}", e)))?;
        let french_term = TermText::new(french_term)
            .map_err(|e| ModelError(format!("Invalid value for french_term: {}", e)))?;

        Ok(Self {
            english_term,
            french_term,
            domain: optional_field(json, "domain")?,
            subdomains: optional_field(json, "subdomains")?,
            variant_en: optional_field(json, "variant_en")?,
            variant_fr: optional_field(json, "variant_fr")?,
            near_synonym_en: optional_field(json, "near_synonym_en")?,
            near_synonym_fr: optional_field(json, "near_synonym_fr")?,
            definition_en: optional_field(json, "definition_en")?,
            definition_fr: optional_field(json, "definition_fr")?,
            syntactic_cooccurrence_en: optional_field(json, "syntactic_cooccurrence_en")?,
            syntactic_cooccurrence_fr: optional_field(json, "syntactic_cooccurrence_fr")?,
            lexical_relations_en: optional_field(json, "lexical_relations_en")?,
            lexical_relations_fr: optional_field(json, "lexical_relations_fr")?,
            note_en: optional_field(json, "note_en")?,
            note_fr: optional_field(json, "note_fr")?,
            not_to_be_confused_with_en: optional_field(json, "not_to_be_confused_with_en")?,
            not_to_be_confused_with_fr: optional_field(json, "not_to_be_confused_with_fr")?,
            frequent_expression_en: optional_field(json, "frequent_expression_en")?,
            frequent_expression_fr: optional_field(json, "frequent_expression_fr")?,
            phraseology_en: optional_field(json, "phraseology_en")?,
            phraseology_fr: optional_field(json, "phraseology_fr")?,
            context_en: optional_field(json, "context_en")?,
            context_fr: optional_field(json, "context_fr")?,
        })
    }

    /// Builds the fields of a new term.  Optional fields missing from the input take their
    /// default values.
    pub(crate) fn into_fields(self) -> TermFields {
        let mut fields = TermFields::new(self.english_term.clone(), self.french_term.clone());
        self.apply_to(&mut fields);
        fields
    }

    /// Overwrites the terms in `fields` and any optional field that was present in the input.
    pub(crate) fn apply_to(self, fields: &mut TermFields) {
        fields.english_term = self.english_term;
        fields.french_term = self.french_term;
        if let Some(domain) = self.domain {
            fields.domain = domain.unwrap_or_else(default_domain);
        }
        if let Some(subdomains) = self.subdomains {
            fields.subdomains = subdomains.unwrap_or_else(default_subdomains);
        }

        // Replaces `$field` in `fields` if the input carried it.
        macro_rules! replace_if_present [
            ( $( $field:ident ),+ ) => {
                $(
                    if let Some(value) = self.$field {
                        fields.$field = value;
                    }
                )+
            }
        ];

        replace_if_present!(
            variant_en,
            variant_fr,
            near_synonym_en,
            near_synonym_fr,
            definition_en,
            definition_fr,
            syntactic_cooccurrence_en,
            syntactic_cooccurrence_fr,
            lexical_relations_en,
            lexical_relations_fr,
            note_en,
            note_fr,
            not_to_be_confused_with_en,
            not_to_be_confused_with_fr,
            frequent_expression_en,
            frequent_expression_fr,
            phraseology_en,
            phraseology_fr,
            context_en,
            context_fr
        );
    }
}
