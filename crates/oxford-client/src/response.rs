//! Oxford Dictionaries API v2 response shapes and their conversion into
//! `lexicon-types` records.
//!
//! Only the fields the lookup pipeline consumes are mapped; everything else in
//! the payload is ignored by serde.

use lexicon_types::{
    EntryCollection, GrammaticalFeature, LexicalCategory, LookupResult, Pronunciation, RawEntry,
    RawSense, SubSense,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level body shared by `/entries`, `/words`, `/translations` and `/lemmas`.
#[derive(Debug, Default, Deserialize)]
pub struct RetrieveResponse {
    #[serde(default)]
    pub results: Vec<HeadwordResult>,
}

/// Body of the `/search` endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchMatch>,
}

/// One candidate headword suggested by a search, best first.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub word: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub match_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadwordResult {
    pub id: String,
    #[serde(default)]
    pub lexical_entries: Vec<LexicalEntryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalEntryData {
    pub lexical_category: IdText,
    #[serde(default)]
    pub entries: Vec<EntryData>,
    #[serde(default)]
    pub derivatives: Vec<IdText>,
    #[serde(default)]
    pub phrases: Vec<IdText>,
    #[serde(default)]
    pub inflection_of: Vec<IdText>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdText {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EntryData {
    #[serde(default)]
    pub pronunciations: Vec<PronunciationData>,
    #[serde(default)]
    pub senses: Vec<SenseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationData {
    #[serde(default)]
    pub phonetic_spelling: String,
    pub audio_file: Option<String>,
    #[serde(default)]
    pub dialects: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenseData {
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub translations: Vec<TextData>,
    #[serde(default)]
    pub examples: Vec<TextData>,
    #[serde(default)]
    pub synonyms: Vec<TextData>,
    #[serde(default)]
    pub constructions: Vec<TextData>,
    #[serde(default)]
    pub subsenses: Vec<SenseData>,
    #[serde(default)]
    pub grammatical_features: Vec<FeatureData>,
}

#[derive(Debug, Deserialize)]
pub struct TextData {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FeatureData {
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

impl RetrieveResponse {
    /// One collection per result, keyed by the result's `id`.
    pub fn into_collections(self) -> Vec<EntryCollection> {
        self.results
            .into_iter()
            .map(HeadwordResult::into_collection)
            .collect()
    }

    /// Lemma strings per category for `word`, taken from `inflectionOf`.
    pub fn into_lemmas(self, word: &str) -> LookupResult {
        let mut lemmas = EntryCollection::new(word);
        for result in self.results {
            for lexical in result.lexical_entries {
                let category = LexicalCategory::parse(&lexical.lexical_category.id);
                let mut targets = lexical.inflection_of.into_iter();
                let Some(first) = targets.next() else {
                    warn!(word, %category, "lexical entry without inflectionOf");
                    continue;
                };
                let extra = targets.count();
                if extra > 0 {
                    warn!(word, %category, extra, "ignoring additional inflection targets");
                }
                lemmas.append(category, first.text);
            }
        }
        lemmas
    }
}

impl HeadwordResult {
    fn into_collection(self) -> EntryCollection {
        let HeadwordResult {
            id,
            lexical_entries,
        } = self;
        let mut collection = EntryCollection::new(id.clone());
        for lexical in lexical_entries {
            let category = LexicalCategory::parse(&lexical.lexical_category.id);
            let derivatives: Vec<String> =
                lexical.derivatives.into_iter().map(|d| d.text).collect();
            let phrases: Vec<String> = lexical.phrases.into_iter().map(|p| p.text).collect();
            for entry in lexical.entries {
                collection.append(
                    category,
                    RawEntry {
                        text: id.clone(),
                        category,
                        pronunciations: entry
                            .pronunciations
                            .into_iter()
                            .map(PronunciationData::into_pronunciation)
                            .collect(),
                        senses: entry.senses.into_iter().map(SenseData::into_sense).collect(),
                        derivatives: derivatives.clone(),
                        phrases: phrases.clone(),
                    },
                );
            }
        }
        collection
    }
}

impl PronunciationData {
    fn into_pronunciation(self) -> Pronunciation {
        Pronunciation {
            phonetic_spelling: self.phonetic_spelling,
            audio_file: self.audio_file,
            dialects: self.dialects,
        }
    }
}

impl SenseData {
    /// Bilingual responses carry `translations` instead of `definitions`.
    fn definitions_or_translations(
        definitions: Vec<String>,
        translations: Vec<TextData>,
    ) -> Vec<String> {
        if definitions.is_empty() {
            texts(translations)
        } else {
            definitions
        }
    }

    fn into_sense(self) -> RawSense {
        RawSense {
            definitions: Self::definitions_or_translations(self.definitions, self.translations),
            examples: texts(self.examples),
            synonyms: texts(self.synonyms),
            constructions: texts(self.constructions),
            subsenses: self
                .subsenses
                .into_iter()
                .map(|sub| SubSense {
                    definitions: Self::definitions_or_translations(sub.definitions, sub.translations),
                    examples: texts(sub.examples),
                })
                .collect(),
            features: self
                .grammatical_features
                .into_iter()
                .map(|f| GrammaticalFeature {
                    kind: f.kind,
                    text: f.text,
                })
                .collect(),
        }
    }
}

fn texts(items: Vec<TextData>) -> Vec<String> {
    items.into_iter().map(|t| t.text).collect()
}

/// Decode an `/entries`, `/words` or `/translations` body.
pub fn parse_collections(body: &str) -> serde_json::Result<Vec<EntryCollection>> {
    serde_json::from_str::<RetrieveResponse>(body).map(RetrieveResponse::into_collections)
}

/// Decode a `/lemmas` body for `word`.
pub fn parse_lemmas(word: &str, body: &str) -> serde_json::Result<LookupResult> {
    serde_json::from_str::<RetrieveResponse>(body).map(|r| r.into_lemmas(word))
}

/// Decode a `/search` body.
pub fn parse_search(body: &str) -> serde_json::Result<Vec<SearchMatch>> {
    serde_json::from_str::<SearchResponse>(body).map(|r| r.results)
}
