//! In-memory provider for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use lexicon_types::{EntryCollection, LexicalCategory, LookupResult, RawEntry, RawSense};
use oxford_client::{ProviderError, SearchMatch, SearchMode};

use crate::provider::DictionaryProvider;

#[derive(Default)]
pub struct FakeProvider {
    lemmas: HashMap<String, LookupResult>,
    translations: HashMap<(String, String), Vec<EntryCollection>>,
    entries: HashMap<String, Vec<EntryCollection>>,
    words: HashMap<String, Vec<EntryCollection>>,
    searches: HashMap<String, Vec<SearchMatch>>,
    unavailable: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn with_lemmas(mut self, word: &str, forms: &[(LexicalCategory, &str)]) -> Self {
        let mut lemmas = EntryCollection::new(word);
        for (category, form) in forms {
            lemmas.append(*category, form.to_string());
        }
        self.lemmas.insert(word.to_string(), lemmas);
        self
    }

    pub fn with_translations(
        mut self,
        word: &str,
        target: &str,
        pages: Vec<EntryCollection>,
    ) -> Self {
        self.translations
            .insert((word.to_string(), target.to_string()), pages);
        self
    }

    pub fn with_entries(mut self, word: &str, pages: Vec<EntryCollection>) -> Self {
        self.entries.insert(word.to_string(), pages);
        self
    }

    pub fn with_words(mut self, word: &str, pages: Vec<EntryCollection>) -> Self {
        self.words.insert(word.to_string(), pages);
        self
    }

    /// Search results for `word`, returned for every search mode.
    pub fn with_search(mut self, word: &str, matches: &[(&str, f64, &str)]) -> Self {
        let matches = matches
            .iter()
            .map(|(found, score, match_type)| SearchMatch {
                word: found.to_string(),
                score: *score,
                match_type: match_type.to_string(),
            })
            .collect();
        self.searches.insert(word.to_string(), matches);
        self
    }

    /// Every request for `word` fails with a 503.
    pub fn unavailable(mut self, word: &str) -> Self {
        self.unavailable.insert(word.to_string());
        self
    }

    /// Requests seen so far, as `"<endpoint>:<word>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &str, word: &str) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(format!("{endpoint}:{word}"));
        if self.unavailable.contains(word) {
            return Err(ProviderError::Status {
                url: format!("http://fake.test/{endpoint}/{word}"),
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "try later".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DictionaryProvider for FakeProvider {
    async fn fetch_lemmas(&self, word: &str) -> Result<LookupResult, ProviderError> {
        self.record("lemmas", word)?;
        Ok(self
            .lemmas
            .get(word)
            .cloned()
            .unwrap_or_else(|| EntryCollection::new(word)))
    }

    async fn fetch_translations(
        &self,
        word: &str,
        target_language: &str,
    ) -> Result<Vec<EntryCollection>, ProviderError> {
        self.record("translations", word)?;
        Ok(self
            .translations
            .get(&(word.to_string(), target_language.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_entries(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        self.record("entries", word)?;
        Ok(self.entries.get(word).cloned().unwrap_or_default())
    }

    async fn fetch_words(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        self.record("words", word)?;
        Ok(self.words.get(word).cloned().unwrap_or_default())
    }

    async fn fetch_search(
        &self,
        word: &str,
        mode: &SearchMode,
    ) -> Result<Vec<SearchMatch>, ProviderError> {
        let endpoint = match mode {
            SearchMode::Fuzzy => "search".to_string(),
            SearchMode::Thesaurus => "search/thesaurus".to_string(),
            SearchMode::Translations(target) => format!("search/translations/{target}"),
        };
        self.record(&endpoint, word)?;
        Ok(self.searches.get(word).cloned().unwrap_or_default())
    }
}

pub fn entry(
    text: &str,
    category: LexicalCategory,
    pronunciation: &str,
    senses: &[&[&str]],
) -> RawEntry {
    let mut entry = RawEntry::new(text, category).with_pronunciation(pronunciation);
    for definitions in senses {
        entry = entry.with_sense(RawSense::with_definitions(definitions.iter().copied()));
    }
    entry
}

pub fn page(headword: &str, entries: Vec<RawEntry>) -> EntryCollection {
    let mut collection = EntryCollection::new(headword);
    for entry in entries {
        collection.append(entry.category, entry);
    }
    collection
}

/// "books" lemmatizes to "book", which has a noun and a verb reading.
pub fn book_provider() -> FakeProvider {
    FakeProvider::default()
        .with_lemmas(
            "books",
            &[
                (LexicalCategory::Noun, "book"),
                (LexicalCategory::Verb, "book"),
            ],
        )
        .with_lemmas(
            "book",
            &[
                (LexicalCategory::Noun, "book"),
                (LexicalCategory::Verb, "book"),
            ],
        )
        .with_translations(
            "book",
            "zh",
            vec![page(
                "book",
                vec![
                    entry(
                        "book",
                        LexicalCategory::Noun,
                        "bʊk",
                        &[
                            &["a written or printed work"],
                            &["a set of pages bound together"],
                        ],
                    ),
                    entry(
                        "book",
                        LexicalCategory::Verb,
                        "bʊk",
                        &[&["to reserve in advance"]],
                    ),
                ],
            )],
        )
}

pub const BOOK_TEXT: &str = "book\tn.\ta written or printed work;a set of pages bound together||v.\tto reserve in advance\t/bʊk/";
