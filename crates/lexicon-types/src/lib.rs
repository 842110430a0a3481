//! Shared, provider-agnostic types for bilingual dictionary lookups.
//!
//! Dictionary providers answer with deeply nested JSON; client crates shape
//! that into the records defined here so that higher-level tooling never sees
//! provider field names. [`LexicalCategory`] is the closed part-of-speech set,
//! [`RawEntry`]/[`RawSense`]/[`Pronunciation`] mirror one lexical entry, and
//! [`EntryCollection`] groups entries for a single headword by category while
//! remembering the order in which categories first appeared.
//!
//! ```rust
//! use lexicon_types::{EntryCollection, LexicalCategory, RawEntry};
//!
//! let mut page = EntryCollection::new("book");
//! page.append(LexicalCategory::parse("Noun"), RawEntry::new("book", LexicalCategory::Noun));
//! assert_eq!(page.get(LexicalCategory::Noun).unwrap().len(), 1);
//! assert_eq!(LexicalCategory::parse("determiner"), LexicalCategory::Other);
//! ```

use std::fmt;

use thiserror::Error;

/// Part-of-speech tag attached to every lexical entry.
///
/// "Not set" is modelled as `Option<LexicalCategory>::None`, never as a variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LexicalCategory {
    Noun,
    Pronoun,
    Adjective,
    Adverb,
    Verb,
    Numeral,
    Article,
    Preposition,
    Conjunction,
    Interjection,
    Other,
}

impl LexicalCategory {
    pub const ALL: [LexicalCategory; 11] = [
        LexicalCategory::Noun,
        LexicalCategory::Pronoun,
        LexicalCategory::Adjective,
        LexicalCategory::Adverb,
        LexicalCategory::Verb,
        LexicalCategory::Numeral,
        LexicalCategory::Article,
        LexicalCategory::Preposition,
        LexicalCategory::Conjunction,
        LexicalCategory::Interjection,
        LexicalCategory::Other,
    ];

    /// Parse a provider category name, ignoring case.
    ///
    /// Names outside the closed set (`determiner`, `residual`, ...) resolve to
    /// [`LexicalCategory::Other`]; this never fails.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "NOUN" => LexicalCategory::Noun,
            "PRONOUN" => LexicalCategory::Pronoun,
            "ADJECTIVE" => LexicalCategory::Adjective,
            "ADVERB" => LexicalCategory::Adverb,
            "VERB" => LexicalCategory::Verb,
            "NUMERAL" => LexicalCategory::Numeral,
            "ARTICLE" => LexicalCategory::Article,
            "PREPOSITION" => LexicalCategory::Preposition,
            "CONJUNCTION" => LexicalCategory::Conjunction,
            "INTERJECTION" => LexicalCategory::Interjection,
            _ => LexicalCategory::Other,
        }
    }

    /// Short label used in rendered summaries (`n.`, `v.`, `adj.`, ...).
    pub fn abbreviation(self) -> &'static str {
        match self {
            LexicalCategory::Noun => "n.",
            LexicalCategory::Pronoun => "pron.",
            LexicalCategory::Adjective => "adj.",
            LexicalCategory::Adverb => "adv.",
            LexicalCategory::Verb => "v.",
            LexicalCategory::Numeral => "num.",
            LexicalCategory::Article => "art.",
            LexicalCategory::Preposition => "prep.",
            LexicalCategory::Conjunction => "conj.",
            LexicalCategory::Interjection => "int.",
            LexicalCategory::Other => "other",
        }
    }
}

impl From<&str> for LexicalCategory {
    fn from(name: &str) -> Self {
        LexicalCategory::parse(name)
    }
}

impl fmt::Display for LexicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexicalCategory::Noun => "noun",
            LexicalCategory::Pronoun => "pronoun",
            LexicalCategory::Adjective => "adjective",
            LexicalCategory::Adverb => "adverb",
            LexicalCategory::Verb => "verb",
            LexicalCategory::Numeral => "numeral",
            LexicalCategory::Article => "article",
            LexicalCategory::Preposition => "preposition",
            LexicalCategory::Conjunction => "conjunction",
            LexicalCategory::Interjection => "interjection",
            LexicalCategory::Other => "other",
        })
    }
}

/// One phonetic rendering of an entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pronunciation {
    pub phonetic_spelling: String,
    pub audio_file: Option<String>,
    pub dialects: Vec<String>,
}

impl Pronunciation {
    pub fn new(phonetic_spelling: impl Into<String>) -> Self {
        Self {
            phonetic_spelling: phonetic_spelling.into(),
            ..Self::default()
        }
    }
}

/// Grammatical feature tag on a sense (`type` + `text` in provider terms).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GrammaticalFeature {
    pub kind: String,
    pub text: String,
}

/// Nested sense with its own definitions and examples.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubSense {
    pub definitions: Vec<String>,
    pub examples: Vec<String>,
}

/// One meaning of an entry.
///
/// Only `definitions` feeds summaries; the other fields are carried through
/// for callers that want the full record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawSense {
    pub definitions: Vec<String>,
    pub examples: Vec<String>,
    pub synonyms: Vec<String>,
    pub constructions: Vec<String>,
    pub subsenses: Vec<SubSense>,
    pub features: Vec<GrammaticalFeature>,
}

impl RawSense {
    pub fn with_definitions<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            definitions: definitions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn has_definitions(&self) -> bool {
        !self.definitions.is_empty()
    }
}

/// A single lexical entry for a headword under one category.
///
/// Homographs with different stress patterns arrive as separate entries that
/// share `text` and `category` but not pronunciation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawEntry {
    pub text: String,
    pub category: LexicalCategory,
    pub pronunciations: Vec<Pronunciation>,
    pub senses: Vec<RawSense>,
    pub derivatives: Vec<String>,
    pub phrases: Vec<String>,
}

impl RawEntry {
    pub fn new(text: impl Into<String>, category: LexicalCategory) -> Self {
        Self {
            text: text.into(),
            category,
            pronunciations: Vec::new(),
            senses: Vec::new(),
            derivatives: Vec::new(),
            phrases: Vec::new(),
        }
    }

    pub fn with_pronunciation(mut self, phonetic_spelling: impl Into<String>) -> Self {
        self.pronunciations.push(Pronunciation::new(phonetic_spelling));
        self
    }

    pub fn with_sense(mut self, sense: RawSense) -> Self {
        self.senses.push(sense);
        self
    }

    /// Phonetic spelling of the first pronunciation, or `""` when none was sent.
    pub fn pronunciation(&self) -> &str {
        self.pronunciations
            .first()
            .map(|p| p.phonetic_spelling.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum EntryError {
    #[error("cannot merge entries for '{left}' with entries for '{right}'")]
    HeadwordMismatch { left: String, right: String },
    #[error("no entries recorded under category {0}")]
    MissingCategory(LexicalCategory),
}

/// Lemma lookups map each category to canonical-form strings.
pub type LookupResult = EntryCollection<String>;

/// Entries for one headword, grouped by category in first-insertion order.
///
/// Appending under an existing category extends its list; a new category is
/// added to the end of the key order. Provider result pages for the same word
/// are combined with [`EntryCollection::merge`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryCollection<T = RawEntry> {
    headword: String,
    groups: Vec<(LexicalCategory, Vec<T>)>,
}

impl<T> EntryCollection<T> {
    pub fn new(headword: impl Into<String>) -> Self {
        Self {
            headword: headword.into(),
            groups: Vec::new(),
        }
    }

    pub fn headword(&self) -> &str {
        &self.headword
    }

    pub fn append(&mut self, category: LexicalCategory, item: T) {
        match self.groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, items)) => items.push(item),
            None => self.groups.push((category, vec![item])),
        }
    }

    /// Items recorded under `category`, in insertion order.
    pub fn get(&self, category: LexicalCategory) -> Result<&[T], EntryError> {
        self.groups
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, items)| items.as_slice())
            .ok_or(EntryError::MissingCategory(category))
    }

    /// Categories in first-insertion order.
    pub fn categories(&self) -> impl Iterator<Item = LexicalCategory> + '_ {
        self.groups.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LexicalCategory, &[T])> + '_ {
        self.groups.iter().map(|(c, items)| (*c, items.as_slice()))
    }

    /// The first category and its items, if any were appended.
    pub fn first(&self) -> Option<(LexicalCategory, &[T])> {
        self.iter().next()
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether any category holds an item equal to `needle`.
    pub fn contains<Q>(&self, needle: &Q) -> bool
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.groups
            .iter()
            .any(|(_, items)| items.iter().any(|item| item == needle))
    }

    /// Combine two collections for the same headword.
    ///
    /// The result lists `self`'s categories first, then any new ones from
    /// `other`; every item is re-appended one at a time in original order, so
    /// a category present on both sides keeps `self`'s items ahead of
    /// `other`'s.
    pub fn merge(self, other: Self) -> Result<Self, EntryError> {
        if self.headword != other.headword {
            return Err(EntryError::HeadwordMismatch {
                left: self.headword,
                right: other.headword,
            });
        }

        let Self { headword, groups } = self;
        let mut merged = Self::new(headword);
        for (category, items) in groups.into_iter().chain(other.groups) {
            for item in items {
                merged.append(category, item);
            }
        }
        Ok(merged)
    }
}
