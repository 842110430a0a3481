use std::fmt;
use std::sync::Arc;

use lexicon_summary::{SenseAggregator, SenseLimit, SenseSummary, format_summaries};
use lexicon_types::{EntryCollection, LexicalCategory};
use oxford_client::{SearchMatch, SearchMode};
use tracing::debug;

use crate::error::LookupError;
use crate::provider::DictionaryProvider;

/// Which provider endpoint supplies the entries that get summarized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntrySource {
    /// Bilingual entries into the given target language.
    Translations(String),
    /// Monolingual entries for the resolved lemma.
    Entries,
    /// Monolingual entries looked up by inflected form; skips lemma resolution.
    Words,
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrySource::Translations(target) => write!(f, "translations into {target}"),
            EntrySource::Entries => f.write_str("monolingual entries"),
            EntrySource::Words => f.write_str("monolingual entries by inflected form"),
        }
    }
}

/// Runs the lookup pipeline for single words: lemma resolution, entry fetch,
/// aggregation and rendering.
#[derive(Clone)]
pub struct LookupService {
    provider: Arc<dyn DictionaryProvider>,
    source: EntrySource,
}

impl LookupService {
    pub fn new(provider: Arc<dyn DictionaryProvider>, source: EntrySource) -> Self {
        Self { provider, source }
    }

    pub fn source(&self) -> &EntrySource {
        &self.source
    }

    /// The form of `word` to look up.
    ///
    /// `word` itself when it appears among its own lemmas, otherwise the first
    /// lemma under the first category the provider reported.
    pub async fn resolve_headword(&self, word: &str) -> Result<String, LookupError> {
        let lemmas = self.provider.fetch_lemmas(word).await?;
        if lemmas.contains(word) {
            return Ok(word.to_string());
        }
        let resolved = lemmas
            .first()
            .and_then(|(_, forms)| forms.first())
            .ok_or_else(|| LookupError::NoLemmas(word.to_string()))?;
        debug!(word, lemma = %resolved, "resolved to lemma");
        Ok(resolved.clone())
    }

    /// All result pages for `headword`, merged left to right.
    pub async fn fetch_entries(&self, headword: &str) -> Result<EntryCollection, LookupError> {
        let pages = match &self.source {
            EntrySource::Translations(target) => {
                self.provider.fetch_translations(headword, target).await?
            }
            EntrySource::Entries => self.provider.fetch_entries(headword).await?,
            EntrySource::Words => self.provider.fetch_words(headword).await?,
        };
        debug!(headword, pages = pages.len(), "fetched entries");

        let mut pages = pages.into_iter();
        let first = pages
            .next()
            .ok_or_else(|| LookupError::NoEntries(headword.to_string()))?;
        Ok(pages.try_fold(first, EntryCollection::merge)?)
    }

    /// Bounded summaries for `word`; never empty.
    pub async fn summarize(
        &self,
        word: &str,
        limit: SenseLimit,
    ) -> Result<Vec<SenseSummary>, LookupError> {
        let headword = match self.source {
            EntrySource::Words => word.to_string(),
            _ => self.resolve_headword(word).await?,
        };
        let entries = self.fetch_entries(&headword).await?;
        let summaries = SenseAggregator::new(limit).aggregate(&entries);
        if summaries.is_empty() {
            return Err(LookupError::NoUsableSenses(headword));
        }
        debug!(
            word,
            headword = entries.headword(),
            categories = ?entries.categories().collect::<Vec<LexicalCategory>>(),
            summaries = summaries.len(),
            "aggregated"
        );
        Ok(summaries)
    }

    /// Look up `word` and render it in the tab-delimited summary format.
    pub async fn lookup_and_format(
        &self,
        word: &str,
        limit: SenseLimit,
    ) -> Result<String, LookupError> {
        let summaries = self.summarize(word, limit).await?;
        Ok(format_summaries(&summaries)?)
    }

    /// Headwords the provider considers close to `word`, best first.
    pub async fn search(
        &self,
        word: &str,
        mode: &SearchMode,
    ) -> Result<Vec<SearchMatch>, LookupError> {
        let matches = self.provider.fetch_search(word, mode).await?;
        debug!(word, ?mode, matches = matches.len(), "searched");
        Ok(matches)
    }
}
