use async_trait::async_trait;
use lexicon_types::{EntryCollection, LookupResult};
use oxford_client::{OxfordClient, ProviderError, SearchMatch, SearchMode};

/// A dictionary backend the lookup pipeline can query.
///
/// Implementations must be shareable across tasks; the lookup service holds
/// one behind an `Arc` for the lifetime of the process.
#[async_trait]
pub trait DictionaryProvider: Send + Sync {
    /// Canonical forms of `word`, grouped by category.
    async fn fetch_lemmas(&self, word: &str) -> Result<LookupResult, ProviderError>;

    /// Bilingual entries for `word`, one collection per result page.
    async fn fetch_translations(
        &self,
        word: &str,
        target_language: &str,
    ) -> Result<Vec<EntryCollection>, ProviderError>;

    /// Monolingual entries for `word`, one collection per result page.
    async fn fetch_entries(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError>;

    /// Entries for any inflected form of `word`, without a lemma lookup first.
    async fn fetch_words(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError>;

    /// Headwords close to `word`, best match first.
    async fn fetch_search(
        &self,
        word: &str,
        mode: &SearchMode,
    ) -> Result<Vec<SearchMatch>, ProviderError>;
}

#[async_trait]
impl DictionaryProvider for OxfordClient {
    async fn fetch_lemmas(&self, word: &str) -> Result<LookupResult, ProviderError> {
        OxfordClient::fetch_lemmas(self, word).await
    }

    async fn fetch_translations(
        &self,
        word: &str,
        target_language: &str,
    ) -> Result<Vec<EntryCollection>, ProviderError> {
        OxfordClient::fetch_translations(self, word, target_language).await
    }

    async fn fetch_entries(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        OxfordClient::fetch_entries(self, word).await
    }

    async fn fetch_words(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        OxfordClient::fetch_words(self, word).await
    }

    async fn fetch_search(
        &self,
        word: &str,
        mode: &SearchMode,
    ) -> Result<Vec<SearchMatch>, ProviderError> {
        OxfordClient::fetch_search(self, word, mode).await
    }
}
