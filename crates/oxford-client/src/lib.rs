//! Async client for the Oxford Dictionaries API (v2).
//!
//! The client performs the HTTP requests, decodes the JSON bodies, and hands
//! back `lexicon-types` records: one [`EntryCollection`] per result page for
//! entry, word and translation queries, a [`LookupResult`] for lemma queries,
//! and ranked [`SearchMatch`] candidates for searches. Callers never see
//! provider field names.
//!
//! # Features
//! - Credentials (`app_id`/`app_key`) sent as default headers on every request.
//! - A token-bucket [`Throttle`] in front of every request so batch runs stay
//!   under the API's rate limit.
//! - HTTP 404 is treated as "no results" rather than a failure; any other
//!   non-success status becomes [`ProviderError::Status`].
//!
//! # Example
//! ```no_run
//! use oxford_client::{OxfordClient, OxfordConfig};
//!
//! # async fn demo() -> Result<(), oxford_client::ProviderError> {
//! let client = OxfordClient::new(OxfordConfig::new("my-app-id", "my-app-key"))?;
//! let lemmas = client.fetch_lemmas("books").await?;
//! let pages = client.fetch_translations("book", "zh").await?;
//! println!("{} lemma categories, {} pages", lemmas.len(), pages.len());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p oxford-client --example fetch -- <word> [target-lang]`.

use std::env;
use std::time::Duration;

use lexicon_types::{EntryCollection, LookupResult};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod response;
mod throttle;

pub use response::{
    RetrieveResponse, SearchMatch, SearchResponse, parse_collections, parse_lemmas, parse_search,
};
pub use throttle::Throttle;

pub const DEFAULT_BASE_URL: &str = "https://od-api.oxforddictionaries.com/api/v2";
pub const DEFAULT_SOURCE_LANG: &str = "en-gb";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
    #[error("{field} is not a valid header value")]
    InvalidCredential { field: &'static str },
    #[error("invalid provider URL {url}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("provider URL {0} cannot take path segments")]
    BaseUrl(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },
}

/// Which `/search` endpoint a search goes to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchMode {
    /// Fuzzy headword match in the source language.
    Fuzzy,
    /// Match against thesaurus headwords.
    Thesaurus,
    /// Headwords with translations into the given language.
    Translations(String),
}

/// Connection settings for [`OxfordClient`].
#[derive(Clone, Debug)]
pub struct OxfordConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_key: String,
    pub source_lang: String,
    pub timeout: Duration,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
}

impl OxfordConfig {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            timeout: DEFAULT_TIMEOUT,
            rate_limit_rps: DEFAULT_RATE_LIMIT_RPS,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
        }
    }

    /// Read `OXFORD_APP_ID`/`OXFORD_APP_KEY` (required) and the optional
    /// `OXFORD_BASE_URL`/`OXFORD_SOURCE_LANG` overrides.
    pub fn from_env() -> Result<Self, ProviderError> {
        let app_id =
            env::var("OXFORD_APP_ID").map_err(|_| ProviderError::MissingConfig("OXFORD_APP_ID"))?;
        let app_key = env::var("OXFORD_APP_KEY")
            .map_err(|_| ProviderError::MissingConfig("OXFORD_APP_KEY"))?;
        let mut config = Self::new(app_id, app_key);
        if let Ok(base_url) = env::var("OXFORD_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(source_lang) = env::var("OXFORD_SOURCE_LANG") {
            config.source_lang = source_lang;
        }
        Ok(config)
    }
}

/// Shareable handle to the Oxford API; cheap to wrap in an `Arc`.
#[derive(Debug)]
pub struct OxfordClient {
    http: Client,
    base_url: Url,
    source_lang: String,
    throttle: Throttle,
}

impl OxfordClient {
    pub fn new(config: OxfordConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("app_id", credential("app_id", &config.app_id)?);
        headers.insert("app_key", credential("app_key", &config.app_key)?);

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ProviderError::Client)?;
        let base_url = Url::parse(&config.base_url).map_err(|source| ProviderError::Url {
            url: config.base_url.clone(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::BaseUrl(config.base_url));
        }

        Ok(Self {
            http,
            base_url,
            source_lang: config.source_lang,
            throttle: Throttle::new(config.rate_limit_rps, config.rate_limit_burst),
        })
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    /// Canonical forms of `word`, per category (`/lemmas`).
    pub async fn fetch_lemmas(&self, word: &str) -> Result<LookupResult, ProviderError> {
        let url = self.endpoint(&["lemmas", &self.source_lang, word], &[])?;
        let lemmas = match self.get::<RetrieveResponse>(url).await? {
            Some(response) => response.into_lemmas(word),
            None => EntryCollection::new(word),
        };
        Ok(lemmas)
    }

    /// Bilingual entries for `word` (`/translations`), one collection per page.
    pub async fn fetch_translations(
        &self,
        word: &str,
        target_lang: &str,
    ) -> Result<Vec<EntryCollection>, ProviderError> {
        let url = self.endpoint(
            &["translations", &self.source_lang, target_lang, word],
            &[("strictMatch", "false")],
        )?;
        Ok(self
            .get(url)
            .await?
            .map(RetrieveResponse::into_collections)
            .unwrap_or_default())
    }

    /// Monolingual entries for `word` (`/entries`), one collection per page.
    pub async fn fetch_entries(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        let url = self.endpoint(&["entries", &self.source_lang, word], &[])?;
        Ok(self
            .get(url)
            .await?
            .map(RetrieveResponse::into_collections)
            .unwrap_or_default())
    }

    /// Entries for the headwords `word` is a form of (`/words?q=`).
    pub async fn fetch_words(&self, word: &str) -> Result<Vec<EntryCollection>, ProviderError> {
        let url = self.endpoint(&["words", &self.source_lang], &[("q", word)])?;
        Ok(self
            .get(url)
            .await?
            .map(RetrieveResponse::into_collections)
            .unwrap_or_default())
    }

    /// Candidate headwords for `word` (`/search`), in the API's ranking order.
    pub async fn fetch_search(
        &self,
        word: &str,
        mode: &SearchMode,
    ) -> Result<Vec<SearchMatch>, ProviderError> {
        let source = self.source_lang.as_str();
        let url = match mode {
            SearchMode::Fuzzy => self.endpoint(&["search", source], &[("q", word)])?,
            SearchMode::Thesaurus => {
                self.endpoint(&["search", "thesaurus", source], &[("q", word)])?
            }
            SearchMode::Translations(target) => self.endpoint(
                &["search", "translations", source, target],
                &[("q", word)],
            )?,
        };
        Ok(self
            .get::<SearchResponse>(url)
            .await?
            .map(|response| response.results)
            .unwrap_or_default())
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET and decode; `None` when the API has no entry for the word.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ProviderError> {
        self.throttle.acquire().await;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "no entry");
            return Ok(None);
        }
        let body = response
            .text()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.to_string(),
                source,
            })?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: url.to_string(),
                status,
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| ProviderError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

fn credential(field: &'static str, value: &str) -> Result<HeaderValue, ProviderError> {
    let mut header =
        HeaderValue::from_str(value).map_err(|_| ProviderError::InvalidCredential { field })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> OxfordClient {
        let mut config = OxfordConfig::new("id", "key");
        config.base_url = base_url.to_string();
        OxfordClient::new(config).unwrap()
    }

    #[test]
    fn builds_paths_under_the_base_url() {
        let c = client("https://example.test/api/v2");
        let url = c
            .endpoint(
                &["translations", "en-gb", "zh", "book"],
                &[("strictMatch", "false")],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/api/v2/translations/en-gb/zh/book?strictMatch=false"
        );
    }

    #[test]
    fn trailing_slash_and_spaces_are_handled() {
        let c = client("https://example.test/api/v2/");
        let url = c.endpoint(&["entries", "en-gb", "ice cream"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/v2/entries/en-gb/ice%20cream");
    }

    #[test]
    fn query_words_are_form_encoded() {
        let c = client("https://example.test/api/v2");
        let url = c
            .endpoint(&["search", "translations", "en-gb", "zh"], &[("q", "ice cream&co")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/api/v2/search/translations/en-gb/zh?q=ice+cream%26co"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        let mut config = OxfordConfig::new("id", "key");
        config.base_url = "not a url".into();
        assert!(matches!(OxfordClient::new(config), Err(ProviderError::Url { .. })));

        let mut config = OxfordConfig::new("id", "key");
        config.base_url = "mailto:someone@example.test".into();
        assert!(matches!(OxfordClient::new(config), Err(ProviderError::BaseUrl(_))));
    }

    #[test]
    fn rejects_credentials_that_cannot_be_headers() {
        let config = OxfordConfig::new("bad\nid", "key");
        assert!(matches!(
            OxfordClient::new(config),
            Err(ProviderError::InvalidCredential { field: "app_id" })
        ));
    }
}
