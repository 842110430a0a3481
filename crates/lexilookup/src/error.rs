use lexicon_summary::FormatError;
use lexicon_types::EntryError;
use oxford_client::ProviderError;
use thiserror::Error;

/// Coarse classification of a [`LookupError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Inputs that cannot be combined or rendered together.
    Validation,
    /// The dictionary has nothing usable for the word.
    Lookup,
    /// The dictionary service could not be reached or answered badly.
    Provider,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no lemmas found for '{0}'")]
    NoLemmas(String),
    #[error("no entries found for '{0}'")]
    NoEntries(String),
    #[error("no entry for '{0}' has a usable sense")]
    NoUsableSenses(String),
    #[error(transparent)]
    Entries(#[from] EntryError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::NoLemmas(_)
            | LookupError::NoEntries(_)
            | LookupError::NoUsableSenses(_)
            | LookupError::Entries(EntryError::MissingCategory(_)) => ErrorKind::Lookup,
            LookupError::Entries(EntryError::HeadwordMismatch { .. })
            | LookupError::Format(_) => ErrorKind::Validation,
            LookupError::Provider(_) => ErrorKind::Provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon_types::LexicalCategory;

    #[test]
    fn kinds_follow_the_failure_source() {
        assert_eq!(LookupError::NoLemmas("x".into()).kind(), ErrorKind::Lookup);
        assert_eq!(LookupError::NoUsableSenses("x".into()).kind(), ErrorKind::Lookup);
        assert_eq!(
            LookupError::from(EntryError::MissingCategory(LexicalCategory::Noun)).kind(),
            ErrorKind::Lookup
        );
        let mismatch = EntryError::HeadwordMismatch {
            left: "book".into(),
            right: "books".into(),
        };
        assert_eq!(LookupError::from(mismatch).kind(), ErrorKind::Validation);
        assert_eq!(
            LookupError::from(ProviderError::MissingConfig("OXFORD_APP_ID")).kind(),
            ErrorKind::Provider
        );
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err = LookupError::from(EntryError::MissingCategory(LexicalCategory::Verb));
        assert_eq!(err.to_string(), "no entries recorded under category verb");
    }
}
