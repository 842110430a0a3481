use std::fmt;
use std::num::NonZeroUsize;

use lexicon_types::LexicalCategory;

/// Maximum number of sense lines a summary keeps. Zero means unbounded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SenseLimit(Option<NonZeroUsize>);

impl SenseLimit {
    pub const DEFAULT: usize = 3;

    pub fn new(limit: usize) -> Self {
        Self(NonZeroUsize::new(limit))
    }

    pub fn unbounded() -> Self {
        Self(None)
    }

    /// The cap, or `None` when unbounded.
    pub fn get(self) -> Option<usize> {
        self.0.map(NonZeroUsize::get)
    }

    pub fn is_bounded(self) -> bool {
        self.0.is_some()
    }
}

impl Default for SenseLimit {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl From<usize> for SenseLimit {
    fn from(limit: usize) -> Self {
        Self::new(limit)
    }
}

impl fmt::Display for SenseLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(limit) => write!(f, "{limit}"),
            None => f.write_str("unbounded"),
        }
    }
}

/// Aggregated senses for one run of same-pronunciation entries.
///
/// Fields are read-only outside this crate; the sense list only grows through
/// [`SenseSummary::add_senses`], so a bounded summary never holds more lines
/// than its limit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenseSummary {
    text: String,
    category: LexicalCategory,
    pronunciation: String,
    senses: Vec<String>,
    limit: SenseLimit,
}

impl SenseSummary {
    pub fn new(
        text: impl Into<String>,
        category: LexicalCategory,
        pronunciation: impl Into<String>,
        limit: SenseLimit,
    ) -> Self {
        Self {
            text: text.into(),
            category,
            pronunciation: pronunciation.into(),
            senses: Vec::new(),
            limit,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn category(&self) -> LexicalCategory {
        self.category
    }

    pub fn pronunciation(&self) -> &str {
        &self.pronunciation
    }

    pub fn senses(&self) -> &[String] {
        &self.senses
    }

    pub fn limit(&self) -> SenseLimit {
        self.limit
    }

    pub fn is_full(&self) -> bool {
        self.limit.get() == Some(self.senses.len())
    }

    /// Append a batch of sense lines, honouring the limit.
    ///
    /// A full summary ignores the batch entirely. Otherwise the whole batch is
    /// appended and the list is cut back from the end to the limit, so an
    /// oversized first batch keeps only its leading lines and later batches
    /// never displace earlier ones.
    pub fn add_senses<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = String>,
    {
        if self.is_full() {
            return;
        }
        self.senses.extend(batch);
        if let Some(limit) = self.limit.get() {
            self.senses.truncate(limit);
        }
    }
}
