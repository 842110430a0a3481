//! Sense aggregation: turn raw dictionary entries into a compact summary.
//!
//! The crate knows nothing about HTTP or any particular provider; it only
//! depends on the records in `lexicon-types`.
//!
//! # How it works
//! 1. For each category of an [`EntryCollection`](lexicon_types::EntryCollection),
//!    in key order, skip it when its first entry has no usable first sense.
//! 2. Walk the entries and merge *consecutive* entries that share a
//!    pronunciation into one [`SenseSummary`]; a pronunciation change flushes
//!    the current summary and starts a new one.
//! 3. Every append goes through [`SenseSummary::add_senses`], which caps the
//!    summary at its [`SenseLimit`].
//! 4. [`format_summaries`] regroups the flat list by pronunciation and renders
//!    one tab-separated line per pronunciation.
//!
//! # Example
//! ```rust
//! use lexicon_summary::{SenseAggregator, SenseLimit, format_summaries};
//! use lexicon_types::{EntryCollection, LexicalCategory, RawEntry, RawSense};
//!
//! let mut entries = EntryCollection::new("book");
//! entries.append(
//!     LexicalCategory::Noun,
//!     RawEntry::new("book", LexicalCategory::Noun)
//!         .with_pronunciation("bʊk")
//!         .with_sense(RawSense::with_definitions(["a written or printed work"])),
//! );
//!
//! let summaries = SenseAggregator::new(SenseLimit::default()).aggregate(&entries);
//! let text = format_summaries(&summaries).unwrap();
//! assert_eq!(text, "book\tn.\ta written or printed work\t/bʊk/");
//! ```

mod aggregate;
mod format;
mod summary;

pub use aggregate::{DEFINITION_SEPARATOR, SenseAggregator, is_usable, sense_lines};
pub use format::{FormatError, PronunciationGroup, format_summaries, group_by_pronunciation};
pub use summary::{SenseLimit, SenseSummary};
