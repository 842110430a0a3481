use lexicon_types::{EntryCollection, LexicalCategory, RawEntry, RawSense};

use crate::summary::{SenseLimit, SenseSummary};

/// Joins the definitions of a single sense into one sense line.
pub const DEFINITION_SEPARATOR: &str = ",";

/// Folds an entry collection into bounded [`SenseSummary`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct SenseAggregator {
    limit: SenseLimit,
}

impl SenseAggregator {
    pub fn new(limit: SenseLimit) -> Self {
        Self { limit }
    }

    /// Summaries for every category, in the collection's key order.
    ///
    /// Within a category only adjacent entries with the same pronunciation are
    /// merged: pronunciations `[p1, p1, p2, p1]` yield three summaries
    /// `p1, p2, p1`.
    pub fn aggregate(&self, entries: &EntryCollection<RawEntry>) -> Vec<SenseSummary> {
        let mut out = Vec::new();
        for (category, items) in entries.iter() {
            self.aggregate_category(entries.headword(), category, items, &mut out);
        }
        out
    }

    fn aggregate_category(
        &self,
        headword: &str,
        category: LexicalCategory,
        items: &[RawEntry],
        out: &mut Vec<SenseSummary>,
    ) {
        // An unusable first entry disqualifies the whole category.
        let Some((first, rest)) = items.split_first() else {
            return;
        };
        if !is_usable(first) {
            return;
        }

        let mut current = self.start_run(headword, category, first);
        for entry in rest.iter().filter(|e| is_usable(e)) {
            if entry.pronunciation() == current.pronunciation() {
                current.add_senses(sense_lines(entry));
            } else {
                let next = self.start_run(headword, category, entry);
                out.push(std::mem::replace(&mut current, next));
            }
        }
        out.push(current);
    }

    fn start_run(
        &self,
        headword: &str,
        category: LexicalCategory,
        entry: &RawEntry,
    ) -> SenseSummary {
        let mut summary = SenseSummary::new(headword, category, entry.pronunciation(), self.limit);
        summary.add_senses(sense_lines(entry));
        summary
    }
}

/// An entry counts only when its first sense carries at least one definition.
pub fn is_usable(entry: &RawEntry) -> bool {
    entry.senses.first().is_some_and(RawSense::has_definitions)
}

/// One line per sense that has definitions, definitions joined by
/// [`DEFINITION_SEPARATOR`].
pub fn sense_lines(entry: &RawEntry) -> impl Iterator<Item = String> + '_ {
    entry
        .senses
        .iter()
        .filter(|sense| sense.has_definitions())
        .map(|sense| sense.definitions.join(DEFINITION_SEPARATOR))
}
