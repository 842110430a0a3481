use thiserror::Error;

use crate::summary::SenseSummary;

const BLOCK_SEPARATOR: &str = "||";
const SENSE_SEPARATOR: &str = ";";

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FormatError {
    #[error("summaries mix headwords: expected '{expected}', found '{found}'")]
    MixedHeadwords { expected: String, found: String },
}

/// Summaries sharing one pronunciation, in their original relative order.
#[derive(Debug)]
pub struct PronunciationGroup<'a> {
    pub pronunciation: &'a str,
    pub summaries: Vec<&'a SenseSummary>,
}

/// Group summaries by pronunciation, ordered by first occurrence.
///
/// Independent of category order: a verb sharing the noun's pronunciation
/// lands in the noun's group even if an adjective came in between.
pub fn group_by_pronunciation(summaries: &[SenseSummary]) -> Vec<PronunciationGroup<'_>> {
    let mut groups: Vec<PronunciationGroup<'_>> = Vec::new();
    for summary in summaries {
        match groups
            .iter_mut()
            .find(|g| g.pronunciation == summary.pronunciation())
        {
            Some(group) => group.summaries.push(summary),
            None => groups.push(PronunciationGroup {
                pronunciation: summary.pronunciation(),
                summaries: vec![summary],
            }),
        }
    }
    groups
}

/// Render summaries for one headword, one line per pronunciation:
///
/// `<headword>\t<abbr>\t<sense;sense>||<abbr>\t<sense>\t/<pronunciation>/`
///
/// All summaries must carry the same headword. An empty slice renders as `""`.
pub fn format_summaries(summaries: &[SenseSummary]) -> Result<String, FormatError> {
    let Some(first) = summaries.first() else {
        return Ok(String::new());
    };
    let headword = first.text();
    if let Some(stray) = summaries.iter().find(|s| s.text() != headword) {
        return Err(FormatError::MixedHeadwords {
            expected: headword.to_string(),
            found: stray.text().to_string(),
        });
    }

    let mut out = String::new();
    for group in group_by_pronunciation(summaries) {
        let blocks = group
            .summaries
            .iter()
            .map(|s| {
                format!(
                    "{}\t{}",
                    s.category().abbreviation(),
                    s.senses().join(SENSE_SEPARATOR)
                )
            })
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR);
        out.push_str(&format!("{headword}\t{blocks}\t/{}/\n", group.pronunciation));
    }
    Ok(out.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::SenseLimit;
    use lexicon_types::LexicalCategory;

    fn summary(
        text: &str,
        category: LexicalCategory,
        pronunciation: &str,
        senses: &[&str],
    ) -> SenseSummary {
        let mut s = SenseSummary::new(text, category, pronunciation, SenseLimit::unbounded());
        s.add_senses(senses.iter().map(|s| s.to_string()));
        s
    }

    #[test]
    fn renders_shared_pronunciation_on_one_line() {
        let summaries = [
            summary(
                "book",
                LexicalCategory::Noun,
                "bʊk",
                &["a written or printed work", "a set of pages bound together"],
            ),
            summary("book", LexicalCategory::Verb, "bʊk", &["to reserve in advance"]),
        ];
        assert_eq!(
            format_summaries(&summaries).unwrap(),
            "book\tn.\ta written or printed work;a set of pages bound together||v.\tto reserve in advance\t/bʊk/"
        );
    }

    #[test]
    fn groups_by_first_occurrence_across_categories() {
        let summaries = [
            summary("record", LexicalCategory::Noun, "ˈrɛkɔːd", &["a log"]),
            summary("record", LexicalCategory::Verb, "rɪˈkɔːd", &["to write down"]),
            summary("record", LexicalCategory::Adjective, "ˈrɛkɔːd", &["best ever"]),
        ];
        assert_eq!(
            format_summaries(&summaries).unwrap(),
            "record\tn.\ta log||adj.\tbest ever\t/ˈrɛkɔːd/\nrecord\tv.\tto write down\t/rɪˈkɔːd/"
        );
    }

    #[test]
    fn rejects_mixed_headwords() {
        let summaries = [
            summary("book", LexicalCategory::Noun, "bʊk", &["a"]),
            summary("books", LexicalCategory::Noun, "bʊks", &["b"]),
        ];
        assert_eq!(
            format_summaries(&summaries),
            Err(FormatError::MixedHeadwords {
                expected: "book".into(),
                found: "books".into()
            })
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(format_summaries(&[]).unwrap(), "");
    }

    #[test]
    fn trailing_whitespace_is_trimmed() {
        let summaries = [summary("ok", LexicalCategory::Interjection, "", &["fine "])];
        let text = format_summaries(&summaries).unwrap();
        assert_eq!(text, "ok\tint.\tfine \t//");
        assert!(!text.ends_with('\n'));
    }
}
