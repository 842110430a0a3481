use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::num::NonZeroUsize;
use std::panic;
use std::path::Path;
use std::sync::Arc;

use lexicon_summary::SenseLimit;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::LookupError;
use crate::lookup::LookupService;

/// Outcome of a batch run, both halves in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub rendered: Vec<(String, String)>,
    pub failures: Vec<(String, LookupError)>,
}

impl BatchReport {
    fn record(&mut self, word: String, result: Result<String, LookupError>) {
        match result {
            Ok(text) => self.rendered.push((word, text)),
            Err(err) => {
                warn!(word = %word, kind = ?err.kind(), "skipping word: {err}");
                self.failures.push((word, err));
            }
        }
    }

    pub fn total(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }

    /// Each rendered text followed by a newline.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (_, text) in &self.rendered {
            writeln!(out, "{text}")?;
        }
        out.flush()
    }

    pub fn write_report<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }
}

/// Trimmed, non-empty lines of a word list.
pub fn read_word_list<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

/// Look up every word, at most `jobs` at a time.
///
/// A failing word is logged and recorded in the report; it never stops the
/// run.
pub async fn run_batch(
    service: &LookupService,
    words: &[String],
    limit: SenseLimit,
    jobs: NonZeroUsize,
) -> BatchReport {
    info!(words = words.len(), jobs = jobs.get(), %limit, "starting batch");
    let mut report = BatchReport::default();

    if jobs.get() == 1 {
        for word in words {
            let result = service.lookup_and_format(word, limit).await;
            report.record(word.clone(), result);
        }
    } else {
        let permits = Arc::new(Semaphore::new(jobs.get()));
        let mut tasks = JoinSet::new();
        for (index, word) in words.iter().cloned().enumerate() {
            let service = service.clone();
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = permits.acquire_owned().await;
                let result = service.lookup_and_format(&word, limit).await;
                (index, word, result)
            });
        }

        let mut slots: Vec<Option<(String, Result<String, LookupError>)>> =
            (0..words.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, word, result) = match joined {
                Ok(done) => done,
                Err(err) => panic::resume_unwind(err.into_panic()),
            };
            slots[index] = Some((word, result));
        }
        for (word, result) in slots.into_iter().flatten() {
            report.record(word, result);
        }
    }

    info!(
        rendered = report.rendered.len(),
        failed = report.failures.len(),
        "batch finished"
    );
    report
}
