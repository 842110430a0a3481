pub mod batch;
pub mod error;
pub mod handlers;
pub mod lookup;
pub mod provider;

#[cfg(test)]
mod testing;

pub use batch::{BatchReport, read_word_list, run_batch};
pub use error::{ErrorKind, LookupError};
pub use handlers::{AppState, router};
pub use lookup::{EntrySource, LookupService};
pub use provider::DictionaryProvider;
