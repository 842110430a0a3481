use std::env;

use anyhow::{Context, Result, bail};
use oxford_client::{OxfordClient, OxfordConfig, SearchMode};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let word = args
        .next()
        .context("usage: cargo run -p oxford-client --example fetch -- <word> [target-lang]")?;
    let target = args.next();
    if args.next().is_some() {
        bail!("too many arguments");
    }

    let config = OxfordConfig::from_env().context("reading OXFORD_APP_ID/OXFORD_APP_KEY")?;
    let client = OxfordClient::new(config)?;

    let lemmas = client.fetch_lemmas(&word).await?;
    if lemmas.is_empty() {
        println!("No lemmas for '{}'. Closest headwords:", word);
        for candidate in client.fetch_search(&word, &SearchMode::Fuzzy).await? {
            println!("  {:<16} {:>6.2} {}", candidate.word, candidate.score, candidate.match_type);
        }
        return Ok(());
    }
    println!("Lemmas for '{}':", word);
    for (category, forms) in lemmas.iter() {
        println!("  {:<12} {}", category.to_string(), forms.join(", "));
    }

    let pages = match &target {
        Some(lang) => client.fetch_translations(&word, lang).await?,
        None => client.fetch_entries(&word).await?,
    };
    println!("\n{} result page(s)", pages.len());
    for page in &pages {
        println!("Headword: {}", page.headword());
        for (category, entries) in page.iter() {
            for entry in entries {
                println!(
                    "  {:<12} /{}/ {} sense(s)",
                    category.to_string(),
                    entry.pronunciation(),
                    entry.senses.len()
                );
            }
        }
    }

    Ok(())
}
