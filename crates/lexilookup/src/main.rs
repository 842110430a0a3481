use std::io;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lexicon_summary::SenseLimit;
use oxford_client::{
    DEFAULT_BASE_URL, DEFAULT_RATE_LIMIT_BURST, DEFAULT_RATE_LIMIT_RPS, DEFAULT_SOURCE_LANG,
    DEFAULT_TIMEOUT, OxfordClient, OxfordConfig, SearchMode,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use lexilookup::{
    AppState, EntrySource, LookupError, LookupService, read_word_list, router, run_batch,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_TARGET_LANG: &str = "zh";
const DEFAULT_MAX_SENSE_LIMIT: usize = 20;

#[derive(Parser)]
#[command(name = "lexilookup", version)]
#[command(about = "Compact bilingual dictionary summaries from the Oxford Dictionaries API")]
struct Cli {
    #[command(flatten)]
    provider: ProviderArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProviderArgs {
    #[arg(long, env = "OXFORD_APP_ID")]
    app_id: String,
    #[arg(long, env = "OXFORD_APP_KEY", hide_env_values = true)]
    app_key: String,
    #[arg(long, env = "OXFORD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, env = "OXFORD_SOURCE_LANG", default_value = DEFAULT_SOURCE_LANG)]
    source_lang: String,
    #[arg(long, env = "OXFORD_TARGET_LANG", default_value = DEFAULT_TARGET_LANG)]
    target_lang: String,
    /// Where summarized entries come from
    #[arg(long, value_enum, env = "ENTRY_SOURCE", default_value_t = SourceArg::Translations)]
    source: SourceArg,
    /// Senses kept per summary; 0 keeps all
    #[arg(long, env = "SENSE_LIMIT", default_value_t = SenseLimit::DEFAULT)]
    sense_limit: usize,
    #[arg(long, env = "RATE_LIMIT_RPS", default_value_t = DEFAULT_RATE_LIMIT_RPS)]
    rate_limit_rps: u32,
    #[arg(long, env = "RATE_LIMIT_BURST", default_value_t = DEFAULT_RATE_LIMIT_BURST)]
    rate_limit_burst: u32,
    #[arg(long, env = "OXFORD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    /// Bilingual entries into --target-lang
    Translations,
    /// Monolingual entries for the lemma
    Entries,
    /// Monolingual entries by inflected form
    Words,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchArg {
    Fuzzy,
    Thesaurus,
    /// Headwords with translations into --target-lang
    Translations,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary of each word to stdout
    Lookup {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// List headwords close to a word, best match first
    Search {
        word: String,
        #[arg(long, value_enum, default_value_t = SearchArg::Fuzzy)]
        mode: SearchArg,
    },
    /// Summarize a word list file, one word per line
    Batch {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = NonZeroUsize::MIN)]
        jobs: NonZeroUsize,
    },
    /// Serve lookups over HTTP
    Serve {
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value_t = DEFAULT_MAX_SENSE_LIMIT)]
        max_sense_limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let limit = SenseLimit::new(cli.provider.sense_limit);
    let service = build_service(&cli.provider)?;

    match cli.command {
        Commands::Lookup { words } => lookup(&service, &words, limit).await,
        Commands::Search { word, mode } => {
            let mode = match mode {
                SearchArg::Fuzzy => SearchMode::Fuzzy,
                SearchArg::Thesaurus => SearchMode::Thesaurus,
                SearchArg::Translations => {
                    SearchMode::Translations(cli.provider.target_lang.clone())
                }
            };
            search(&service, &word, &mode).await
        }
        Commands::Batch {
            input,
            output,
            jobs,
        } => batch(&service, &input, &output, limit, jobs).await,
        Commands::Serve {
            host,
            port,
            max_sense_limit,
        } => {
            let state = AppState {
                service,
                default_sense_limit: limit,
                max_sense_limit,
            };
            serve(state, &host, port).await
        }
    }
}

fn build_service(args: &ProviderArgs) -> anyhow::Result<LookupService> {
    let config = OxfordConfig {
        base_url: args.base_url.clone(),
        app_id: args.app_id.clone(),
        app_key: args.app_key.clone(),
        source_lang: args.source_lang.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
        rate_limit_rps: args.rate_limit_rps,
        rate_limit_burst: args.rate_limit_burst,
    };
    info!("using dictionary at {}", config.base_url);
    info!(
        "rate limit: {} req/s (burst {})",
        config.rate_limit_rps, config.rate_limit_burst
    );
    let client = OxfordClient::new(config).context("configuring the Oxford client")?;

    let source = match args.source {
        SourceArg::Translations => EntrySource::Translations(args.target_lang.clone()),
        SourceArg::Entries => EntrySource::Entries,
        SourceArg::Words => EntrySource::Words,
    };
    info!("summarizing {} {}", client.source_lang(), source);
    let limit = SenseLimit::new(args.sense_limit);
    if limit.is_bounded() {
        info!("keeping at most {} senses per summary", args.sense_limit);
    } else {
        info!("keeping every sense");
    }
    Ok(LookupService::new(Arc::new(client), source))
}

async fn lookup(
    service: &LookupService,
    words: &[String],
    limit: SenseLimit,
) -> anyhow::Result<()> {
    let mut failed = 0usize;
    for word in words {
        match service.lookup_and_format(word, limit).await {
            Ok(text) => println!("{text}"),
            Err(err) => {
                warn!(word = %word, "{err}");
                if matches!(err, LookupError::NoLemmas(_)) {
                    suggest(service, word).await;
                }
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} word(s) could not be looked up", words.len());
    }
    Ok(())
}

/// Logs fuzzy matches for a word the provider does not know.
async fn suggest(service: &LookupService, word: &str) {
    match service.search(word, &SearchMode::Fuzzy).await {
        Ok(matches) if !matches.is_empty() => {
            let candidates: Vec<&str> = matches.iter().take(5).map(|m| m.word.as_str()).collect();
            info!(word = %word, "did you mean: {}", candidates.join(", "));
        }
        Ok(_) => {}
        Err(err) => warn!(word = %word, "search failed: {err}"),
    }
}

async fn search(service: &LookupService, word: &str, mode: &SearchMode) -> anyhow::Result<()> {
    let matches = service
        .search(word, mode)
        .await
        .with_context(|| format!("searching for {word}"))?;
    if matches.is_empty() {
        bail!("no matches for {word}");
    }
    for found in &matches {
        println!("{}\t{:.2}\t{}", found.word, found.score, found.match_type);
    }
    Ok(())
}

async fn batch(
    service: &LookupService,
    input: &Path,
    output: &Path,
    limit: SenseLimit,
    jobs: NonZeroUsize,
) -> anyhow::Result<()> {
    let words = read_word_list(input).with_context(|| format!("reading {}", input.display()))?;
    info!("read {} words from {}", words.len(), input.display());

    let start = Instant::now();
    let report = run_batch(service, &words, limit, jobs).await;
    report
        .write_report(output)
        .with_context(|| format!("writing {}", output.display()))?;

    println!(
        "{} of {} words rendered to {} ({} failed) in {} ms",
        report.rendered.len(),
        report.total(),
        output.display(),
        report.failures.len(),
        start.elapsed().as_millis()
    );
    Ok(())
}

async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    info!("binding to {}:{}", host, port);
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
