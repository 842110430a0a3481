use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use lexicon_summary::{SenseLimit, SenseSummary, format_summaries};
use oxford_client::{SearchMatch, SearchMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::{ErrorKind, LookupError};
use crate::lookup::{EntrySource, LookupService};

#[derive(Clone)]
pub struct AppState {
    pub service: LookupService,
    pub default_sense_limit: SenseLimit,
    /// Upper bound for `sense_limit` query values; zero disables the cap.
    pub max_sense_limit: usize,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub word: Option<String>,
    pub sense_limit: Option<usize>,
}

#[derive(Serialize)]
pub struct LookupResponse {
    word: String,
    text: String,
    summaries: Vec<SummaryItem>,
}

#[derive(Serialize)]
struct SummaryItem {
    headword: String,
    category: String,
    abbreviation: &'static str,
    pronunciation: String,
    senses: Vec<String>,
}

impl From<&SenseSummary> for SummaryItem {
    fn from(summary: &SenseSummary) -> Self {
        Self {
            headword: summary.text().to_string(),
            category: summary.category().to_string(),
            abbreviation: summary.category().abbreviation(),
            pronunciation: summary.pronunciation().to_string(),
            senses: summary.senses().to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Fuzzy,
    Thesaurus,
    Translations,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub mode: SearchKind,
    /// Target language for translation searches; defaults to the service's.
    pub target: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    word: String,
    matches: Vec<SearchMatch>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/lookup", get(lookup))
        .route("/v1/search", get(search))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let word = params.word.as_deref().map(str::trim).unwrap_or_default();
    if word.is_empty() {
        return Err(ApiError::bad_request("word is required"));
    }
    let limit = params
        .sense_limit
        .map(|requested| clamp_limit(requested, state.max_sense_limit))
        .unwrap_or(state.default_sense_limit);

    let summaries = state.service.summarize(word, limit).await?;
    let text = format_summaries(&summaries).map_err(LookupError::from)?;
    Ok(Json(LookupResponse {
        word: word.to_string(),
        text,
        summaries: summaries.iter().map(SummaryItem::from).collect(),
    }))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let word = params.q.as_deref().map(str::trim).unwrap_or_default();
    if word.is_empty() {
        return Err(ApiError::bad_request("q is required"));
    }
    let mode = search_mode(params.mode, params.target, state.service.source())?;
    let matches = state.service.search(word, &mode).await?;
    Ok(Json(SearchResponse {
        word: word.to_string(),
        matches,
    }))
}

fn search_mode(
    kind: SearchKind,
    target: Option<String>,
    source: &EntrySource,
) -> Result<SearchMode, ApiError> {
    Ok(match kind {
        SearchKind::Fuzzy => SearchMode::Fuzzy,
        SearchKind::Thesaurus => SearchMode::Thesaurus,
        SearchKind::Translations => match (target, source) {
            (Some(target), _) => SearchMode::Translations(target),
            (None, EntrySource::Translations(target)) => SearchMode::Translations(target.clone()),
            (None, _) => {
                return Err(ApiError::bad_request(
                    "target is required for translation searches",
                ));
            }
        },
    })
}

/// Requests above `max` (including "unbounded") get `max`.
fn clamp_limit(requested: usize, max: usize) -> SenseLimit {
    if max == 0 {
        return SenseLimit::new(requested);
    }
    if requested == 0 || requested > max {
        SenseLimit::new(max)
    } else {
        SenseLimit::new(requested)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Lookup => StatusCode::NOT_FOUND,
                ErrorKind::Provider => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::BAD_GATEWAY {
            warn!("provider failure: {self}");
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
