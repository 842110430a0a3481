use std::collections::HashMap;

use axum::Router;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use lexicon_types::LexicalCategory;
use oxford_client::{OxfordClient, OxfordConfig, ProviderError, SearchMode};
use tokio::net::TcpListener;

const TRANSLATIONS_BOOK: &str = include_str!("fixtures/translations_book.json");
const LEMMAS_BOOKS: &str = include_str!("fixtures/lemmas_books.json");
const ENTRIES_RECORD: &str = include_str!("fixtures/entries_record.json");
const SEARCH_BOK: &str = include_str!("fixtures/search_bok.json");

fn json(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("app_id").is_some_and(|v| v == "test-id")
        && headers.get("app_key").is_some_and(|v| v == "test-key")
}

async fn translations(
    Path((source, target, word)): Path<(String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let loose = query.get("strictMatch").map(String::as_str) == Some("false");
    match (source.as_str(), target.as_str(), word.as_str(), loose) {
        ("en-gb", "zh", "book", true) => json(TRANSLATIONS_BOOK),
        _ => (StatusCode::NOT_FOUND, r#"{"error":"No entry found"}"#).into_response(),
    }
}

async fn lemmas(Path((source, word)): Path<(String, String)>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    match (source.as_str(), word.as_str()) {
        ("en-gb", "books") => json(LEMMAS_BOOKS),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn entries(Path((_source, word)): Path<(String, String)>) -> Response {
    match word.as_str() {
        "garbled" => json("{\"results\": ["),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, r#"{"error":"No entry found"}"#).into_response()
}

async fn words(
    Path(source): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match (source.as_str(), query.get("q").map(String::as_str)) {
        ("en-gb", Some("records")) => json(ENTRIES_RECORD),
        _ => not_found(),
    }
}

async fn search(
    Path(source): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match (source.as_str(), query.get("q").map(String::as_str)) {
        ("en-gb", Some("bok")) => json(SEARCH_BOK),
        _ => not_found(),
    }
}

async fn search_thesaurus(Path(source): Path<String>) -> Response {
    match source.as_str() {
        "en-gb" => json(
            r#"{"results":[{"word":"tome","score":9.5,"matchType":"thesaurus"}]}"#,
        ),
        _ => not_found(),
    }
}

async fn search_translations(
    Path((source, target)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let q = query.get("q").map(String::as_str).unwrap_or_default();
    let body = format!(
        r#"{{"results":[{{"word":"{q}","score":1.0,"matchType":"{source}->{target}"}}]}}"#
    );
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn spawn_provider() -> String {
    let app = Router::new()
        .route(
            "/api/v2/translations/{source}/{target}/{word}",
            get(translations),
        )
        .route("/api/v2/lemmas/{source}/{word}", get(lemmas))
        .route("/api/v2/entries/{source}/{word}", get(entries))
        .route("/api/v2/words/{source}", get(words))
        .route("/api/v2/search/{source}", get(search))
        .route("/api/v2/search/thesaurus/{source}", get(search_thesaurus))
        .route(
            "/api/v2/search/translations/{source}/{target}",
            get(search_translations),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v2")
}

fn client(base_url: String, app_id: &str) -> OxfordClient {
    let mut config = OxfordConfig::new(app_id, "test-key");
    config.base_url = base_url;
    config.rate_limit_rps = 0;
    OxfordClient::new(config).unwrap()
}

#[tokio::test]
async fn fetches_translations_with_credentials() {
    let client = client(spawn_provider().await, "test-id");
    let pages = client.fetch_translations("book", "zh").await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].headword(), "book");
    assert_eq!(pages[0].get(LexicalCategory::Verb).unwrap()[0].senses.len(), 2);
}

#[tokio::test]
async fn fetches_lemmas() {
    let client = client(spawn_provider().await, "test-id");
    let lemmas = client.fetch_lemmas("books").await.unwrap();
    assert_eq!(lemmas.headword(), "books");
    assert_eq!(lemmas.first().unwrap().1, ["book"]);
}

#[tokio::test]
async fn not_found_is_an_empty_result() {
    let client = client(spawn_provider().await, "test-id");
    assert!(client.fetch_translations("zzxq", "zh").await.unwrap().is_empty());
    let lemmas = client.fetch_lemmas("zzxq").await.unwrap();
    assert!(lemmas.is_empty());
    assert_eq!(lemmas.headword(), "zzxq");
}

#[tokio::test]
async fn wrong_credentials_surface_the_status() {
    let client = client(spawn_provider().await, "someone-else");
    let err = client.fetch_lemmas("books").await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Status { status, .. } if status.as_u16() == 403
    ));
}

#[tokio::test]
async fn server_errors_and_bad_bodies_fail() {
    let client = client(spawn_provider().await, "test-id");
    let err = client.fetch_entries("book").await.unwrap_err();
    match err {
        ProviderError::Status { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = client.fetch_entries("garbled").await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode { .. }));
}

#[tokio::test]
async fn words_query_returns_entry_pages() {
    let client = client(spawn_provider().await, "test-id");
    assert_eq!(client.source_lang(), "en-gb");
    let pages = client.fetch_words("records").await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].headword(), "record");
    assert!(client.fetch_words("zzxq").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_modes_hit_their_endpoints() {
    let client = client(spawn_provider().await, "test-id");

    let fuzzy = client.fetch_search("bok", &SearchMode::Fuzzy).await.unwrap();
    assert_eq!(fuzzy.len(), 3);
    assert_eq!(fuzzy[0].word, "book");
    assert!(client.fetch_search("zzxq", &SearchMode::Fuzzy).await.unwrap().is_empty());

    let thesaurus = client.fetch_search("book", &SearchMode::Thesaurus).await.unwrap();
    assert_eq!(thesaurus[0].word, "tome");

    let translated = client
        .fetch_search("book", &SearchMode::Translations("zh".into()))
        .await
        .unwrap();
    assert_eq!(translated[0].word, "book");
    assert_eq!(translated[0].match_type, "en-gb->zh");
}
