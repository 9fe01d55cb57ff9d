//! Web search collaborators
//!
//! Wikipedia is tried first (search, then the intro extract of the top hit),
//! DuckDuckGo instant answers second. A search that finds nothing is
//! `Ok(None)`; transport failures are errors the caller may ignore.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::errors::{NovaError, Result};

pub const DEFAULT_WIKIPEDIA_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com";

/// Default summary length in characters
pub const DEFAULT_SUMMARY_CHARS: usize = 300;

/// Where a search summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSource {
    Wikipedia,
    DuckDuckGo,
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSource::Wikipedia => write!(f, "wikipedia"),
            SearchSource::DuckDuckGo => write!(f, "duckduckgo"),
        }
    }
}

/// A summarized search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub source: SearchSource,
    pub summary: String,
}

/// Looks a query up on the web
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>>;
}

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern compiles"));

/// Shorten text to at most `max_chars`, cutting on sentence boundaries
///
/// Text that has to be cut ends with `...`. When not even the first sentence
/// fits, the first `max_chars` characters are kept instead.
pub fn summarize_text(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut summary = String::new();
    let mut used = 0;
    for sentence in SENTENCE.find_iter(text) {
        let len = sentence.as_str().chars().count();
        if used + len > max_chars {
            break;
        }
        summary.push_str(sentence.as_str());
        used += len;
    }

    let summary = summary.trim();
    if summary.is_empty() {
        let cut: String = text.chars().take(max_chars).collect();
        return format!("{}...", cut.trim_end());
    }
    format!("{}...", summary)
}

/// Multi-word phrases are replaced before single words
const PHRASES: &[(&str, &str)] = &[
    ("presiden indonesia", "president of indonesia"),
    ("hari ini", "today"),
];

const WORDS: &[(&str, &str)] = &[
    ("presiden", "president"),
    ("siapa", "who"),
    ("apa", "what"),
    ("kapan", "when"),
    ("dimana", "where"),
    ("berapa", "how much"),
    ("berita", "news"),
    ("terbaru", "latest"),
    ("cuaca", "weather"),
    ("harga", "price"),
    ("persib", "persib bandung"),
];

/// Rough Indonesian → English rewrite so English search APIs find something
pub fn translate_query_to_english(query: &str) -> String {
    let mut text = query.to_lowercase();
    for (id, en) in PHRASES {
        text = text.replace(id, en);
    }

    text.split_whitespace()
        .map(|word| {
            let bare = word.trim_matches(|c: char| c.is_ascii_punctuation());
            WORDS
                .iter()
                .find(|(id, _)| *id == bare)
                .map(|(_, en)| en.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("nova/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(NovaError::HttpError)
}

#[derive(Debug, Deserialize)]
struct WikiSearchResponse {
    query: Option<WikiSearchQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiSearchQuery {
    #[serde(default)]
    search: Vec<WikiSearchItem>,
}

#[derive(Debug, Deserialize)]
struct WikiSearchItem {
    title: String,
}

#[derive(Debug, Deserialize)]
struct WikiExtractResponse {
    query: Option<WikiExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiExtractQuery {
    #[serde(default)]
    pages: serde_json::Map<String, serde_json::Value>,
}

/// English Wikipedia via the MediaWiki action API
#[derive(Debug, Clone)]
pub struct WikipediaSearch {
    client: Client,
    base_url: String,
    max_chars: usize,
}

impl WikipediaSearch {
    pub fn new(base_url: &str, timeout: Duration, max_chars: usize) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_chars,
        })
    }

    async fn top_title(&self, query: &str) -> Result<Option<String>> {
        let url = format!("{}/w/api.php", self.base_url);
        let response: WikiSearchResponse = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .query
            .and_then(|q| q.search.into_iter().next())
            .map(|item| item.title))
    }

    async fn intro_extract(&self, title: &str) -> Result<Option<String>> {
        let url = format!("{}/w/api.php", self.base_url);
        let response: WikiExtractResponse = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let extract = response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(|(_, page)| page["extract"].as_str().map(str::to_string))
            .filter(|text| !text.trim().is_empty());
        Ok(extract)
    }
}

#[async_trait]
impl WebSearch for WikipediaSearch {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        let Some(title) = self.top_title(query).await? else {
            debug!(query, "wikipedia: no results");
            return Ok(None);
        };
        debug!(query, %title, "wikipedia: top hit");

        Ok(self.intro_extract(&title).await?.map(|extract| SearchHit {
            source: SearchSource::Wikipedia,
            summary: summarize_text(&extract, self.max_chars),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct DuckDuckGoResponse {
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
}

/// DuckDuckGo instant answer API
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
    max_chars: usize,
}

impl DuckDuckGoSearch {
    pub fn new(base_url: &str, timeout: Duration, max_chars: usize) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_chars,
        })
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await?
            .error_for_status()?;

        // The API answers with `application/x-javascript`, so parse the text
        let body = response.text().await?;
        let parsed: DuckDuckGoResponse = serde_json::from_str(&body)?;

        if parsed.abstract_text.trim().is_empty() {
            debug!(query, "duckduckgo: no abstract");
            return Ok(None);
        }
        Ok(Some(SearchHit {
            source: SearchSource::DuckDuckGo,
            summary: summarize_text(&parsed.abstract_text, self.max_chars),
        }))
    }
}

/// Tries each backend in order, returning the first hit
///
/// A failing or timed-out backend is skipped; the chain only errors when
/// every backend errored. With a budget, each backend gets an equal share so
/// a hanging backend cannot starve the ones after it.
pub struct ChainedSearch {
    backends: Vec<Box<dyn WebSearch>>,
    per_backend: Option<Duration>,
}

impl ChainedSearch {
    pub fn new(backends: Vec<Box<dyn WebSearch>>) -> Self {
        Self {
            backends,
            per_backend: None,
        }
    }

    /// Wikipedia then DuckDuckGo against the public endpoints, sharing `budget`
    pub fn public(budget: Duration, max_chars: usize) -> Result<Self> {
        let share = budget / 2;
        Ok(Self::new(vec![
            Box::new(WikipediaSearch::new(DEFAULT_WIKIPEDIA_URL, share, max_chars)?),
            Box::new(DuckDuckGoSearch::new(DEFAULT_DUCKDUCKGO_URL, share, max_chars)?),
        ])
        .with_budget(budget))
    }

    /// Split `budget` evenly across the backends
    pub fn with_budget(mut self, budget: Duration) -> Self {
        let count = self.backends.len().max(1) as u32;
        self.per_backend = Some(budget / count);
        self
    }
}

#[async_trait]
impl WebSearch for ChainedSearch {
    async fn search(&self, query: &str) -> Result<Option<SearchHit>> {
        let query = translate_query_to_english(query);

        let mut last_error = None;
        let mut any_succeeded = false;
        for backend in &self.backends {
            let outcome = match self.per_backend {
                Some(share) => tokio::time::timeout(share, backend.search(&query))
                    .await
                    .unwrap_or_else(|_| {
                        Err(NovaError::Search(format!("backend timed out after {}ms", share.as_millis())))
                    }),
                None => backend.search(&query).await,
            };
            match outcome {
                Ok(Some(hit)) => return Ok(Some(hit)),
                Ok(None) => any_succeeded = true,
                Err(e) => {
                    debug!(error = %e, "search backend failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_succeeded => Err(NovaError::Search(e.to_string())),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_summarize_short_text_untouched() {
        assert_eq!(summarize_text("Jakarta is big.", 300), "Jakarta is big.");
    }

    #[test]
    fn test_summarize_cuts_on_sentences() {
        let text = "One two. Three four! Five six seven eight nine ten?";
        let summary = summarize_text(text, 25);
        assert_eq!(summary, "One two. Three four!...");
        assert!(summary.chars().count() <= 25 + 3);
    }

    #[test]
    fn test_summarize_without_fitting_sentence() {
        let text = "a".repeat(50);
        assert_eq!(summarize_text(&text, 10), format!("{}...", "a".repeat(10)));
    }

    #[test]
    fn test_translate_query() {
        assert_eq!(translate_query_to_english("Siapa presiden Indonesia?"), "who president of indonesia?");
        assert_eq!(translate_query_to_english("berita terbaru hari ini"), "news latest today");
        assert_eq!(translate_query_to_english("apakah rendang enak"), "apakah rendang enak");
    }

    fn wiki_search_mock(title: &str) -> Mock {
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("list", "search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "search": [{ "title": title, "pageid": 1 }] }
            })))
    }

    #[tokio::test]
    async fn test_wikipedia_search_and_extract() {
        let server = MockServer::start().await;
        wiki_search_mock("Jakarta").mount(&server).await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .and(query_param("prop", "extracts"))
            .and(query_param("titles", "Jakarta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "query": { "pages": { "1": { "title": "Jakarta", "extract": "Jakarta is the capital of Indonesia." } } }
            })))
            .mount(&server)
            .await;

        let search = WikipediaSearch::new(&server.uri(), TIMEOUT, 300).unwrap();
        let hit = search.search("jakarta").await.unwrap().unwrap();
        assert_eq!(hit.source, SearchSource::Wikipedia);
        assert_eq!(hit.summary, "Jakarta is the capital of Indonesia.");
    }

    #[tokio::test]
    async fn test_wikipedia_no_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"query": {"search": []}})))
            .mount(&server)
            .await;

        let search = WikipediaSearch::new(&server.uri(), TIMEOUT, 300).unwrap();
        assert!(search.search("zzqx").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duckduckgo_abstract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("format", "json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"AbstractText": "Rendang is a Minang dish.", "Heading": "Rendang"}"#),
            )
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(&server.uri(), TIMEOUT, 300).unwrap();
        let hit = search.search("rendang").await.unwrap().unwrap();
        assert_eq!(hit.source, SearchSource::DuckDuckGo);
        assert_eq!(hit.summary, "Rendang is a Minang dish.");
    }

    #[tokio::test]
    async fn test_duckduckgo_empty_abstract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"AbstractText": ""}"#))
            .mount(&server)
            .await;

        let search = DuckDuckGoSearch::new(&server.uri(), TIMEOUT, 300).unwrap();
        assert!(search.search("zzqx").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_second_backend() {
        let wiki = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&wiki)
            .await;

        let ddg = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "who president"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"AbstractText": "Prabowo."}"#))
            .mount(&ddg)
            .await;

        let chain = ChainedSearch::new(vec![
            Box::new(WikipediaSearch::new(&wiki.uri(), TIMEOUT, 300).unwrap()),
            Box::new(DuckDuckGoSearch::new(&ddg.uri(), TIMEOUT, 300).unwrap()),
        ]);
        let hit = chain.search("siapa presiden").await.unwrap().unwrap();
        assert_eq!(hit.source, SearchSource::DuckDuckGo);
        assert_eq!(hit.summary, "Prabowo.");
    }

    #[tokio::test]
    async fn test_chain_errors_only_when_all_fail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let chain = ChainedSearch::new(vec![
            Box::new(WikipediaSearch::new(&server.uri(), TIMEOUT, 300).unwrap()),
            Box::new(DuckDuckGoSearch::new(&server.uri(), TIMEOUT, 300).unwrap()),
        ]);
        assert!(matches!(chain.search("halo").await, Err(NovaError::Search(_))));
    }

    #[tokio::test]
    async fn test_hanging_backend_leaves_budget_for_the_next() {
        let wiki = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&wiki)
            .await;

        let ddg = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"AbstractText": "Prabowo."}"#))
            .mount(&ddg)
            .await;

        let budget = Duration::from_millis(800);
        let chain = ChainedSearch::new(vec![
            Box::new(WikipediaSearch::new(&wiki.uri(), TIMEOUT, 300).unwrap()),
            Box::new(DuckDuckGoSearch::new(&ddg.uri(), TIMEOUT, 300).unwrap()),
        ])
        .with_budget(budget);

        let hit = tokio::time::timeout(budget + Duration::from_millis(100), chain.search("siapa presiden"))
            .await
            .expect("chain stays within its budget")
            .unwrap()
            .unwrap();
        assert_eq!(hit.source, SearchSource::DuckDuckGo);
    }
}
