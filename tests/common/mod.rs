//! Local stand-ins for the feed, the article pages and the generative API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use news_digest::config::{GeminiConfig, build_http_client};
use news_digest::feed::FeedReader;
use news_digest::llm::GeminiClient;
use news_digest::pipeline::{ArchivePrefixes, Pipeline};
use news_digest::scraper::ContentScraper;
use news_digest::storage::{ArchiveStore, MemoryObjectStore};
use news_digest::summarizer::Summarizer;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Barrier;

pub const API_KEY: &str = "test-key";
pub const FULL_PREFIX: &str = "news/full/";
pub const SUMMARIZED_PREFIX: &str = "news/summarized/";

/// Article text containing this marker makes the fake model answer with a 500.
pub const UNSUMMARIZABLE: &str = "[unsummarizable]";

pub enum FeedSpec {
    /// Items linking to `/articles/{slug}` in the given order.
    Items(Vec<String>),
    Raw(String),
    Unavailable,
}

impl FeedSpec {
    pub fn items(slugs: &[&str]) -> Self {
        FeedSpec::Items(slugs.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Clone)]
pub enum Page {
    Article(Vec<String>),
    /// Served only after the given delay.
    Delayed(Duration, Vec<String>),
    NoArticle,
    Missing,
}

impl Page {
    pub fn text(paragraphs: &[&str]) -> Self {
        Page::Article(paragraphs.iter().map(|p| p.to_string()).collect())
    }
}

#[derive(Clone)]
struct Shared {
    feed: Option<String>,
    pages: Arc<HashMap<String, Page>>,
    page_hits: Arc<AtomicUsize>,
    generate_hits: Arc<AtomicUsize>,
    gate: Option<Arc<Barrier>>,
}

pub struct Upstream {
    pub base_url: String,
    page_hits: Arc<AtomicUsize>,
    generate_hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn feed_url(&self) -> String {
        format!("{}/feed.xml", self.base_url)
    }

    pub fn article_url(&self, slug: &str) -> String {
        format!("{}/articles/{}", self.base_url, slug)
    }

    pub fn page_hits(&self) -> usize {
        self.page_hits.load(Ordering::SeqCst)
    }

    pub fn generate_hits(&self) -> usize {
        self.generate_hits.load(Ordering::SeqCst)
    }
}

pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_upstream(feed: FeedSpec, pages: Vec<(&str, Page)>) -> Upstream {
    start_upstream(feed, pages, None).await
}

/// Like [`spawn_upstream`], but every page and generate request blocks until
/// `parties` requests of the same kind are waiting together.
pub async fn spawn_gated_upstream(feed: FeedSpec, pages: Vec<(&str, Page)>, parties: usize) -> Upstream {
    start_upstream(feed, pages, Some(Arc::new(Barrier::new(parties)))).await
}

async fn start_upstream(feed: FeedSpec, pages: Vec<(&str, Page)>, gate: Option<Arc<Barrier>>) -> Upstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let feed = match feed {
        FeedSpec::Items(slugs) => Some(rss_document(&base_url, &slugs)),
        FeedSpec::Raw(body) => Some(body),
        FeedSpec::Unavailable => None,
    };
    let shared = Shared {
        feed,
        pages: Arc::new(pages.into_iter().map(|(slug, page)| (slug.to_string(), page)).collect()),
        page_hits: Arc::new(AtomicUsize::new(0)),
        generate_hits: Arc::new(AtomicUsize::new(0)),
        gate,
    };
    let upstream = Upstream {
        base_url,
        page_hits: shared.page_hits.clone(),
        generate_hits: shared.generate_hits.clone(),
    };

    let router = Router::new()
        .route("/feed.xml", get(feed_handler))
        .route("/articles/:slug", get(page_handler))
        .route("/v1beta/models/:model", post(generate_handler))
        .with_state(shared);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    upstream
}

pub fn rss_document(base_url: &str, slugs: &[String]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                "<item><title>Headline {slug}</title><description>Teaser {slug}</description>\
                 <link>{base_url}/articles/{slug}</link>\
                 <pubDate>Thu, 01 May 2025 08:00:00 GMT</pubDate></item>"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss version=\"2.0\"><channel>\
         <title>Test News</title><link>{base_url}</link><description>Top stories</description>\
         {items}</channel></rss>"
    )
}

async fn feed_handler(State(shared): State<Shared>) -> Response {
    match shared.feed {
        Some(body) => ([("content-type", "application/rss+xml")], body).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn page_handler(State(shared): State<Shared>, Path(slug): Path<String>) -> Response {
    shared.page_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(gate) = &shared.gate {
        gate.wait().await;
    }
    match shared.pages.get(&slug) {
        Some(Page::Article(paragraphs)) => article_page(&slug, paragraphs),
        Some(Page::Delayed(delay, paragraphs)) => {
            tokio::time::sleep(*delay).await;
            article_page(&slug, paragraphs)
        }
        Some(Page::NoArticle) => {
            Html("<html><body><p>Please accept cookies</p></body></html>").into_response()
        }
        Some(Page::Missing) | None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn article_page(slug: &str, paragraphs: &[String]) -> Response {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    Html(format!(
        "<html><body><nav><p>Menu</p></nav><article><h1>{}</h1>{}</article></body></html>",
        slug, body
    ))
    .into_response()
}

async fn generate_handler(
    State(shared): State<Shared>,
    Path(model): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    shared.generate_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(gate) = &shared.gate {
        gate.wait().await;
    }

    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if model != "test-model:generateContent" {
        return StatusCode::NOT_FOUND.into_response();
    }

    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if prompt.contains(UNSUMMARIZABLE) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").into_response();
    }
    let content = prompt.rsplit_once(":\n\n").map(|(_, c)| c).unwrap_or(prompt);

    Json(json!({
        "candidates": [{
            "content": {"parts": [{"text": format!("- {}", content)}], "role": "model"}
        }]
    }))
    .into_response()
}

pub fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        api_key: API_KEY.to_string(),
        model: "test-model".to_string(),
        base_url: base_url.to_string(),
    }
}

pub fn pipeline(upstream: &Upstream, store: Arc<MemoryObjectStore>) -> Pipeline {
    let client = build_http_client(None).unwrap();
    let generator = GeminiClient::new(client.clone(), &gemini_config(&upstream.base_url));

    Pipeline::new(
        FeedReader::new(client.clone(), upstream.feed_url()),
        ContentScraper::new(client),
        Summarizer::new(Arc::new(generator)),
        ArchiveStore::new(store),
        ArchivePrefixes {
            full_data: FULL_PREFIX.to_string(),
            summarized: SUMMARIZED_PREFIX.to_string(),
        },
    )
}
