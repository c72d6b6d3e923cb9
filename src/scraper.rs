use futures::future::join_all;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::error::DropReason;
use crate::models::{ArticleStub, EnrichedArticle};

// Paragraphs inside the main article container
static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("article p").expect("Failed to parse article paragraph selector")
});

/// Enriches feed stubs with the body text of their linked pages.
#[derive(Clone)]
pub struct ContentScraper {
    client: Client,
}

impl ContentScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Scrapes every stub concurrently and waits for all of them to settle.
    ///
    /// Stubs that fail are logged and left out; survivors keep their feed order.
    #[instrument(level = "info", skip_all, fields(requested = stubs.len()))]
    pub async fn scrape_all(&self, stubs: Vec<ArticleStub>) -> Vec<EnrichedArticle> {
        let attempts = join_all(stubs.into_iter().map(|stub| self.scrape_one(stub))).await;

        let articles: Vec<EnrichedArticle> = attempts
            .into_iter()
            .filter_map(|attempt| match attempt {
                Ok(article) => Some(article),
                Err((link, reason)) => {
                    warn!(%link, error = %reason, "Failed to scrape article; dropping it");
                    None
                }
            })
            .collect();

        info!(count = articles.len(), "Scraped article contents");
        articles
    }

    async fn scrape_one(
        &self,
        stub: ArticleStub,
    ) -> std::result::Result<EnrichedArticle, (String, DropReason)> {
        match self.fetch_content(&stub.link).await {
            Ok(content) => {
                debug!(link = %stub.link, chars = content.len(), "Scraped article");
                Ok(EnrichedArticle::new(stub, content))
            }
            Err(reason) => Err((stub.link, reason)),
        }
    }

    async fn fetch_content(&self, url: &str) -> std::result::Result<String, DropReason> {
        let html = fetch_html(&self.client, url).await?;
        let content = extract_article_text(&html);
        if content.is_empty() {
            return Err(DropReason::NoContent);
        }
        Ok(content)
    }
}

pub async fn fetch_html(client: &Client, url: &str) -> std::result::Result<String, DropReason> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| DropReason::Fetch(e.to_string()))?;
    response.text().await.map_err(|e| DropReason::Parse(e.to_string()))
}

/// Collects the text of every `article p` element.
///
/// Paragraphs are joined by blank lines and every run of newlines is then folded into
/// a single space, so the result is one line of prose.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPH_SELECTOR)
        .map(|element| element.text().collect::<String>())
        .collect();

    collapse_newlines(&paragraphs.join("\n\n"))
}

fn collapse_newlines(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_newlines = false;

    for ch in text.chars() {
        if ch == '\n' {
            if !in_newlines {
                result.push(' ');
                in_newlines = true;
            }
        } else {
            result.push(ch);
            in_newlines = false;
        }
    }

    result
}
