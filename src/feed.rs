use reqwest::Client;
use rss::Channel;
use tracing::{debug, info, instrument};

use crate::error::{AppError, Result};
use crate::models::ArticleStub;

/// Upper bound on articles taken from the top of the feed per run.
pub const MAX_ARTICLES: usize = 10;

/// Reads the configured RSS feed and turns its leading items into stubs.
#[derive(Clone)]
pub struct FeedReader {
    client: Client,
    feed_url: String,
}

impl FeedReader {
    pub fn new(client: Client, feed_url: impl Into<String>) -> Self {
        Self {
            client,
            feed_url: feed_url.into(),
        }
    }

    /// Fetches the feed and returns up to [`MAX_ARTICLES`] stubs in document order.
    ///
    /// An empty channel is not an error; callers must check for an empty result.
    #[instrument(level = "info", skip_all, fields(url = %self.feed_url))]
    pub async fn fetch_top_articles(&self) -> Result<Vec<ArticleStub>> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::FeedUnavailable(e.to_string()))?;
        debug!(bytes = body.len(), "Fetched feed document");

        let articles = parse_feed(&body)?;
        info!(count = articles.len(), "Fetched news from feed");
        Ok(articles)
    }
}

/// Parses an RSS document into at most [`MAX_ARTICLES`] stubs.
///
/// Items without a title or link make the feed malformed. A missing description or
/// publication date is kept as an empty string.
pub fn parse_feed(body: &[u8]) -> Result<Vec<ArticleStub>> {
    let channel = Channel::read_from(body).map_err(|e| AppError::FeedMalformed(e.to_string()))?;

    channel
        .items()
        .iter()
        .take(MAX_ARTICLES)
        .enumerate()
        .map(|(index, item)| {
            let title = item
                .title()
                .ok_or_else(|| AppError::FeedMalformed(format!("item {} has no title", index)))?;
            let link = item
                .link()
                .ok_or_else(|| AppError::FeedMalformed(format!("item {} has no link", index)))?;

            Ok(ArticleStub {
                title: title.to_string(),
                description: item.description().unwrap_or_default().to_string(),
                link: link.to_string(),
                pub_date: item.pub_date().unwrap_or_default().to_string(),
            })
        })
        .collect()
}
