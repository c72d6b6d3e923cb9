use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::error::DropReason;
use crate::llm::TextGenerator;
use crate::models::{EnrichedArticle, SummarizedArticle};

const SUMMARY_PROMPT: &str = "Summarize the following news article using bullet points in a professional tone, \
similar to a news report. Highlight only the key facts and developments. Avoid introductory phrases like \
'Here's what happened' or 'In summary'. Just provide the bullet-point summary—clear, concise, and under \
100 words total. :\n\n";

pub fn build_prompt(content: &str) -> String {
    let mut result = String::with_capacity(SUMMARY_PROMPT.len() + content.len());
    result.push_str(SUMMARY_PROMPT);
    result.push_str(content);
    result
}

/// Turns enriched articles into bullet-point summaries.
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Summarizes every article concurrently and waits for all calls to settle.
    ///
    /// Articles with blank content are skipped without a call. Failed or empty
    /// generations are logged and left out; survivors keep their input order.
    #[instrument(level = "info", skip_all, fields(requested = articles.len()))]
    pub async fn summarize_all(&self, articles: Vec<EnrichedArticle>) -> Vec<SummarizedArticle> {
        let attempts = join_all(articles.into_iter().map(|article| self.summarize_one(article))).await;

        let summarized: Vec<SummarizedArticle> = attempts
            .into_iter()
            .filter_map(|attempt| match attempt {
                Ok(article) => Some(article),
                Err((link, reason)) => {
                    warn!(%link, error = %reason, "Failed to summarize article; dropping it");
                    None
                }
            })
            .collect();

        info!(count = summarized.len(), "Summarized articles");
        summarized
    }

    async fn summarize_one(
        &self,
        article: EnrichedArticle,
    ) -> std::result::Result<SummarizedArticle, (String, DropReason)> {
        if article.content.trim().is_empty() {
            return Err((article.stub.link, DropReason::EmptyContent));
        }

        let prompt = build_prompt(&article.content);
        match self.generator.generate(&prompt).await {
            Ok(summary) if summary.trim().is_empty() => {
                Err((article.stub.link, DropReason::EmptySummary))
            }
            Ok(summary) => {
                debug!(link = %article.stub.link, chars = summary.len(), "Generated summary");
                Ok(article.into_summarized(summary))
            }
            Err(e) => Err((article.stub.link, DropReason::Generation(e.to_string()))),
        }
    }
}
