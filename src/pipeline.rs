use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::{AppError, Result, Stage};
use crate::feed::FeedReader;
use crate::llm::GeminiClient;
use crate::models::SummarizedArticle;
use crate::scraper::ContentScraper;
use crate::storage::{archive_key, ArchiveStore, ObjectStore, S3ObjectStore};
use crate::summarizer::Summarizer;

/// Key prefixes for the two archives written by a run.
#[derive(Debug, Clone)]
pub struct ArchivePrefixes {
    pub full_data: String,
    pub summarized: String,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub timestamp: String,
    pub raw_key: String,
    pub storage_key: String,
    pub summarized: Vec<SummarizedArticle>,
}

/// One end-to-end run. Each stage gates the next; the raw archive is not
/// rolled back when a later stage fails.
pub struct Pipeline {
    feed: FeedReader,
    scraper: ContentScraper,
    summarizer: Summarizer,
    archive: ArchiveStore,
    prefixes: ArchivePrefixes,
}

impl Pipeline {
    pub fn new(
        feed: FeedReader,
        scraper: ContentScraper,
        summarizer: Summarizer,
        archive: ArchiveStore,
        prefixes: ArchivePrefixes,
    ) -> Self {
        Self {
            feed,
            scraper,
            summarizer,
            archive,
            prefixes,
        }
    }

    /// Wires the production collaborators: one shared HTTP client, Gemini and S3.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = config.http_client()?;
        let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_config(&config.storage).await);
        let generator = Arc::new(GeminiClient::new(client.clone(), &config.gemini));

        Ok(Self::new(
            FeedReader::new(client.clone(), config.feed_url.clone()),
            ContentScraper::new(client),
            Summarizer::new(generator),
            ArchiveStore::new(store),
            ArchivePrefixes {
                full_data: config.storage.full_data_prefix.clone(),
                summarized: config.storage.summarized_prefix.clone(),
            },
        ))
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_at(Utc::now()).await
    }

    /// Runs the pipeline with `started` as the run timestamp shared by both archive keys.
    #[instrument(level = "info", skip_all, fields(started = %started))]
    pub async fn run_at(&self, started: DateTime<Utc>) -> Result<RunReport> {
        let timestamp = started.to_rfc3339_opts(SecondsFormat::Millis, true);

        let stubs = self.feed.fetch_top_articles().await?;
        if stubs.is_empty() {
            warn!("Feed contained no items");
            return Err(AppError::NoNewsFound);
        }

        let enriched = self.scraper.scrape_all(stubs).await;
        if enriched.is_empty() {
            return Err(AppError::EmptyBatch(Stage::Scrape));
        }

        let raw_key = archive_key(&self.prefixes.full_data, &timestamp);
        self.archive.archive(&raw_key, &enriched).await?;

        let summarized = self.summarizer.summarize_all(enriched).await;
        if summarized.is_empty() {
            return Err(AppError::EmptyBatch(Stage::Summarize));
        }

        let storage_key = archive_key(&self.prefixes.summarized, &timestamp);
        self.archive.archive(&storage_key, &summarized).await?;

        info!(count = summarized.len(), %storage_key, "Run completed");
        Ok(RunReport {
            timestamp,
            raw_key,
            storage_key,
            summarized,
        })
    }
}
