use serde::{Deserialize, Serialize};

/// A headline as listed in the feed, before its page has been scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleStub {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: String,
}

/// A stub plus the body text scraped from its link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub stub: ArticleStub,
    pub content: String,
}

/// A stub plus its generated summary. The scraped body is not carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedArticle {
    #[serde(flatten)]
    pub stub: ArticleStub,
    pub summary: String,
}

impl EnrichedArticle {
    pub fn new(stub: ArticleStub, content: String) -> Self {
        Self { stub, content }
    }

    pub fn into_summarized(self, summary: String) -> SummarizedArticle {
        SummarizedArticle {
            stub: self.stub,
            summary,
        }
    }
}
