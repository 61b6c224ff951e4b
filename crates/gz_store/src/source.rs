use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gz_core::{Article, Error, Result};
use serde_json::Value;
use url::Url;

/// A canonical place articles come from. Sources hand back the whole
/// collection; they are re-fetched wholesale, never patched.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Article>>;

    /// Human-readable identifier for log lines.
    fn describe(&self) -> String;
}

/// Parses a raw collection document: a JSON object with a top-level
/// `articles` array. A missing or duplicate `id` invalidates the entire
/// load, since downstream indexing assumes global id uniqueness.
pub fn parse_collection(data: &str) -> Result<Vec<Article>> {
    let value: Value = serde_json::from_str(data)?;
    let entries = value
        .get("articles")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Load("document has no top-level articles array".to_string()))?;

    let mut seen = HashSet::new();
    let mut articles = Vec::with_capacity(entries.len());
    for (pos, entry) in entries.iter().enumerate() {
        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Validation(format!("article at index {} has no id", pos)))?;
        if !seen.insert(id.to_string()) {
            return Err(Error::Validation(format!("duplicate article id: {}", id)));
        }
        articles.push(serde_json::from_value(entry.clone())?);
    }
    Ok(articles)
}

/// Reads the collection from a local JSON file (the `DB.json` layout).
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArticleSource for FileSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Load(format!("failed to read {}: {}", self.path.display(), e)))?;
        parse_collection(&data)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the collection from a remote endpoint serving the same document.
pub struct HttpSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::Load(format!("invalid article source url {}: {}", url, e)))?;
        Ok(Self {
            url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl ArticleSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Article>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Load(format!("fetch from {} failed: {}", self.url, e)))?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Load(format!("failed to read body from {}: {}", self.url, e)))?;
        parse_collection(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
