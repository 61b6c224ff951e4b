use std::sync::Arc;
use std::time::{Duration, Instant};

use gz_core::{Article, Error, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::source::ArticleSource;

const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

struct CacheEntry {
    loaded_at: Instant,
    articles: Arc<Vec<Article>>,
}

/// Loads the article collection through a time-boxed cache with bounded
/// retry. A fresh cache hit returns the shared collection without touching
/// the source; a miss fetches with exponential backoff and caches the
/// result. Exhausted retries surface as a `Load` error the caller must
/// render as a visible failure state, never as a silent empty list.
pub struct ArticleLoader {
    source: Arc<dyn ArticleSource>,
    ttl: Duration,
    max_attempts: u32,
    backoff: Duration,
    cache: RwLock<Option<CacheEntry>>,
}

impl ArticleLoader {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source,
            ttl: DEFAULT_TTL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            cache: RwLock::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, backoff: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff = backoff;
        self
    }

    pub async fn load(&self) -> Result<Arc<Vec<Article>>> {
        if let Some(entry) = self.cache.read().await.as_ref() {
            if entry.loaded_at.elapsed() < self.ttl {
                return Ok(entry.articles.clone());
            }
        }

        let articles = Arc::new(self.fetch_with_retry().await?);
        info!(
            "📰 Loaded {} articles from {}",
            articles.len(),
            self.source.describe()
        );
        *self.cache.write().await = Some(CacheEntry {
            loaded_at: Instant::now(),
            articles: articles.clone(),
        });
        Ok(articles)
    }

    async fn fetch_with_retry(&self) -> Result<Vec<Article>> {
        let mut backoff = self.backoff;
        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.source.fetch().await {
                Ok(articles) => return Ok(articles),
                // Validation failures are not retried; the load fails fast.
                Err(e @ Error::Validation(_)) => return Err(e),
                Err(e) => {
                    warn!(
                        "fetch attempt {}/{} from {} failed: {}",
                        attempt,
                        self.max_attempts,
                        self.source.describe(),
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }
        Err(Error::Load(format!(
            "giving up on {} after {} attempts: {}",
            self.source.describe(),
            self.max_attempts,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakySource {
        calls: AtomicUsize,
        fail_first: usize,
    }

    impl FlakySource {
        fn new(fail_first: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl ArticleSource for FlakySource {
        async fn fetch(&self) -> Result<Vec<Article>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(Error::Load("transient failure".to_string()));
            }
            Ok(vec![Article {
                id: format!("call-{}", call),
                title: None,
                lead: None,
                content: None,
                category: None,
                region: None,
                date: None,
                image: None,
                dot_points: vec![],
                quotes: vec![],
                sources: vec![],
            }])
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    struct RejectingSource;

    #[async_trait]
    impl ArticleSource for RejectingSource {
        async fn fetch(&self) -> Result<Vec<Article>> {
            Err(Error::Validation("article at index 0 has no id".to_string()))
        }

        fn describe(&self) -> String {
            "rejecting".to_string()
        }
    }

    fn loader(source: Arc<dyn ArticleSource>) -> ArticleLoader {
        ArticleLoader::new(source).with_retry(3, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_cache_hit_skips_the_source() {
        let source = Arc::new(FlakySource::new(0));
        let l = loader(source.clone());
        let first = l.load().await.unwrap();
        let second = l.load().await.unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_refetches() {
        let source = Arc::new(FlakySource::new(0));
        let l = loader(source.clone()).with_ttl(Duration::ZERO);
        l.load().await.unwrap();
        l.load().await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let source = Arc::new(FlakySource::new(2));
        let articles = loader(source.clone()).load().await.unwrap();
        assert_eq!(articles[0].id, "call-2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_a_load_failure() {
        let source = Arc::new(FlakySource::new(10));
        let err = loader(source.clone()).load().await.unwrap_err();
        assert!(matches!(err, Error::Load(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_validation_errors_fail_fast() {
        let source = Arc::new(RejectingSource);
        let err = loader(source).load().await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
