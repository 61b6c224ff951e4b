use std::collections::HashMap;

use gz_core::Article;
use serde_json::Value;
use tracing::warn;

/// Bucket key for articles whose category, region, or date is missing or
/// unparsable. Filing under "unknown" instead of dropping keeps bucket
/// totals equal to the collection size.
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Precomputed groupings of a loaded collection by category, region, and
/// formatted publication date. Buckets preserve input order. The index owns
/// its collection and is rebuilt wholesale on reload, never patched.
#[derive(Debug, Default)]
pub struct ArticleIndex {
    articles: Vec<Article>,
    by_category: HashMap<String, Vec<usize>>,
    by_region: HashMap<String, Vec<usize>>,
    by_date: HashMap<String, Vec<usize>>,
}

impl ArticleIndex {
    pub fn build(articles: Vec<Article>) -> Self {
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_region: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_date: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, article) in articles.iter().enumerate() {
            by_category.entry(article.category_key()).or_default().push(pos);
            by_region.entry(article.region_key()).or_default().push(pos);
            by_date.entry(date_key(article)).or_default().push(pos);
        }
        ArticleIndex {
            articles,
            by_category,
            by_region,
            by_date,
        }
    }

    /// Builds an index from an untyped JSON value, tolerating malformed
    /// input. Anything that is not an object with an `articles` array of
    /// objects yields an empty index; the error is logged, not propagated,
    /// so a bad payload never takes down a page render.
    pub fn build_lenient(value: &Value) -> Self {
        let Some(entries) = value.get("articles").and_then(Value::as_array) else {
            warn!("article collection is not an object with an articles array, indexing nothing");
            return ArticleIndex::default();
        };
        let mut articles = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Article>(entry.clone()) {
                Ok(article) => articles.push(article),
                Err(e) => warn!("skipping malformed article record: {}", e),
            }
        }
        Self::build(articles)
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles in the given category, in input order. Lookup is
    /// case-insensitive; pass [`UNKNOWN_BUCKET`] for uncategorized articles.
    pub fn category(&self, name: &str) -> Vec<&Article> {
        self.bucket(&self.by_category, name)
    }

    pub fn region(&self, name: &str) -> Vec<&Article> {
        self.bucket(&self.by_region, name)
    }

    /// Articles published on the given day, keyed by `YYYY-MM-DD`.
    pub fn date(&self, day: &str) -> Vec<&Article> {
        self.bucket(&self.by_date, day)
    }

    pub fn category_keys(&self) -> impl Iterator<Item = &str> {
        self.by_category.keys().map(String::as_str)
    }

    /// Looks an article up by id (exact match).
    pub fn article(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    fn bucket<'a>(&'a self, map: &'a HashMap<String, Vec<usize>>, key: &str) -> Vec<&'a Article> {
        map.get(&key.trim().to_lowercase())
            .map(|positions| positions.iter().map(|&p| &self.articles[p]).collect())
            .unwrap_or_default()
    }
}

fn date_key(article: &Article) -> String {
    article
        .published_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_BUCKET.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(id: &str, category: Option<&str>, region: Option<&str>, date: Option<&str>) -> Article {
        Article {
            id: id.to_string(),
            title: None,
            lead: None,
            content: None,
            category: category.map(|s| s.to_string()),
            region: region.map(|s| s.to_string()),
            date: date.map(|s| s.to_string()),
            image: None,
            dot_points: vec![],
            quotes: vec![],
            sources: vec![],
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            article("1", Some("World"), Some("Europe"), Some("2025-05-12")),
            article("2", Some("world"), Some("Asia"), Some("2025-05-12")),
            article("3", Some("Events"), None, None),
            article("4", None, Some("europe"), Some("garbage")),
        ]
    }

    #[test]
    fn test_bucket_totals_are_conserved() {
        let index = ArticleIndex::build(sample());
        let total: usize = index
            .category_keys()
            .map(|k| index.category(k).len())
            .sum();
        assert_eq!(total, index.len());
    }

    #[test]
    fn test_buckets_preserve_input_order() {
        let index = ArticleIndex::build(sample());
        let world: Vec<&str> = index.category("World").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(world, vec!["1", "2"]);
    }

    #[test]
    fn test_missing_fields_file_under_unknown() {
        let index = ArticleIndex::build(sample());
        assert_eq!(index.category(UNKNOWN_BUCKET).len(), 1);
        assert_eq!(index.region(UNKNOWN_BUCKET).len(), 1);
        // one missing date plus one unparsable date
        assert_eq!(index.date(UNKNOWN_BUCKET).len(), 2);
        assert_eq!(index.date("2025-05-12").len(), 2);
    }

    #[test]
    fn test_region_lookup_is_case_insensitive() {
        let index = ArticleIndex::build(sample());
        let europe: Vec<&str> = index.region("EUROPE").iter().map(|a| a.id.as_str()).collect();
        assert_eq!(europe, vec!["1", "4"]);
    }

    #[test]
    fn test_article_lookup_by_id() {
        let index = ArticleIndex::build(sample());
        assert!(index.article("3").is_some());
        assert!(index.article("nope").is_none());
    }

    #[test]
    fn test_build_lenient_tolerates_malformed_input() {
        assert!(ArticleIndex::build_lenient(&json!("not an object")).is_empty());
        assert!(ArticleIndex::build_lenient(&json!({ "articles": 42 })).is_empty());

        let index = ArticleIndex::build_lenient(&json!({
            "articles": [{ "id": "1", "category": "World" }, "bogus"]
        }));
        assert_eq!(index.len(), 1);
    }
}
