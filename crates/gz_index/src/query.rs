use chrono::NaiveDate;
use gz_core::{Article, Error, Result};

/// The initial subset a query starts from: every article, or one named
/// category's articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Category(String),
}

impl Scope {
    /// Maps a section name to its scope. `latest` and `search` start from
    /// the whole collection; the named sections start from their category.
    /// Anything else is a usage error that aborts that render only.
    pub fn parse(section: &str) -> Result<Scope> {
        match section.to_lowercase().as_str() {
            "latest" | "search" => Ok(Scope::All),
            "world" | "events" | "financial" => Ok(Scope::Category(section.to_lowercase())),
            other => Err(Error::InvalidScope(format!("unknown section: {}", other))),
        }
    }
}

/// Filter configuration for [`query`]. `None` or empty values are no-ops;
/// set filters are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    /// Case-insensitive substring match against title OR lead OR content.
    pub keyword: Option<String>,
    /// Exact case-insensitive category match. Only honored when the scope is
    /// [`Scope::All`]; the named sections already pin the category.
    pub category: Option<String>,
    /// Exact case-insensitive region match.
    pub region: Option<String>,
    /// Keep articles published on or after this day.
    pub date_from: Option<NaiveDate>,
    /// Keep articles published on or before this day.
    pub date_to: Option<NaiveDate>,
}

impl Filters {
    fn matches(&self, article: &Article, scope: &Scope) -> bool {
        if let Some(keyword) = non_empty(&self.keyword) {
            let needle = keyword.to_lowercase();
            let hit = [&article.title, &article.lead, &article.content]
                .iter()
                .any(|field| {
                    field
                        .as_deref()
                        .map(|text| text.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                });
            if !hit {
                return false;
            }
        }

        if *scope == Scope::All {
            if let Some(category) = non_empty(&self.category) {
                if !article.matches_category(category) {
                    return false;
                }
            }
        }

        if let Some(region) = non_empty(&self.region) {
            if !article.matches_region(region) {
                return false;
            }
        }

        if self.date_from.is_some() || self.date_to.is_some() {
            // Unknown dates never match an active date filter.
            let Some(published) = article.published_date() else {
                return false;
            };
            if self.date_from.map(|from| published < from).unwrap_or(false) {
                return false;
            }
            if self.date_to.map(|to| published > to).unwrap_or(false) {
                return false;
            }
        }

        true
    }
}

/// Applies `filters` to the articles selected by `scope`, preserving input
/// order. No relevance or date re-sorting happens here; callers paginate the
/// result as-is.
pub fn query<'a>(articles: &'a [Article], filters: &Filters, scope: &Scope) -> Vec<&'a Article> {
    articles
        .iter()
        .filter(|article| match scope {
            Scope::All => true,
            Scope::Category(name) => article.matches_category(name),
        })
        .filter(|article| filters.matches(article, scope))
        .collect()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl crate::ArticleIndex {
    /// Same contract as [`query`], but a category scope starts from the
    /// precomputed bucket instead of rescanning the whole collection.
    pub fn query(&self, filters: &Filters, scope: &Scope) -> Vec<&Article> {
        match scope {
            Scope::All => query(self.articles(), filters, scope),
            Scope::Category(name) => self
                .category(name)
                .into_iter()
                .filter(|article| filters.matches(article, scope))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, category: Option<&str>) -> Article {
        Article {
            id: id.to_string(),
            title: Some(format!("Article {}", id)),
            lead: None,
            content: None,
            category: category.map(|s| s.to_string()),
            region: None,
            date: None,
            image: None,
            dot_points: vec![],
            quotes: vec![],
            sources: vec![],
        }
    }

    fn sample() -> Vec<Article> {
        let mut a1 = article("1", Some("World"));
        a1.region = Some("Europe".to_string());
        a1.date = Some("2025-05-10".to_string());
        let mut a2 = article("2", Some("world"));
        a2.lead = Some("Markets rally on trade deal".to_string());
        a2.date = Some("2025-05-12".to_string());
        let a3 = article("3", Some("Events"));
        vec![a1, a2, a3]
    }

    fn ids(results: &[&Article]) -> Vec<String> {
        results.iter().map(|a| a.id.clone()).collect()
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(Scope::parse("latest").unwrap(), Scope::All);
        assert_eq!(Scope::parse("search").unwrap(), Scope::All);
        assert_eq!(
            Scope::parse("World").unwrap(),
            Scope::Category("world".to_string())
        );
        assert!(matches!(
            Scope::parse("sports"),
            Err(Error::InvalidScope(_))
        ));
    }

    #[test]
    fn test_empty_filters_return_scope_in_order() {
        let articles = sample();
        let all = query(&articles, &Filters::default(), &Scope::All);
        assert_eq!(ids(&all), vec!["1", "2", "3"]);

        let world = query(
            &articles,
            &Filters::default(),
            &Scope::Category("world".to_string()),
        );
        assert_eq!(ids(&world), vec!["1", "2"]);
    }

    #[test]
    fn test_category_filter_is_case_insensitive_and_order_preserving() {
        let articles = sample();
        let filters = Filters {
            category: Some("world".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["1", "2"]);
    }

    #[test]
    fn test_category_filter_ignored_outside_all_scope() {
        let articles = sample();
        let filters = Filters {
            category: Some("world".to_string()),
            ..Default::default()
        };
        let scope = Scope::Category("events".to_string());
        assert_eq!(ids(&query(&articles, &filters, &scope)), vec!["3"]);
    }

    #[test]
    fn test_keyword_matches_title_lead_or_content() {
        let articles = sample();
        let filters = Filters {
            keyword: Some("MARKETS".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["2"]);
    }

    #[test]
    fn test_region_filter() {
        let articles = sample();
        let filters = Filters {
            region: Some("EUROPE".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["1"]);
    }

    #[test]
    fn test_date_filters_exclude_unknown_dates() {
        let articles = sample();
        let filters = Filters {
            date_from: NaiveDate::from_ymd_opt(2025, 5, 11),
            ..Default::default()
        };
        // a3 has no date and must not match while a date filter is active
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["2"]);

        let filters = Filters {
            date_to: NaiveDate::from_ymd_opt(2025, 5, 10),
            ..Default::default()
        };
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["1"]);
    }

    #[test]
    fn test_filters_are_and_combined() {
        let articles = sample();
        let filters = Filters {
            category: Some("world".to_string()),
            region: Some("europe".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&query(&articles, &filters, &Scope::All)), vec!["1"]);
    }

    #[test]
    fn test_index_query_matches_slice_query() {
        let articles = sample();
        let index = crate::ArticleIndex::build(articles.clone());
        let scope = Scope::Category("world".to_string());
        let filters = Filters {
            region: Some("europe".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ids(&index.query(&filters, &scope)),
            ids(&query(&articles, &filters, &scope))
        );
    }

    #[test]
    fn test_query_is_idempotent() {
        let articles = sample();
        let filters = Filters {
            category: Some("world".to_string()),
            ..Default::default()
        };
        let once: Vec<Article> = query(&articles, &filters, &Scope::All)
            .into_iter()
            .cloned()
            .collect();
        let twice = query(&once, &filters, &Scope::All);
        assert_eq!(ids(&twice), ids(&once.iter().collect::<Vec<_>>()));
    }
}
