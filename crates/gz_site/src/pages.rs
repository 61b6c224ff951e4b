use gz_core::Article;
use gz_index::{paginate, ArticleIndex, Filters, Page, Scope, ARTICLES_PER_PAGE};

use crate::html::{
    article_card, article_list, capitalize, escape, format_date, image_of, lead_of, page_shell,
    pagination_control, title_of, Meta,
};
use crate::SiteConfig;

pub(crate) const DEFAULT_DESCRIPTION: &str =
    "The latest news and in-depth coverage on World, Events, and Finance.";

/// Home page: feature article, a Latest strip, two-card World and Events
/// blocks, and a Finance block with its own feature.
pub fn render_home(config: &SiteConfig, index: &ArticleIndex) -> String {
    let default_image = config.default_image();
    let articles = index.articles();
    let mut body = String::new();

    if let Some(feature) = articles.first() {
        body.push_str(&format!(
            r#"<div class="feature" data-article-id="{id}">
<div class="feature-image-container" style="background-image: url('{image}')"></div>
<div class="feature-text">
<h1><a href="/article/{id}">{title}</a></h1>
<div class="date">{date}</div>
<p>{lead}</p>
</div>
</div>"#,
            id = escape(&feature.id),
            image = escape(&image_of(feature, &default_image)),
            title = title_of(feature),
            date = format_date(feature),
            lead = lead_of(feature),
        ));
    } else {
        body.push_str(r#"<div class="no-articles">No articles found.</div>"#);
    }

    body.push_str("\n<section id=\"latest-section\"><h3>Latest</h3>\n");
    for article in articles.iter().skip(1).take(3) {
        body.push_str(&article_card(article, &default_image));
        body.push('\n');
    }
    body.push_str("</section>");

    for (block_id, heading, category) in
        [("world", "World", "world"), ("events", "Events", "events")]
    {
        let picks = index.category(category);
        body.push_str(&format!("\n<section id=\"{}\"><h2>{}</h2>\n", block_id, heading));
        for article in picks.iter().take(2) {
            body.push_str(&article_card(article, &default_image));
            body.push('\n');
        }
        body.push_str("</section>");
    }

    let finance = index.category("financial");
    if let Some(feature) = finance.first() {
        body.push_str(&format!(
            "\n<section class=\"financial-section\"><h2>Finance</h2>\n{}\n",
            article_card(feature, &default_image)
        ));
        body.push_str("<div id=\"finance-latest-section\"><h3>Latest</h3>\n");
        for article in finance.iter().skip(1).take(2) {
            body.push_str(&article_card(article, &default_image));
            body.push('\n');
        }
        body.push_str("</div></section>");
    }

    let meta = Meta {
        title: "World, Events, Finance News",
        description: DEFAULT_DESCRIPTION,
        url: &config.base_url,
        image: &default_image,
        keywords: "news, world news, events, finance, breaking news, current affairs",
        page_type: "website",
    };
    page_shell(&meta, &body)
}

/// One section listing page. The `search` section renders a prompt instead
/// of results; everything else renders page 1 of its scope with the shared
/// paginator.
pub fn render_section(
    config: &SiteConfig,
    index: &ArticleIndex,
    section: &str,
    page_number: usize,
) -> gz_core::Result<String> {
    let scope = Scope::parse(section)?;
    let default_image = config.default_image();

    let body = if section == "search" {
        r#"<div class="section-view">
<h1>Search</h1>
<div class="section-articles" id="sectionResults">
<div class="no-articles">Enter search filters to view results.</div>
</div>
</div>"#
            .to_string()
    } else {
        let results = index.query(&Filters::default(), &scope);
        let page: Page<&Article> = paginate(&results, ARTICLES_PER_PAGE, page_number);
        let pagination = if page.total_pages > 0 {
            pagination_control(&page, section)
        } else {
            String::new()
        };
        format!(
            r#"<div class="section-view">
<h1>{heading}</h1>
<div class="section-articles" id="sectionResults">
{list}
</div>
{pagination}
</div>"#,
            heading = escape(&capitalize(section)),
            list = article_list(&page, &default_image),
        )
    };

    let (title, description) = section_copy(section);
    let meta = Meta {
        title: &title,
        description: &description,
        url: &format!("{}/section/{}", config.base_url, section),
        image: &default_image,
        keywords: &format!("{} news, breaking news, current affairs", section),
        page_type: "website",
    };
    Ok(page_shell(&meta, &body))
}

fn section_copy(section: &str) -> (String, String) {
    match section {
        "latest" => (
            "Latest News".to_string(),
            "Stay updated with the latest breaking news and articles on World, Events, and Finance.".to_string(),
        ),
        "world" => (
            "World News".to_string(),
            "Explore global news and in-depth coverage of world events.".to_string(),
        ),
        "events" => (
            "Events".to_string(),
            "Discover upcoming and past events with detailed coverage.".to_string(),
        ),
        "financial" => (
            "Finance News".to_string(),
            "Get the latest financial news, market updates, and economic insights.".to_string(),
        ),
        _ => ("Search".to_string(), DEFAULT_DESCRIPTION.to_string()),
    }
}

/// Full article page: dot points, body, quotes with attribution, sources,
/// and up to four related articles.
pub fn render_article(config: &SiteConfig, article: &Article, index: &ArticleIndex) -> String {
    let default_image = config.default_image();

    let dot_points = if article.dot_points.is_empty() {
        "<li>No key points available.</li>".to_string()
    } else {
        article
            .dot_points
            .iter()
            .map(|p| format!("<li>{}</li>", escape(p)))
            .collect()
    };

    let quotes: String = article
        .quotes
        .iter()
        .map(|q| {
            let attribution = q
                .source
                .as_deref()
                .or(q.speaker.as_deref())
                .unwrap_or("Unknown");
            format!(
                "<div class=\"quote\">{}</div>\n<div class=\"quote-source\">{}</div>\n",
                escape(q.text.as_deref().unwrap_or("No quote text available.")),
                escape(attribution),
            )
        })
        .collect();

    let sources = if article.sources.is_empty() {
        "<li>No sources available.</li>".to_string()
    } else {
        article
            .sources
            .iter()
            .map(|s| {
                format!(
                    "<li><a href=\"{}\" target=\"_blank\">{}</a></li>",
                    escape(s.url.as_deref().unwrap_or("#")),
                    escape(s.title.as_deref().unwrap_or("Untitled Source")),
                )
            })
            .collect()
    };

    let related = related_articles(index.articles(), article);
    let related_html = if related.is_empty() {
        "<div class=\"no-related-articles\">No related articles found.</div>".to_string()
    } else {
        related
            .iter()
            .map(|a| {
                format!(
                    r#"<a href="/article/{id}" class="related-article-card" data-article-id="{id}">
<h3>{title}</h3>
<div class="date">{date}</div>
<p>{lead}</p>
</a>"#,
                    id = escape(&a.id),
                    title = title_of(a),
                    date = format_date(a),
                    lead = lead_of(a),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<div class="article-detail" data-article-id="{id}">
<h1>{title}</h1>
<div class="date">{date}</div>
<div class="article-image" style="background-image: url('{image}')"></div>
<div class="dot-points"><ul>{dot_points}</ul></div>
<div class="content">{content}</div>
{quotes}<div class="sources"><h3>Sources</h3><ul>{sources}</ul></div>
</div>
<div class="related-articles">
<h2>Related Articles</h2>
<div class="related-articles-container">
{related_html}
</div>
</div>"#,
        id = escape(&article.id),
        title = title_of(article),
        date = format_date(article),
        image = escape(&image_of(article, &default_image)),
        content = escape(article.content.as_deref().unwrap_or("No content available.")),
    );

    let description = article
        .lead
        .as_deref()
        .or(article.content.as_deref())
        .unwrap_or(DEFAULT_DESCRIPTION);
    let keywords = format!(
        "{}, {}",
        article.category.as_deref().unwrap_or("news").to_lowercase(),
        article.region.as_deref().unwrap_or("global").to_lowercase(),
    );
    let meta = Meta {
        title: &format!("{} - News", article.title.as_deref().unwrap_or("Article")),
        description,
        url: &format!("{}/article/{}", config.base_url, article.id),
        image: &image_of(article, &default_image),
        keywords: &keywords,
        page_type: "article",
    };
    page_shell(&meta, &body)
}

/// Up to three articles sharing category and region, then one more sharing
/// only the category. Missing values compare equal to each other.
pub fn related_articles<'a>(articles: &'a [Article], article: &Article) -> Vec<&'a Article> {
    let mut related: Vec<&Article> = articles
        .iter()
        .filter(|a| {
            a.id != article.id
                && a.category_key() == article.category_key()
                && a.region_key() == article.region_key()
        })
        .take(3)
        .collect();
    let topic_only = articles.iter().find(|a| {
        a.id != article.id
            && a.category_key() == article.category_key()
            && !related.iter().any(|r| r.id == a.id)
    });
    related.extend(topic_only);
    related
}

/// The three fixed pages: about, contact, privacy.
pub fn render_static_page(config: &SiteConfig, page: &str) -> gz_core::Result<String> {
    let (title, description, content) = match page {
        "about" => (
            "About Us",
            "Learn about our newsroom, your trusted source for reliable news on World, Events, and Finance.",
            "<h1>About Us</h1>\n<div class=\"article-detail\">\
             <p>Welcome to our news site, your trusted source for reliable and timely news coverage. \
             Our mission is to deliver accurate, insightful, and engaging content that keeps you informed about the world around you.</p>\
             <p>We are a team of dedicated journalists and editors committed to upholding the highest standards of journalism. \
             Our coverage spans global events, finance, and more.</p></div>",
        ),
        "contact" => (
            "Contact Us",
            "Get in touch with the newsroom for feedback or inquiries.",
            "<h1>Contact Us</h1>\n<div class=\"article-detail\">\
             <p>We value your feedback and are here to assist you.</p>\
             <ul class=\"dot-points\"><li><strong>Email:</strong> <a href=\"mailto:contact@newswebsite.com\">contact@newswebsite.com</a></li></ul></div>",
        ),
        "privacy" => (
            "Privacy Policy",
            "Read our Privacy Policy to understand how we handle your data.",
            "<h1>Privacy Policy</h1>\n<div class=\"article-detail\">\
             <p>We are committed to protecting your privacy. We collect minimal personal information \
             and do not share your data with third parties without consent.</p></div>",
        ),
        other => {
            return Err(gz_core::Error::InvalidScope(format!(
                "unknown static page: {}",
                other
            )))
        }
    };

    let meta = Meta {
        title,
        description,
        url: &format!("{}/{}", config.base_url, page),
        image: &config.default_image(),
        keywords: "news, about, contact, privacy",
        page_type: "website",
    };
    Ok(page_shell(
        &meta,
        &format!("<div class=\"section-view\">{}</div>", content),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SiteConfig {
        SiteConfig {
            out_dir: "dist".into(),
            base_url: "https://news.example.com".to_string(),
        }
    }

    fn article(id: &str, category: Option<&str>, region: Option<&str>) -> Article {
        Article {
            id: id.to_string(),
            title: Some(format!("Title {}", id)),
            lead: Some(format!("Lead {}", id)),
            content: None,
            category: category.map(|s| s.to_string()),
            region: region.map(|s| s.to_string()),
            date: None,
            image: None,
            dot_points: vec![],
            quotes: vec![],
            sources: vec![],
        }
    }

    fn sample() -> ArticleIndex {
        ArticleIndex::build(vec![
            article("1", Some("World"), Some("Europe")),
            article("2", Some("world"), Some("europe")),
            article("3", Some("World"), Some("Asia")),
            article("4", Some("Events"), None),
            article("5", Some("Financial"), Some("Europe")),
        ])
    }

    #[test]
    fn test_home_features_first_article() {
        let html = render_home(&config(), &sample());
        assert!(html.contains("Title 1"));
        assert!(html.contains("financial-section"));
    }

    #[test]
    fn test_home_with_no_articles_renders_empty_state() {
        let html = render_home(&config(), &ArticleIndex::default());
        assert!(html.contains("No articles found."));
    }

    #[test]
    fn test_section_renders_only_its_category() {
        let html = render_section(&config(), &sample(), "events", 1).unwrap();
        assert!(html.contains("Title 4"));
        assert!(!html.contains("Title 1"));
    }

    #[test]
    fn test_unknown_section_is_invalid_scope() {
        assert!(matches!(
            render_section(&config(), &sample(), "sports", 1),
            Err(gz_core::Error::InvalidScope(_))
        ));
    }

    #[test]
    fn test_search_section_renders_prompt() {
        let html = render_section(&config(), &sample(), "search", 1).unwrap();
        assert!(html.contains("Enter search filters to view results."));
    }

    #[test]
    fn test_empty_section_renders_no_articles_without_pagination() {
        let index = ArticleIndex::build(vec![article("1", Some("World"), None)]);
        let html = render_section(&config(), &index, "events", 1).unwrap();
        assert!(html.contains("No articles found."));
        assert!(!html.contains("class=\"pagination\""));
    }

    #[test]
    fn test_related_prefers_category_and_region_then_category() {
        let index = sample();
        let related = related_articles(index.articles(), &index.articles()[0]);
        let ids: Vec<&str> = related.iter().map(|a| a.id.as_str()).collect();
        // id 2 shares category+region, id 3 is the category-only extra
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_article_page_placeholders() {
        let index = sample();
        let html = render_article(&config(), &index.articles()[3], &index);
        assert!(html.contains("No key points available."));
        assert!(html.contains("No sources available."));
    }

    #[test]
    fn test_quote_attribution_falls_back_to_speaker() {
        let mut subject = article("9", Some("World"), Some("Europe"));
        subject.quotes = vec![gz_core::Quote {
            text: Some("We are confident.".to_string()),
            source: None,
            speaker: Some("A. Minister".to_string()),
        }];
        let html = render_article(&config(), &subject, &sample());
        assert!(html.contains("A. Minister"));
    }

    #[test]
    fn test_static_pages() {
        for page in ["about", "contact", "privacy"] {
            assert!(render_static_page(&config(), page).is_ok());
        }
        assert!(render_static_page(&config(), "careers").is_err());
    }
}
