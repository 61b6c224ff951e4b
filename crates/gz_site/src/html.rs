use gz_core::Article;
use gz_index::Page;

/// Escapes text for interpolation into HTML. Structured values the
/// generator produces itself (ids, urls it already validated) skip this.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Long-form en-US date, or "Unknown Date" for absent/unparsable dates.
pub fn format_date(article: &Article) -> String {
    article
        .published_date()
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown Date".to_string())
}

pub fn title_of(article: &Article) -> String {
    escape(article.title.as_deref().unwrap_or("Untitled Article"))
}

/// Lead paragraph with the lead → content → placeholder fallback chain.
pub fn lead_of(article: &Article) -> String {
    escape(
        article
            .lead
            .as_deref()
            .or(article.content.as_deref())
            .unwrap_or("No content available."),
    )
}

pub fn image_of(article: &Article, default_image: &str) -> String {
    article
        .image
        .clone()
        .unwrap_or_else(|| default_image.to_string())
}

pub struct Meta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub image: &'a str,
    pub keywords: &'a str,
    pub page_type: &'a str,
}

/// Head metadata block: description, OpenGraph and Twitter cards, canonical
/// link. Descriptions truncate to 160 characters as the crawlers expect.
pub fn meta_tags(meta: &Meta) -> String {
    let title = escape(meta.title);
    let description = escape(&truncate(meta.description, 160));
    let url = escape(meta.url);
    let image = escape(meta.image);
    let keywords = escape(meta.keywords);
    format!(
        r#"<title>{title}</title>
<meta name="description" content="{description}">
<meta name="keywords" content="{keywords}">
<meta name="robots" content="index, follow">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:url" content="{url}">
<meta property="og:image" content="{image}">
<meta property="og:type" content="{page_type}">
<meta name="twitter:title" content="{title}">
<meta name="twitter:description" content="{description}">
<meta name="twitter:image" content="{image}">
<meta name="twitter:card" content="summary_large_image">
<link rel="canonical" href="{url}">"#,
        page_type = escape(meta.page_type),
    )
}

/// Wraps rendered body markup in the shared document shell.
pub fn page_shell(meta: &Meta, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{meta}
<link rel="stylesheet" href="/styles.css">
</head>
<body>
<main id="main-content">
{body}
</main>
<script src="/script.js"></script>
</body>
</html>"#,
        meta = meta_tags(meta),
    )
}

/// One article card as used on section listings and the home page blocks.
pub fn article_card(article: &Article, default_image: &str) -> String {
    format!(
        r#"<div class="section-article" data-article-id="{id}">
<div class="article-image-container" style="background-image: url('{image}')"></div>
<div class="article-content">
<h3><a href="/article/{id}">{title}</a></h3>
<div class="date">{date}</div>
<p>{lead}</p>
</div>
</div>"#,
        id = escape(&article.id),
        image = escape(&image_of(article, default_image)),
        title = title_of(article),
        date = format_date(article),
        lead = lead_of(article),
    )
}

/// A page of cards, or the "no articles" state when the page is empty.
pub fn article_list(page: &Page<&Article>, default_image: &str) -> String {
    if page.items.is_empty() {
        return r#"<div class="no-articles">No articles found.</div>"#.to_string();
    }
    page.items
        .iter()
        .map(|a| article_card(a, default_image))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prev/next plus numbered page buttons. Callers skip this entirely when
/// `total_pages` is zero and render the empty state instead.
pub fn pagination_control(page: &Page<&Article>, section: &str) -> String {
    let section = escape(section);
    let buttons: String = (1..=page.total_pages)
        .map(|n| {
            let active = if n == page.current_page { " active" } else { "" };
            format!(
                r#"<button class="page-button{active}" data-section="{section}" data-page="{n}">{n}</button>"#
            )
        })
        .collect();
    format!(
        r#"<div class="pagination">
<button class="prev-page" data-section="{section}" data-current-page="{current}"{prev_disabled}>Previous</button>
{buttons}
<button class="next-page" data-section="{section}" data-current-page="{current}" data-total-pages="{total}"{next_disabled}>Next</button>
</div>"#,
        current = page.current_page,
        total = page.total_pages,
        prev_disabled = if page.has_prev { "" } else { " disabled" },
        next_disabled = if page.has_next { "" } else { " disabled" },
    )
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}
