use std::fs;
use std::path::{Path, PathBuf};

use gz_core::{Article, Result};
use gz_index::ArticleIndex;
use tracing::{error, info};

pub mod html;
pub mod pages;

pub const SECTIONS: [&str; 5] = ["latest", "world", "events", "financial", "search"];
pub const STATIC_PAGES: [&str; 3] = ["about", "contact", "privacy"];

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub out_dir: PathBuf,
    pub base_url: String,
}

impl SiteConfig {
    pub fn default_image(&self) -> String {
        format!("{}/assets/logo.png", self.base_url)
    }
}

/// Renders the whole site into a deterministic layout mirroring the URL
/// space: `index.html`, `section/<name>/index.html`,
/// `article/<id>/index.html`, and the fixed static pages.
///
/// A failed load aborts the build before this type is reached; individual
/// page failures here are logged and replaced with their placeholder state
/// so one bad record cannot take down the whole build.
pub struct SiteGenerator {
    config: SiteConfig,
}

impl SiteGenerator {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, articles: &[Article], data_file: Option<&Path>) -> Result<()> {
        let out = &self.config.out_dir;
        fs::create_dir_all(out)?;

        // One index per build; the collection is immutable until the next run.
        let index = ArticleIndex::build(articles.to_vec());

        self.write_page(&out.join("index.html"), pages::render_home(&self.config, &index));

        for section in SECTIONS {
            match pages::render_section(&self.config, &index, section, 1) {
                Ok(html) => {
                    let dir = out.join("section").join(section);
                    fs::create_dir_all(&dir)?;
                    self.write_page(&dir.join("index.html"), html);
                }
                Err(e) => error!("skipping section {}: {}", section, e),
            }
        }

        for article in articles {
            let html = pages::render_article(&self.config, article, &index);
            let dir = out.join("article").join(&article.id);
            fs::create_dir_all(&dir)?;
            self.write_page(&dir.join("index.html"), html);
        }

        for page in STATIC_PAGES {
            match pages::render_static_page(&self.config, page) {
                Ok(html) => {
                    let dir = out.join(page);
                    fs::create_dir_all(&dir)?;
                    self.write_page(&dir.join("index.html"), html);
                }
                Err(e) => error!("skipping static page {}: {}", page, e),
            }
        }

        // The client script fetches the collection from the site root.
        if let Some(data) = data_file {
            fs::copy(data, out.join("DB.json"))?;
        }

        info!(
            "✨ Generated {} article pages in {}",
            articles.len(),
            out.display()
        );
        Ok(())
    }

    fn write_page(&self, path: &Path, html: String) {
        if let Err(e) = fs::write(path, html) {
            error!("failed to write {}: {}", path.display(), e);
        }
    }
}
