use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gz_core::Result;
use gz_site::{SiteConfig, SiteGenerator};
use gz_store::{ArticleLoader, ArticleSource, FileSource, HttpSource};
use gz_web::AppState;
use tracing::info;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A bare number is taken as seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(name = "gazette", author, version, about = "News site generator and articles API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render the full static site from a JSON article collection
    Build {
        /// Path to the article collection file
        #[arg(long, default_value = "DB.json", env = "GAZETTE_DATA")]
        data: PathBuf,
        /// Output directory for the generated site
        #[arg(long, default_value = "dist", env = "GAZETTE_OUT")]
        out: PathBuf,
        /// Canonical base URL used in links and meta tags
        #[arg(long, default_value = "http://localhost:3000", env = "GAZETTE_BASE_URL")]
        base_url: String,
    },
    /// Serve the articles API, WebSocket relay, and static build
    Serve {
        /// Path to the article collection file
        #[arg(long, default_value = "DB.json", env = "GAZETTE_DATA")]
        data: PathBuf,
        /// Fetch the collection from a URL instead of a file
        #[arg(long, env = "GAZETTE_SOURCE_URL")]
        source_url: Option<String>,
        /// Static build directory to serve alongside the API
        #[arg(long, env = "GAZETTE_DIST")]
        dist: Option<PathBuf>,
        #[arg(long, default_value_t = 3000, env = "GAZETTE_PORT")]
        port: u16,
        /// How long a loaded collection stays fresh (e.g. 24h, 30m, 1h15m)
        #[arg(long, default_value = "24h")]
        cache_ttl: HumanDuration,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data, out, base_url } => {
            let articles = FileSource::new(&data).fetch().await?;
            info!("📰 Loaded {} articles from {}", articles.len(), data.display());

            let generator = SiteGenerator::new(SiteConfig {
                out_dir: out.clone(),
                base_url,
            });
            generator.generate(&articles, Some(&data))?;
            info!("✨ Static site generated in {}", out.display());
        }
        Commands::Serve {
            data,
            source_url,
            dist,
            port,
            cache_ttl,
        } => {
            let source: Arc<dyn ArticleSource> = match source_url {
                Some(url) => Arc::new(HttpSource::new(&url)?),
                None => Arc::new(FileSource::new(&data)),
            };
            let loader = Arc::new(ArticleLoader::new(source).with_ttl(cache_ttl.0));

            // A collection that fails validation should stop the server at
            // startup, not at the first request.
            let articles = loader.load().await?;
            info!("💾 Collection ready with {} articles", articles.len());

            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            gz_web::serve(AppState::new(loader), dist.as_deref(), addr).await?;
        }
    }

    Ok(())
}
