pub mod loader;
pub mod source;

pub use loader::ArticleLoader;
pub use source::{parse_collection, ArticleSource, FileSource, HttpSource};
