pub mod index;
pub mod page;
pub mod query;

pub use index::ArticleIndex;
pub use page::{paginate, Page};
pub use query::{query, Filters, Scope};

/// Fixed page size used by the section pages and the site generator.
pub const ARTICLES_PER_PAGE: usize = 6;
