/// One page of query results plus the numbers the pagination control needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Slices `results` into 1-based pages of `page_size`. `total_pages` is zero
/// for an empty result set, which callers render as a "no articles" state
/// instead of a zero-page control.
///
/// An out-of-range `page` is deliberately not clamped: it yields an empty
/// `items` slice with the correct `total_pages`, matching what the section
/// endpoints have always done. Page 0 is treated as page 1.
pub fn paginate<T: Clone>(results: &[T], page_size: usize, page: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_pages = results.len().div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let items = if start < results.len() {
        results[start..results.len().min(start + page_size)].to_vec()
    } else {
        Vec::new()
    };
    Page {
        items,
        current_page: page,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}
