//! Page arithmetic for the tabulation feed

/// Pagination metadata for one page of an in-memory result list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed, clamped)
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    /// Index of the first row on this page
    pub offset: i64,
}

impl Pagination {
    /// Clamp `requested_page` into `[1, total_pages]`
    ///
    /// An empty result has zero pages and reports page 1.
    ///
    /// ```
    /// use palaro_rt::pagination::Pagination;
    ///
    /// let p = Pagination::new(250, 99, 100);
    /// assert_eq!((p.page, p.total_pages, p.offset), (3, 3, 200));
    /// ```
    pub fn new(total_results: i64, requested_page: i64, page_size: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = (total_results + page_size - 1) / page_size;
        let page = requested_page.clamp(1, total_pages.max(1));

        Pagination {
            page,
            page_size,
            total_pages,
            offset: (page - 1) * page_size,
        }
    }

    /// Rows of `items` that fall on this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.offset as usize).min(items.len());
        let end = (start + self.page_size as usize).min(items.len());
        &items[start..end]
    }
}
