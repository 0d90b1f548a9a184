//! Client-side pagination over a fully loaded collection.

/// Pages through an in-memory collection with a fixed page size.
///
/// Pages are 1-indexed. The current page is kept within
/// `1..=max(total_pages, 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator<T> {
    items: Vec<T>,
    page: usize,
    page_size: usize,
}

impl<T> Paginator<T> {
    /// Creates an empty paginator. A zero page size is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replaces the collection and pulls the current page back into range.
    pub fn refresh(&mut self, items: Vec<T>) {
        self.items = items;
        let last = self.total_pages().max(1);
        if self.page > last {
            self.page = last;
        }
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages().max(1));
    }

    /// Current page, starting at 1.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages; zero for an empty collection.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    /// Items on the current page.
    #[must_use]
    pub fn displayed(&self) -> &[T] {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size);
        let end = start.saturating_add(self.page_size).min(self.items.len());
        self.items.get(start..end).unwrap_or_default()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
