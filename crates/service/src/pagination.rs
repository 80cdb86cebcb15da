//! Pagination utilities for the service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs
//! into the offset/limit pair the flight query takes.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub const MAX_PER_PAGE: u32 = 100;

    /// Clamp to sane defaults and convert to `u64`: `(page_idx, per_page)`
    /// with a 0-based page index.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// `(offset, limit)` for a store query.
    pub fn offset_limit(self) -> (u64, u64) {
        let (idx, per) = self.normalize();
        (idx * per, per)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results plus the totals a client needs to walk the rest.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub page: u64,
    pub per_page: u64,
    pub page_count: u64,
    pub total_count: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(opts: Pagination, total_count: u64, items: Vec<T>) -> Self {
        let (idx, per_page) = opts.normalize();
        let page_count = total_count.div_ceil(per_page);
        Self { page: idx + 1, per_page, page_count, total_count, items }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn offset_is_page_index_times_size() {
        assert_eq!(Pagination { page: 3, per_page: 10 }.offset_limit(), (20, 10));
        assert_eq!(Pagination { page: 1, per_page: 20 }.offset_limit(), (0, 20));
    }

    #[test]
    fn page_count_rounds_up() {
        let p: Page<u8> = Page::new(Pagination { page: 2, per_page: 10 }, 21, vec![]);
        assert_eq!(p.page, 2);
        assert_eq!(p.page_count, 3);
        let empty: Page<u8> = Page::new(Pagination::default(), 0, vec![]);
        assert_eq!(empty.page_count, 0);
    }
}
