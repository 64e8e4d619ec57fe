//! Paginator
//!
//! Pages are 1-indexed. There is always at least one page, so an empty
//! result renders as "page 1 of 1" rather than an error, and any requested
//! page is clamped into `[1, total_pages]`.

use super::filter::{RecordFilter, filter_records};

/// `ceil(total / page_size)`, never less than 1. A zero page size counts as 1.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// One page of records
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Clamped page number actually shown
    pub page: usize,
    pub page_size: usize,
    /// Records across all pages
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// 1-based index of the first record shown; 0 when empty
    pub fn start_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last record shown; 0 when empty
    pub fn end_item(&self) -> usize {
        (self.page * self.page_size).min(self.total)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `records` into the requested page
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = records.len();
    let total_pages = total_pages(total, page_size);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let items = records.iter().skip(start).take(page_size).cloned().collect();

    Page {
        items,
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Filter + page state of one list view.
///
/// Changing the filter or the page size sends the view back to page 1;
/// navigation is clamped against the last rendered page count.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<F> {
    filter: F,
    page: usize,
    page_size: usize,
    total_pages: usize,
}

impl<F: Default> ListState<F> {
    pub fn new(page_size: usize) -> Self {
        Self::with_filter(F::default(), page_size)
    }
}

impl<F> ListState<F> {
    pub fn with_filter(filter: F, page_size: usize) -> Self {
        Self {
            filter,
            page: 1,
            page_size: page_size.max(1),
            total_pages: 1,
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.page = 1;
    }

    /// Edit the filter in place; resets to page 1
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.filter);
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages);
    }

    pub fn first(&mut self) {
        self.page = 1;
    }

    pub fn prev(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn last(&mut self) {
        self.page = self.total_pages;
    }

    /// Filter and paginate `records`. The stored page is re-clamped to the
    /// new result size, so a shrinking result never leaves the view past
    /// its last page.
    pub fn view<'a, R>(&mut self, records: &'a [R]) -> Page<&'a R>
    where
        F: RecordFilter<R>,
    {
        let matched = filter_records(records, &self.filter);
        let page = paginate(&matched, self.page, self.page_size);
        self.page = page.page;
        self.total_pages = page.total_pages;
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Even;

    impl RecordFilter<u32> for Even {
        fn matches(&self, n: &u32) -> bool {
            n % 2 == 0
        }
    }

    struct Any;

    impl RecordFilter<u32> for Any {
        fn matches(&self, _: &u32) -> bool {
            true
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 5), 5);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_paginate_clamps() {
        let records: Vec<u32> = (1..=25).collect();
        let page = paginate(&records, 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!((page.start_item(), page.end_item()), (21, 25));

        let past_end = paginate(&records, 99, 10);
        assert_eq!(past_end.page, 3);
        assert!(!past_end.has_next());

        let zero = paginate(&records, 0, 10);
        assert_eq!(zero.page, 1);
        assert!(!zero.has_prev());
    }

    #[test]
    fn test_empty_is_one_page() {
        let page = paginate::<u32>(&[], 4, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert_eq!((page.start_item(), page.end_item()), (0, 0));
    }

    #[test]
    fn test_filter_change_resets_page() {
        let records: Vec<u32> = (1..=30).collect();
        let mut state = ListState::with_filter(Any, 5);
        state.view(&records);
        state.go_to(4);
        assert_eq!(state.page(), 4);

        state.set_filter(Any);
        assert_eq!(state.page(), 1);

        state.view(&records);
        state.last();
        assert_eq!(state.page(), 6);
        state.set_page_size(10);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_navigation_clamps() {
        let records: Vec<u32> = (1..=12).collect();
        let mut state = ListState::with_filter(Any, 5);
        state.view(&records);
        state.prev();
        assert_eq!(state.page(), 1);
        state.next();
        state.next();
        state.next();
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_view_reclamps_when_results_shrink() {
        let mut records: Vec<u32> = (1..=40).collect();
        let mut state = ListState::with_filter(Even, 5);
        state.view(&records);
        state.last();
        assert_eq!(state.page(), 4);

        records.truncate(12);
        let page = state.view(&records);
        assert_eq!(page.page, 2);
        assert_eq!(page.items, vec![&12]);
        assert_eq!(state.page(), 2);
    }
}
