//! Fixed-size pagination over post listings.
//!
//! A [`Paginator`] knows only the total number of items and the page size.
//! Listing handlers count rows, let the paginator [`resolve`](Paginator::resolve)
//! the raw `?page=` parameter, fetch the [`window`](Paginator::window) from the
//! repository and wrap the rows in a [`Page`].
//!
//! Page resolution is forgiving: a missing or non-numeric parameter yields the
//! first page, and any number outside `1..=num_pages` yields the last page.
//! An empty listing still has exactly one (empty) page.

use std::num::IntErrorKind;

use serde::Serialize;

/// Number of posts shown per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page arithmetic for a listing of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: u64,
    per_page: u64,
}

impl Paginator {
    /// Create a paginator. A zero page size is treated as one.
    pub fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages, never less than one.
    pub fn num_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw page parameter into a valid page number.
    pub fn resolve(&self, requested: Option<&str>) -> u64 {
        let Some(raw) = requested else {
            return 1;
        };

        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 && n.unsigned_abs() <= self.num_pages() => n.unsigned_abs(),
            Ok(_) => self.num_pages(),
            // Still an integer, just one that does not fit.
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                self.num_pages()
            }
            Err(_) => 1,
        }
    }

    /// `(offset, limit)` of the rows belonging to page `number`.
    pub fn window(&self, number: u64) -> (u64, u64) {
        let number = number.clamp(1, self.num_pages());
        let offset = (number - 1) * self.per_page;
        let limit = self.per_page.min(self.total.saturating_sub(offset));
        (offset, limit)
    }

    /// Wrap the rows fetched for page `number`.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: number.clamp(1, self.num_pages()),
            num_pages: self.num_pages(),
            total: self.total,
            per_page: self.per_page,
        }
    }
}

/// One page of a listing plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    num_pages: u64,
    total: u64,
    per_page: u64,
}

impl<T> Page<T> {
    /// Paginate an in-memory sequence.
    pub fn from_vec(all: Vec<T>, requested: Option<&str>, per_page: u64) -> Self {
        let paginator = Paginator::new(all.len() as u64, per_page);
        let number = paginator.resolve(requested);
        let (offset, limit) = paginator.window(number);
        let items = all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        paginator.page(number, items)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based number of this page.
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of items across all pages.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }

    pub fn next_page_number(&self) -> Option<u64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<u64> {
        self.has_previous().then_some(self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 for an empty listing.
    pub fn start_index(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page.
    pub fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            self.total
        } else {
            self.number * self.per_page
        }
    }

    /// Convert the items while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
