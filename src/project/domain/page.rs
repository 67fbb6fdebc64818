//! Page-number/page-size pagination values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 0-indexed page request with a positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPageSize`] when `size` is zero.
    pub const fn new(page: u32, size: u32) -> Result<Self, InvalidPageSize> {
        if size == 0 {
            return Err(InvalidPageSize);
        }
        Ok(Self { page, size })
    }

    /// Returns the 0-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the element offset of this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// Error returned for a non-positive page size.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("page size must be a positive count")]
pub struct InvalidPageSize;

/// One page of results together with collection totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, in the collection's fixed sort order.
    pub items: Vec<T>,
    /// The 0-indexed page number that was requested.
    pub page: u32,
    /// The page size that was requested.
    pub size: u32,
    /// Total number of elements across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assembles a page from its items and the collection total.
    #[must_use]
    pub fn assemble(items: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(request.size())),
        }
    }

    /// Maps page items while preserving totals.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
