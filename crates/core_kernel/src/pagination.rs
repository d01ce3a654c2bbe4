//! Offset/limit pagination with 1-based page numbers

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default page size when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A request for one page of results
///
/// Pages are numbered from 1. No upper bound is placed on the page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Errors
    ///
    /// Returns a validation error if `page` or `size` is zero
    pub fn new(page: u32, size: u32) -> Result<Self, CoreError> {
        if page == 0 {
            return Err(CoreError::validation("Page number starts at 1"));
        }
        if size == 0 {
            return Err(CoreError::validation("Page size must be greater than zero"));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    /// Maximum number of records to return
    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, size: DEFAULT_PAGE_SIZE }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub page_number: u32,
    pub page_size: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, data: Vec<T>) -> Self {
        Self {
            page_number: request.page(),
            page_size: request.size(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_one_based() {
        let first = PageRequest::new(1, 25).unwrap();
        assert_eq!(first.offset(), 0);

        let third = PageRequest::new(3, 25).unwrap();
        assert_eq!(third.offset(), 50);
        assert_eq!(third.limit(), 25);
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }
}
