//! Pagination envelope for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Normalized page/limit pair parsed from query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Normalize raw query values: page defaults to 1, limit defaults to 20
    /// and is capped at 100. Non-positive values fall back to the defaults.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => p,
            _ => 1,
        };
        let limit = match limit {
            Some(l) if l >= 1 => l.min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        PageParams { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Pagination accounting returned alongside list data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// A page of results plus accounting.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, params: PageParams, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit - 1) / params.limit
        };
        Paginated {
            data,
            pagination: PageInfo {
                page: params.page,
                limit: params.limit,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_params_caps_limit() {
        let params = PageParams::new(Some(3), Some(500));
        assert_eq!(params.limit, MAX_PAGE_LIMIT);
        assert_eq!(params.offset(), 2 * MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_page_params_rejects_non_positive() {
        let params = PageParams::new(Some(0), Some(-5));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let params = PageParams::new(Some(1), Some(20));
        let page: Paginated<i32> = Paginated::new(vec![], params, 41);
        assert_eq!(page.pagination.total_pages, 3);

        let page: Paginated<i32> = Paginated::new(vec![], params, 40);
        assert_eq!(page.pagination.total_pages, 2);

        let page: Paginated<i32> = Paginated::new(vec![], params, 0);
        assert_eq!(page.pagination.total_pages, 0);
    }
}
