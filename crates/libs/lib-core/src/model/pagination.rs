//! # Pagination
//!
//! Slices an already ordered result set into pages.
//!
//! A page number at or beyond `pages_count` is rejected, which includes page `0` of an
//! empty result (`pages_count == 0`).

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Page position and size information returned next to the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub page_num: i64,
    pub pages_count: i64,
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Validate page parameters before any data is fetched.
pub fn check_page_params(per_page: i64, page_num: i64) -> Result<()> {
    if per_page <= 0 {
        return Err(AppError::InvalidRequest(
            "per_page must be greater than zero".to_string(),
        ));
    }
    if page_num < 0 {
        return Err(AppError::InvalidRequest(
            "page_num must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Return page `page_num` of `items`, `per_page` items per page.
pub fn paginate<T>(items: Vec<T>, per_page: i64, page_num: i64) -> Result<Page<T>> {
    check_page_params(per_page, page_num)?;

    let total = items.len() as i64;
    let pages_count = total / per_page + i64::from(total % per_page != 0);

    if page_num >= pages_count {
        return Err(AppError::InvalidRequest("page out of range".to_string()));
    }

    let start = (page_num * per_page) as usize;
    let end = (page_num + 1).saturating_mul(per_page).min(total) as usize;

    let items = items.into_iter().skip(start).take(end - start).collect();

    Ok(Page {
        items,
        meta: PageMeta {
            total,
            page_num,
            pages_count,
        },
    })
}
