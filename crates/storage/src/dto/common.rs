use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    25
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(format!("page_size must be between 1 and {}", MAX_PAGE_SIZE));
        }
        Ok(())
    }

    /// Rows to skip; widened so no `page` can overflow.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_items_u = total_items.max(0) as u64;
        let total_pages = total_items_u.div_ceil(page_size.max(1) as u64) as u32;
        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, page_size: u32, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(page, page_size, total_items),
        }
    }
}

/// Trims every entry and drops the blank ones.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        let params = PaginationParams {
            page: 3,
            page_size: 20,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.offset(), 40);

        assert!(PaginationParams { page: 0, page_size: 20 }.validate().is_err());
        assert!(PaginationParams { page: 1, page_size: 101 }.validate().is_err());
    }

    #[test]
    fn test_offset_for_far_pages() {
        let params = PaginationParams {
            page: 50_000_000,
            page_size: 100,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.offset(), 4_999_999_900);

        let last = PaginationParams {
            page: u32::MAX,
            page_size: MAX_PAGE_SIZE,
        };
        assert_eq!(last.offset(), i64::from(u32::MAX - 1) * 100);
        assert_eq!(PaginationParams { page: 0, page_size: 20 }.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationMeta::new(1, 25, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 25, 25).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 25, 26).total_pages, 2);
    }

    #[test]
    fn test_normalize_tags() {
        let tags = vec![" parking ".to_string(), "".to_string(), "  ".to_string(), "lights".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["parking", "lights"]);
    }
}
