//! API models for request and response payloads

use serde::Deserialize;

pub mod comment;
pub mod feed;
pub mod follow;
pub mod like;
pub mod memory;
pub mod user;

/// Pagination query parameters shared by the listing endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// Number of rows to return (default: 10, max: 100)
    pub limit: Option<i64>,
    /// Number of rows to skip (default: 0)
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Resolve defaults and validate bounds
    ///
    /// `limit` must be a positive integer and `offset` non-negative.
    pub fn resolve(self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(10);
        let offset = self.offset.unwrap_or(0);

        if limit <= 0 {
            return Err("limit must be a positive integer".to_string());
        }
        if offset < 0 {
            return Err("offset must be a non-negative integer".to_string());
        }

        Ok((limit.min(100), offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let page = PageQuery {
            limit: None,
            offset: None,
        };
        assert_eq!(page.resolve().unwrap(), (10, 0));
    }

    #[test]
    fn test_page_query_rejects_non_positive_limit() {
        let page = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert!(page.resolve().is_err());

        let page = PageQuery {
            limit: Some(-3),
            offset: None,
        };
        assert!(page.resolve().is_err());
    }

    #[test]
    fn test_page_query_rejects_negative_offset() {
        let page = PageQuery {
            limit: Some(10),
            offset: Some(-1),
        };
        assert!(page.resolve().is_err());
    }

    #[test]
    fn test_page_query_caps_limit() {
        let page = PageQuery {
            limit: Some(5000),
            offset: Some(20),
        };
        assert_eq!(page.resolve().unwrap(), (100, 20));
    }
}
