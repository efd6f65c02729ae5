//! Pagination utilities for list endpoints
//!
//! `Pagination` carries the raw `limit`/`offset` a caller sent; `normalize`
//! applies defaults and bounds before any query runs.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Default)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self { Self { limit, offset } }

    /// Resolve to `(limit, offset)`. Limit is clamped to `1..=MAX_LIMIT`;
    /// a negative offset is rejected.
    pub fn normalize(self) -> Result<(u64, u64), ServiceError> {
        let limit = match self.limit {
            None => DEFAULT_LIMIT,
            Some(l) => l.clamp(1, MAX_LIMIT as i64) as u64,
        };
        let offset = match self.offset {
            None => 0,
            Some(o) if o < 0 => return Err(ServiceError::Validation("offset must be >= 0".into())),
            Some(o) => o as u64,
        };
        Ok((limit, offset))
    }
}

/// One page of a filtered listing. `total` counts every matching row.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_applies_defaults() {
        let (limit, offset) = Pagination::default().normalize().unwrap();
        assert_eq!(limit, 50);
        assert_eq!(offset, 0);
    }

    #[test]
    fn normalize_clamps_limit() {
        assert_eq!(Pagination::new(Some(0), None).normalize().unwrap().0, 1);
        assert_eq!(Pagination::new(Some(-5), None).normalize().unwrap().0, 1);
        assert_eq!(Pagination::new(Some(1000), Some(20)).normalize().unwrap(), (100, 20));
    }

    #[test]
    fn negative_offset_is_rejected() {
        assert!(Pagination::new(Some(10), Some(-1)).normalize().is_err());
    }
}
