use serde::Serialize;

use crate::config;

/// A validated page request. Garbage or out-of-range `page`/`limit` values
/// fall back to page 1 / the configured default limit; the limit is capped
/// by the configured maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: i64,
    pub limit: i64,
}

/// The `pagination` envelope member: descriptors for the neighboring pages,
/// present only when those pages exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        let limit = limit.max(1).min(config::config().query.max_limit);
        Self {
            page: page.max(1),
            limit,
        }
    }

    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let defaults = &config::config().query;
        let page = page
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(defaults.default_limit)
            .min(defaults.max_limit);
        Self { page, limit }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            skip: (self.page - 1) * self.limit,
            limit: self.limit,
        }
    }

    /// Neighboring-page descriptors for a result set of `total` records.
    pub fn describe(&self, total: i64) -> Pagination {
        let window = self.window();
        let next = if self.page * self.limit < total {
            Some(PageLink {
                page: self.page + 1,
                limit: self.limit,
            })
        } else {
            None
        };
        let prev = if window.skip > 0 {
            Some(PageLink {
                page: self.page - 1,
                limit: self.limit,
            })
        } else {
            None
        };
        Pagination { next, prev }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_prev() {
        let req = PageRequest::new(1, 10);
        let pagination = req.describe(25);
        assert_eq!(pagination.prev, None);
        assert_eq!(
            pagination.next,
            Some(PageLink { page: 2, limit: 10 })
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let req = PageRequest::new(3, 10);
        let pagination = req.describe(25);
        assert_eq!(pagination.next, None);
        assert_eq!(
            pagination.prev,
            Some(PageLink { page: 2, limit: 10 })
        );
    }

    #[test]
    fn exact_boundary_has_no_next() {
        // 20 records at limit 10: page 2 is the last page
        let pagination = PageRequest::new(2, 10).describe(20);
        assert_eq!(pagination.next, None);
    }

    #[test]
    fn empty_result_set_has_neither() {
        let pagination = PageRequest::new(1, 10).describe(0);
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn windows_partition_the_result_set() {
        // Walking pages until `next` disappears must cover every record
        // exactly once, for a variety of totals and limits.
        for &(total, limit) in &[(0i64, 10i64), (1, 10), (9, 3), (10, 10), (11, 10), (25, 7)] {
            let mut covered = 0i64;
            let mut page = 1i64;
            loop {
                let req = PageRequest::new(page, limit);
                let window = req.window();
                assert_eq!(window.skip, covered, "gap or overlap at page {}", page);
                let returned = (total - window.skip).clamp(0, window.limit);
                covered += returned;
                match req.describe(total).next {
                    Some(link) => page = link.page,
                    None => break,
                }
            }
            assert_eq!(covered, total, "total={} limit={}", total, limit);
        }
    }

    #[test]
    fn skip_math_matches_page_and_limit() {
        let window = PageRequest::new(4, 25).window();
        assert_eq!(window.skip, 75);
        assert_eq!(window.limit, 25);
    }
}
