//! Pagination types for search results.

use serde::{Deserialize, Serialize};

use super::Record;

/// One page of records returned by `find_limit`.
///
/// `count` is the store's total match count for the query, not the number of
/// records on this page. `start` and `limit` echo the request so callers can
/// compute further pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Records on this page, in store rank order.
    pub docs: Vec<Record>,
    /// Total number of matches reported by the store.
    pub count: u64,
    /// Offset of the first record on this page.
    pub start: u64,
    /// Requested page size.
    pub limit: u64,
}

impl Page {
    /// Returns true if more records exist past this page.
    pub fn has_next(&self) -> bool {
        self.start.saturating_add(self.docs.len() as u64) < self.count
    }

    /// Returns the offset of the following page.
    pub fn next_start(&self) -> u64 {
        self.start.saturating_add(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(docs: usize, count: u64, start: u64, limit: u64) -> Page {
        Page {
            docs: vec![Record::new(); docs],
            count,
            start,
            limit,
        }
    }

    #[test]
    fn test_has_next() {
        assert!(page(10, 35, 0, 10).has_next());
        assert!(page(10, 35, 20, 10).has_next());
        assert!(!page(5, 35, 30, 10).has_next());
        assert!(!page(0, 0, 0, 10).has_next());
    }

    #[test]
    fn test_next_start() {
        assert_eq!(page(10, 35, 20, 10).next_start(), 30);
    }

    #[test]
    fn test_offsets_saturate() {
        let last = page(1, u64::MAX, u64::MAX, 10);
        assert!(!last.has_next());
        assert_eq!(last.next_start(), u64::MAX);
    }

    #[test]
    fn test_page_serializes_field_names() {
        let json = serde_json::to_value(page(1, 3, 2, 1)).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["start"], 2);
        assert_eq!(json["limit"], 1);
        assert_eq!(json["docs"].as_array().unwrap().len(), 1);
    }
}
