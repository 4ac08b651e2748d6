//! Engine port: the contract every storage backend implements.

use crate::errors::StoreError;

/// Lazy, key-ordered sequence of `(key, value)` rows.
///
/// Each `range` call produces a fresh scan; consumers may stop early
/// without reading the remainder.
pub type RangeIter<'a> = Box<dyn Iterator<Item = Result<(String, Vec<u8>), StoreError>> + 'a>;

/// An embedded ordered key-value engine organized into independent
/// named collections (namespaces).
pub trait KeyValueEngine: Send + Sync {
    /// Point read. Absent keys are `Ok(None)`.
    fn get(&self, ns: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Point write (insert or overwrite).
    fn put(&self, ns: &str, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Point delete. Deleting an absent key is a no-op.
    fn delete(&self, ns: &str, key: &str) -> Result<(), StoreError>;

    /// Ordered range scan, key-ascending (descending when the filter is
    /// reversed), constrained by the filter's bounds and raw-row limit.
    fn range<'a>(&'a self, ns: &str, filter: &RangeFilter) -> Result<RangeIter<'a>, StoreError>;
}

/// Bounds and limits for a range scan.
///
/// `gt`/`gte` constrain the lower end, `lt`/`lte` the upper end; `limit`
/// caps the number of raw rows yielded; `reverse` flips iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeFilter {
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub lt: Option<String>,
    pub lte: Option<String>,
    pub limit: Option<usize>,
    pub reverse: bool,
}

impl RangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gt(mut self, key: impl Into<String>) -> Self {
        self.gt = Some(key.into());
        self
    }

    pub fn gte(mut self, key: impl Into<String>) -> Self {
        self.gte = Some(key.into());
        self
    }

    pub fn lt(mut self, key: impl Into<String>) -> Self {
        self.lt = Some(key.into());
        self
    }

    pub fn lte(mut self, key: impl Into<String>) -> Self {
        self.lte = Some(key.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Whether a key falls inside all configured bounds.
    pub fn contains(&self, key: &str) -> bool {
        if let Some(gt) = &self.gt {
            if key <= gt.as_str() {
                return false;
            }
        }
        if let Some(gte) = &self.gte {
            if key < gte.as_str() {
                return false;
            }
        }
        if let Some(lt) = &self.lt {
            if key >= lt.as_str() {
                return false;
            }
        }
        if let Some(lte) = &self.lte {
            if key > lte.as_str() {
                return false;
            }
        }
        true
    }

    /// Whether a key lies past the end of the scan in the current
    /// direction, meaning iteration can stop.
    pub fn past_end(&self, key: &str) -> bool {
        if self.reverse {
            if let Some(gt) = &self.gt {
                if key <= gt.as_str() {
                    return true;
                }
            }
            if let Some(gte) = &self.gte {
                if key < gte.as_str() {
                    return true;
                }
            }
        } else {
            if let Some(lt) = &self.lt {
                if key >= lt.as_str() {
                    return true;
                }
            }
            if let Some(lte) = &self.lte {
                if key > lte.as_str() {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_bounds() {
        let filter = RangeFilter::new().gt("a").lt("d");
        assert!(!filter.contains("a"));
        assert!(filter.contains("b"));
        assert!(filter.contains("c"));
        assert!(!filter.contains("d"));
    }

    #[test]
    fn test_filter_inclusive_bounds() {
        let filter = RangeFilter::new().gte("b").lte("c");
        assert!(!filter.contains("a"));
        assert!(filter.contains("b"));
        assert!(filter.contains("c"));
        assert!(!filter.contains("d"));
    }

    #[test]
    fn test_past_end_respects_direction() {
        let forward = RangeFilter::new().lt("m");
        assert!(!forward.past_end("a"));
        assert!(forward.past_end("m"));

        let backward = RangeFilter::new().gte("m").reverse(true);
        assert!(!backward.past_end("z"));
        assert!(!backward.past_end("m"));
        assert!(backward.past_end("a"));
    }
}
