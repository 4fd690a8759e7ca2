//! Memoized filtering with longest-prefix incremental refinement.
//!
//! ## Why a Prefix Cache?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INCREMENTAL REFINEMENT                                                 │
//! │                                                                         │
//! │  A cashier types "cola" one key at a time. Each keystroke submits a    │
//! │  new query:                                                             │
//! │                                                                         │
//! │    "c"    → filter full catalog            (cached under "c")          │
//! │    "co"   → refine cached "c" result       (cached under "co")         │
//! │    "col"  → refine cached "co" result      (cached under "col")        │
//! │    "cola" → refine cached "col" result                                 │
//! │                                                                         │
//! │  Appending characters can only shrink the match set, so filtering the  │
//! │  cached superset is equivalent to filtering the whole catalog - and    │
//! │  touches far fewer items.                                              │
//! │                                                                         │
//! │  Longest-prefix lookup probes the cache with shrinking prefixes of     │
//! │  the new key, longest first: O(len · log n), no key re-sorting.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The entry for the empty query is seeded at (re)build time and always
//! equals the unfiltered catalog; it is never produced by refining a
//! non-empty entry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::catalog::Catalog;
use crate::search::filter::filter_catalog;
use crate::search::index::SearchIndex;

/// Upper bound on cached query keys before the cache is flushed.
///
/// Typing produces one entry per keystroke; 256 distinct queries per
/// catalog is far beyond a session's realistic churn, so a flush is rare
/// and costs one full-catalog filter on the next miss.
pub const DEFAULT_FILTER_CACHE_CAPACITY: usize = 256;

// =============================================================================
// Filter Cache
// =============================================================================

/// Bounded map from normalized query to filtered tree.
#[derive(Debug, Clone)]
pub struct FilterCache {
    entries: BTreeMap<String, Arc<Catalog>>,
    capacity: usize,
}

impl FilterCache {
    /// Creates a cache seeded with the empty-query entry.
    pub fn new(full: Arc<Catalog>) -> Self {
        Self::with_capacity(full, DEFAULT_FILTER_CACHE_CAPACITY)
    }

    pub fn with_capacity(full: Arc<Catalog>, capacity: usize) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(String::new(), full);
        FilterCache {
            entries,
            capacity: capacity.max(2),
        }
    }

    /// The seeded unfiltered catalog (the empty-query entry).
    pub fn full(&self) -> Arc<Catalog> {
        self.entries
            .get("")
            .cloned()
            .expect("empty-query entry is seeded at construction")
    }

    pub fn get(&self, key: &str) -> Option<Arc<Catalog>> {
        self.entries.get(key).cloned()
    }

    /// Stores a result, flushing back to the seeded entry at capacity.
    pub fn insert(&mut self, key: String, tree: Arc<Catalog>) {
        if self.entries.len() >= self.capacity {
            trace!(len = self.entries.len(), "filter cache at capacity, flushing");
            let full = self.full();
            self.entries.clear();
            self.entries.insert(String::new(), full);
        }
        self.entries.insert(key, tree);
    }

    /// Result of the longest cached key that is a proper prefix of `key`.
    ///
    /// Probes shrinking prefixes of `key` (at char boundaries), longest
    /// first, so ties are impossible and the first hit wins. The empty key
    /// is excluded; callers fall back to [`FilterCache::full`] themselves.
    pub fn longest_prefix(&self, key: &str) -> Option<Arc<Catalog>> {
        let ends: Vec<usize> = key.char_indices().map(|(at, _)| at).skip(1).collect();
        ends.into_iter()
            .rev()
            .find_map(|end| self.entries.get(&key[..end]).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Filter Engine
// =============================================================================

/// Catalog, search index and memo cache, kept in lockstep.
///
/// Rebuilt as one unit on business switch: the cache is discarded
/// wholesale, never merged across catalogs.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    catalog: Arc<Catalog>,
    index: SearchIndex,
    cache: FilterCache,
}

impl FilterEngine {
    pub fn new(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let index = SearchIndex::build(&catalog);
        let cache = FilterCache::new(catalog.clone());
        FilterEngine {
            catalog,
            index,
            cache,
        }
    }

    /// Replaces the active catalog, rebuilding index and cache.
    pub fn install(&mut self, catalog: Catalog) {
        *self = FilterEngine::new(catalog);
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Filters the catalog for `query`, memoized per normalized query.
    ///
    /// Normalization lower-cases the query; blank queries resolve to the
    /// seeded unfiltered entry without touching refinement.
    pub fn filter(&mut self, query: &str) -> Arc<Catalog> {
        let key = query.to_lowercase();
        if key.trim().is_empty() {
            return self.cache.full();
        }

        if let Some(hit) = self.cache.get(&key) {
            trace!(%key, "filter cache hit");
            return hit;
        }

        let base = match self.cache.longest_prefix(&key) {
            Some(prefix_tree) => {
                trace!(%key, "refining cached prefix result");
                prefix_tree
            }
            None => self.cache.full(),
        };

        let tree = Arc::new(filter_catalog(&self.index, &base, &key));
        self.cache.insert(key, tree.clone());
        tree
    }

    /// Number of cached queries (including the seeded empty entry).
    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RawCatalogItem, RawCategory};

    fn raw(name: &str, price: f64) -> RawCatalogItem {
        RawCatalogItem {
            name: name.to_string(),
            price,
            vat: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_tree(vec![
            RawCategory {
                category: "Drinks".to_string(),
                items: vec![raw("Cola", 2.5), raw("Cold Brew", 3.5), raw("Water", 1.0)],
            },
            RawCategory {
                category: "Snacks".to_string(),
                items: vec![raw("Chips", 1.99), raw("Cookies", 2.2)],
            },
        ])
        .unwrap()
    }

    fn ids(tree: &Catalog) -> Vec<String> {
        tree.items().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_equals_unfiltered_catalog() {
        let mut engine = FilterEngine::new(catalog());
        let full = engine.catalog().clone();
        assert_eq!(*engine.filter(""), *full);
        assert_eq!(*engine.filter("   "), *full);
    }

    #[test]
    fn test_cache_hit_returns_stored_tree() {
        let mut engine = FilterEngine::new(catalog());
        let first = engine.filter("cola");
        let second = engine.filter("Cola"); // normalization folds case
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_monotonic_refinement_matches_direct_filtering() {
        // ids from refined filtering must equal ids from a cold filter
        let queries = ["c", "co", "col", "cold", "cold b"];
        let mut warm = FilterEngine::new(catalog());
        for q in queries {
            warm.filter(q); // each step refines the previous entry
        }
        let refined = warm.filter("cold br");

        let mut cold = FilterEngine::new(catalog());
        let direct = cold.filter("cold br");

        assert_eq!(ids(&refined), ids(&direct));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let full = Arc::new(catalog());
        let mut cache = FilterCache::new(full.clone());

        let short = Arc::new(Catalog::default());
        let long = Arc::new(Catalog {
            categories: full.categories[..1].to_vec(),
        });
        cache.insert("c".to_string(), short);
        cache.insert("col".to_string(), long.clone());

        let base = cache.longest_prefix("cola").expect("prefix cached");
        assert!(Arc::ptr_eq(&base, &long));

        // a key with no cached prefix finds nothing
        assert!(cache.longest_prefix("water").is_none());
    }

    #[test]
    fn test_flush_keeps_seeded_empty_entry() {
        let full = Arc::new(catalog());
        let mut cache = FilterCache::with_capacity(full.clone(), 3);

        cache.insert("a".to_string(), full.clone());
        cache.insert("b".to_string(), full.clone()); // now at capacity 3
        cache.insert("c".to_string(), full.clone()); // triggers flush, then insert
        assert_eq!(cache.len(), 2); // "" and "c"
        assert!(cache.get("").is_some());
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_install_discards_cache_wholesale() {
        let mut engine = FilterEngine::new(catalog());
        engine.filter("cola");
        assert!(engine.cached_queries() > 1);

        engine.install(Catalog::default());
        assert_eq!(engine.cached_queries(), 1); // only the reseeded empty entry
        assert!(engine.filter("cola").categories.is_empty());
    }
}
