//! Tree filtering against the search index.

use crate::catalog::{Catalog, Category};
use crate::search::index::SearchIndex;
use crate::search::query::parse_query;

/// Filters `base` down to the items matching `query`.
///
/// Term matches are decided against the full `index` (every term must be a
/// substring of an item's haystack); `base` only bounds which items can
/// appear, which is how prefix refinement narrows a previously filtered
/// tree instead of the whole catalog. Category order is preserved and
/// categories left empty are dropped. A blank query returns `base`
/// unchanged.
pub fn filter_catalog(index: &SearchIndex, base: &Catalog, query: &str) -> Catalog {
    let terms = parse_query(query);
    if terms.is_empty() {
        return base.clone();
    }

    let ids = index.matching_ids(&terms);
    let categories = base
        .categories
        .iter()
        .filter_map(|cat| {
            let items: Vec<_> = cat
                .items
                .iter()
                .filter(|item| ids.contains(item.id.as_str()))
                .cloned()
                .collect();
            if items.is_empty() {
                None
            } else {
                Some(Category {
                    name: cat.name.clone(),
                    items,
                })
            }
        })
        .collect();

    Catalog { categories }
}
