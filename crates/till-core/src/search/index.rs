//! Flat searchable index derived from the catalog tree.

use std::collections::HashSet;

use crate::catalog::Catalog;

/// One searchable entry per catalog item. Derived, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Item id, used to map matches back into the tree.
    pub id: String,

    /// Lowercase concatenation of id, category, name and price.
    pub haystack: String,
}

/// Flattened view of the catalog for substring matching.
///
/// Rebuilt wholesale whenever the active catalog changes; entries share the
/// catalog's lifecycle and are never updated in place.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Flattens the category→item tree into searchable entries.
    pub fn build(catalog: &Catalog) -> Self {
        let entries = catalog
            .categories
            .iter()
            .flat_map(|cat| {
                cat.items.iter().map(|item| IndexEntry {
                    id: item.id.clone(),
                    haystack: format!("{} {} {} {}", item.id, cat.name, item.name, item.price)
                        .to_lowercase(),
                })
            })
            .collect();
        SearchIndex { entries }
    }

    /// Ids of all items whose haystack contains **every** term.
    ///
    /// Logical AND across terms; substring matching, not token matching.
    /// An empty term list matches everything.
    pub fn matching_ids(&self, terms: &[String]) -> HashSet<&str> {
        self.entries
            .iter()
            .filter(|entry| terms.iter().all(|term| entry.haystack.contains(term.as_str())))
            .map(|entry| entry.id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, RawCatalogItem, RawCategory};

    fn catalog() -> Catalog {
        Catalog::from_tree(vec![
            RawCategory {
                category: "Drinks".to_string(),
                items: vec![
                    RawCatalogItem {
                        name: "Cola".to_string(),
                        price: 2.5,
                        vat: None,
                    },
                    RawCatalogItem {
                        name: "Water".to_string(),
                        price: 1.0,
                        vat: None,
                    },
                ],
            },
            RawCategory {
                category: "Snacks".to_string(),
                items: vec![RawCatalogItem {
                    name: "Chips".to_string(),
                    price: 1.99,
                    vat: None,
                }],
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_haystack_contains_id_category_name_price() {
        let index = SearchIndex::build(&catalog());
        assert_eq!(index.len(), 3);

        // "0001 drinks cola 2.5"
        let ids = index.matching_ids(&["drinks cola".to_string()]);
        assert!(ids.contains("0001"));

        let ids = index.matching_ids(&["2.5".to_string()]);
        assert!(ids.contains("0001"));
    }

    #[test]
    fn test_all_terms_must_match() {
        let index = SearchIndex::build(&catalog());

        let ids = index.matching_ids(&["drinks".to_string()]);
        assert_eq!(ids.len(), 2);

        let ids = index.matching_ids(&["drinks".to_string(), "wat".to_string()]);
        assert_eq!(ids.len(), 1);
        assert!(ids.contains("0002"));

        let ids = index.matching_ids(&["drinks".to_string(), "chips".to_string()]);
        assert!(ids.is_empty());
    }

    #[test]
    fn test_empty_terms_match_everything() {
        let index = SearchIndex::build(&catalog());
        assert_eq!(index.matching_ids(&[]).len(), 3);
    }
}
