//! # Catalog Module
//!
//! The category→item product tree for the active business, with
//! deterministic item id assignment.
//!
//! ## Id Assignment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DETERMINISTIC 4-DIGIT IDS                                              │
//! │                                                                         │
//! │  Source data carries no ids. At load time:                             │
//! │    1. categories sorted lexicographically by name                      │
//! │    2. items within each category sorted lexicographically by name      │
//! │    3. one counter runs across the whole sorted sequence                │
//! │       (never reset per category), zero-padded to 4 digits              │
//! │                                                                         │
//! │  {B: [z, a], A: [m]}  ⇒  A:[m]  B:[a, z]                               │
//! │                          0001=m  0002=a  0003=z                        │
//! │                                                                         │
//! │  The same source file therefore always yields the same ids, so a      │
//! │  cashier can memorize them and printed barcodes stay stable.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Source Shapes
//! Businesses provide either a category tree (`RawCategory`) or, for
//! editable businesses, a flat article list (`RawArticle`) whose persisted
//! ids are kept as-is. Both normalize into the same [`Catalog`].

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::vat::VatCode;
use crate::{FLAT_CATALOG_CATEGORY, ITEM_ID_DIGITS};

// =============================================================================
// Raw Source Shapes
// =============================================================================

/// One category as provided by a business catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCategory {
    /// Category display name.
    pub category: String,

    /// Items in source order (re-sorted at load).
    pub items: Vec<RawCatalogItem>,
}

/// One item as provided by a business catalog file. No id yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCatalogItem {
    pub name: String,

    /// Gross shelf price (VAT included).
    pub price: f64,

    /// Tax classification; unset is taxed as A.
    #[serde(default)]
    pub vat: Option<VatCode>,
}

/// One article from an editable business's persisted flat list.
///
/// Unlike tree items these already carry their article number; the catalog
/// keeps it (zero-padded) instead of assigning a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    /// Persisted article number (digits, at most 4).
    pub id: String,

    pub name: String,

    pub price: f64,

    #[serde(default)]
    pub vat: Option<VatCode>,
}

/// Either source shape, as delivered by a catalog source.
///
/// Deserializes untagged: tree entries carry `category` + `items`, flat
/// articles carry `id` + `name` + `price`, so the shapes never overlap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCatalog {
    /// Category→items tree; ids are assigned at load.
    Tree(Vec<RawCategory>),
    /// Flat article list from an editable business; ids are kept.
    Articles(Vec<RawArticle>),
}

impl RawCatalog {
    /// Normalizes either shape into a [`Catalog`].
    pub fn into_catalog(self) -> CoreResult<Catalog> {
        match self {
            RawCatalog::Tree(categories) => Catalog::from_tree(categories),
            RawCatalog::Articles(articles) => Catalog::from_articles(articles),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A priced item in the active catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// 4-digit zero-padded id, unique within the catalog.
    pub id: String,

    pub name: String,

    /// Gross price (VAT included). Never negative.
    pub price: f64,

    /// Tax classification; `None` is taxed as A.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat: Option<VatCode>,
}

/// A named group of items. Category order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<CatalogItem>,
}

/// The full category→item tree for the active business.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Builds a catalog from a raw category tree, assigning ids.
    ///
    /// Sorts categories and items by name, then numbers every item with a
    /// single running counter zero-padded to [`ITEM_ID_DIGITS`]. Rejects
    /// negative prices; a rejected load leaves no partial catalog behind.
    pub fn from_tree(mut raw: Vec<RawCategory>) -> CoreResult<Self> {
        for cat in &raw {
            for item in &cat.items {
                validate_price(&item.name, item.price)?;
            }
        }

        raw.sort_by(|a, b| a.category.cmp(&b.category));

        let mut counter = 0usize;
        let categories = raw
            .into_iter()
            .map(|mut cat| {
                cat.items.sort_by(|a, b| a.name.cmp(&b.name));
                let items = cat
                    .items
                    .into_iter()
                    .map(|item| {
                        counter += 1;
                        CatalogItem {
                            id: format!("{counter:0>width$}", width = ITEM_ID_DIGITS),
                            name: item.name,
                            price: item.price,
                            vat: item.vat,
                        }
                    })
                    .collect();
                Category {
                    name: cat.category,
                    items,
                }
            })
            .collect();

        Ok(Catalog { categories })
    }

    /// Builds a catalog from an editable business's flat article list.
    ///
    /// Articles keep their persisted numbers (padded to id width) and land
    /// in a single [`FLAT_CATALOG_CATEGORY`] category in list order. Ids
    /// must be digits, at most [`ITEM_ID_DIGITS`] long, and unique; any
    /// violation fails the whole load.
    pub fn from_articles(raw: Vec<RawArticle>) -> CoreResult<Self> {
        let mut items = Vec::with_capacity(raw.len());
        for article in raw {
            validate_price(&article.name, article.price)?;

            if article.id.is_empty() || !article.id.chars().all(|c| c.is_ascii_digit()) {
                return Err(CoreError::InvalidItemId {
                    id: article.id,
                    reason: "must contain only digits".to_string(),
                });
            }
            if article.id.len() > ITEM_ID_DIGITS {
                return Err(CoreError::InvalidItemId {
                    id: article.id,
                    reason: format!("must be at most {ITEM_ID_DIGITS} digits"),
                });
            }

            let id = format!("{:0>width$}", article.id, width = ITEM_ID_DIGITS);
            if items.iter().any(|existing: &CatalogItem| existing.id == id) {
                return Err(CoreError::DuplicateItemId(id));
            }

            items.push(CatalogItem {
                id,
                name: article.name,
                price: article.price,
                vat: article.vat,
            });
        }

        Ok(Catalog {
            categories: vec![Category {
                name: FLAT_CATALOG_CATEGORY.to_string(),
                items,
            }],
        })
    }

    /// Looks up an item by its exact 4-digit id.
    pub fn lookup(&self, id: &str) -> Option<&CatalogItem> {
        self.items().find(|item| item.id == id)
    }

    /// Iterates all items in category order.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.categories.iter().flat_map(|cat| cat.items.iter())
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|cat| cat.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

fn validate_price(name: &str, price: f64) -> CoreResult<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(CoreError::NegativePrice {
            name: name.to_string(),
            price,
        });
    }
    Ok(())
}

// =============================================================================
// Id Sanitizing
// =============================================================================

/// Normalizes keyed-in digits to lookup form.
///
/// Strips leading zeros, then pads back to [`ITEM_ID_DIGITS`], so "7",
/// "07" and "0007" all look up the same item. Input longer than the id
/// width after stripping stays longer and simply finds no match.
///
/// ## Example
/// ```rust
/// use till_core::sanitize_item_id;
///
/// assert_eq!(sanitize_item_id("7"), "0007");
/// assert_eq!(sanitize_item_id("0042"), "0042");
/// assert_eq!(sanitize_item_id("0000"), "0000");
/// ```
pub fn sanitize_item_id(input: &str) -> String {
    let stripped = input.trim_start_matches('0');
    format!("{stripped:0>width$}", width = ITEM_ID_DIGITS)
}

// =============================================================================
// Unit Tests
// =============================================================================
