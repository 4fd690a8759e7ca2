//! # Search Module
//!
//! Incremental, memoized filtering over the active catalog.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Search Pipeline                                    │
//! │                                                                         │
//! │  query string                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_query ──► terms (quoted phrases + whitespace words, folded)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FilterEngine ──► cache hit? ──────────────► stored tree               │
//! │       │                │                                                │
//! │       │                └─ miss: longest cached prefix? ─► refine that  │
//! │       │                                      │            entry's tree │
//! │       ▼                                      └─ none: full catalog     │
//! │  SearchIndex (id + lowercase haystack per item)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filtered tree: category order preserved, empty categories dropped     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Refinement is sound because appending characters to a query can only
//! shrink the match set (every term of the shorter query is a substring of
//! a term of the longer one, or unchanged).

mod cache;
mod filter;
mod index;
mod query;

pub use cache::{FilterCache, FilterEngine, DEFAULT_FILTER_CACHE_CAPACITY};
pub use filter::filter_catalog;
pub use index::{IndexEntry, SearchIndex};
pub use query::parse_query;
