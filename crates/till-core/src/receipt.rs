//! # Receipt Ledger
//!
//! Accumulates scanned items into priced, tax-split line positions and
//! produces VAT-correct totals.
//!
//! ## Position Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Receipt Ledger Operations                            │
//! │                                                                         │
//! │  Cashier Action          Ledger Call            Ledger Change           │
//! │  ──────────────          ───────────            ─────────────           │
//! │                                                                         │
//! │  Scan item ─────────────► add_position() ─────► positions.push(pos)    │
//! │                                                  (amounts frozen here)  │
//! │                                                                         │
//! │  Enter, empty buffer ───► finalize() ─────────► totals snapshot,       │
//! │                                                  finalized = true       │
//! │                                                                         │
//! │  Enter again ───────────► clear() ────────────► positions.clear(),     │
//! │                                                  finalized = false      │
//! │                                                                         │
//! │  NOTE: a position's net/tax/gross are computed ONCE at insertion from  │
//! │        the item's price and VAT code, and never recomputed. Repeated   │
//! │        scans of the same item never merge into one row.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sums accumulate at full f64 precision; rounding to two decimals is a
//! presentation concern (the document renderer), otherwise error would
//! compound across long receipts.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::vat::VatCode;

// =============================================================================
// Quantity Coercion
// =============================================================================

/// Parses a pending-input buffer into a line quantity.
///
/// Quantity must be a positive integer; non-numeric, zero, or empty input
/// silently coerces to 1 (never 0 or negative).
///
/// ## Example
/// ```rust
/// use till_core::coerce_quantity;
///
/// assert_eq!(coerce_quantity("3"), 3);
/// assert_eq!(coerce_quantity(""), 1);
/// assert_eq!(coerce_quantity("0"), 1);
/// assert_eq!(coerce_quantity("abc"), 1);
/// ```
pub fn coerce_quantity(input: &str) -> u32 {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|qty| *qty > 0)
        .unwrap_or(1)
}

// =============================================================================
// Receipt Position
// =============================================================================

/// One line on the receipt. Immutable once created.
///
/// ## Snapshot Pattern
/// The item's name, price and VAT code are frozen here. If the catalog is
/// swapped later, already-scanned lines keep displaying and summing the
/// values that were valid at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptPosition {
    /// Item id at scan time (frozen).
    pub item_id: String,

    /// Item name at scan time (frozen).
    pub item_name: String,

    /// Tax classification at scan time; `None` is taxed and grouped as A.
    pub vat: Option<VatCode>,

    /// Gross unit price at scan time (frozen).
    pub unit_gross: f64,

    /// Line quantity (always ≥ 1).
    pub quantity: u32,

    /// Line net amount, `unit_gross / (1 + rate) × quantity`.
    pub net: f64,

    /// Line tax amount, `gross − net`.
    pub tax: f64,

    /// Line gross amount, `unit_gross × quantity`.
    pub gross: f64,
}

impl ReceiptPosition {
    /// Freezes a catalog item into a receipt line at the given quantity.
    fn from_item(item: &CatalogItem, quantity: u32) -> Self {
        let rate = VatCode::rate_of(item.vat);
        let gross_unit = item.price;
        let net_unit = gross_unit / (1.0 + rate);
        let gross = gross_unit * quantity as f64;
        let net = net_unit * quantity as f64;

        ReceiptPosition {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            vat: item.vat,
            unit_gross: gross_unit,
            quantity,
            net,
            tax: gross - net,
            gross,
        }
    }

    /// The summary class this line's tax is grouped under (unset ⇒ A).
    #[inline]
    pub fn vat_class(&self) -> VatCode {
        VatCode::effective(self.vat)
    }
}

// =============================================================================
// Receipt Totals
// =============================================================================

/// Full-precision sums across all positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptTotals {
    pub net: f64,
    pub gross: f64,
    /// Tax collected at the standard rate (code A and unset items).
    pub tax_a: f64,
    /// Tax collected at the reduced rate.
    pub tax_b: f64,
    /// Tax collected at the zero rate (always 0.0, listed for the summary).
    pub tax_c: f64,
}

impl ReceiptTotals {
    fn accumulate(positions: &[ReceiptPosition]) -> Self {
        let mut totals = ReceiptTotals::default();
        for pos in positions {
            totals.net += pos.net;
            totals.gross += pos.gross;
            match pos.vat_class() {
                VatCode::A => totals.tax_a += pos.tax,
                VatCode::B => totals.tax_b += pos.tax,
                VatCode::C => totals.tax_c += pos.tax,
            }
        }
        totals
    }

    /// Tax sum for one summary class.
    pub fn tax_for(&self, code: VatCode) -> f64 {
        match code {
            VatCode::A => self.tax_a,
            VatCode::B => self.tax_b,
            VatCode::C => self.tax_c,
        }
    }

    /// Total tax across all classes.
    pub fn tax(&self) -> f64 {
        self.tax_a + self.tax_b + self.tax_c
    }
}

// =============================================================================
// Receipt Ledger
// =============================================================================

/// The ordered sequence of receipt positions plus the finalized flag.
///
/// ## Invariants
/// - Positions are append-only between `clear()` calls
/// - Amounts are frozen at insertion, never recomputed
/// - `finalize()` on an empty ledger is a no-op and leaves the flag alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptLedger {
    positions: Vec<ReceiptPosition>,
    finalized: bool,
    /// Totals snapshot taken by `finalize()`, for the printer.
    final_totals: Option<ReceiptTotals>,
}

impl ReceiptLedger {
    pub fn new() -> Self {
        ReceiptLedger::default()
    }

    /// Appends a new position for `item` at `quantity`.
    ///
    /// Every scan appends an independent row - repeated scans of the same
    /// item never merge. A zero quantity coerces to 1.
    pub fn add_position(&mut self, item: &CatalogItem, quantity: u32) -> &ReceiptPosition {
        let quantity = quantity.max(1);
        self.positions.push(ReceiptPosition::from_item(item, quantity));
        self.positions
            .last()
            .expect("position was just pushed")
    }

    /// Sums the ledger and marks it finalized.
    ///
    /// No-op on an empty ledger. Calling again before `clear()` keeps the
    /// first snapshot and has no further effect.
    pub fn finalize(&mut self) -> Option<&ReceiptTotals> {
        if self.positions.is_empty() {
            return None;
        }
        if !self.finalized {
            self.final_totals = Some(ReceiptTotals::accumulate(&self.positions));
            self.finalized = true;
        }
        self.final_totals.as_ref()
    }

    /// Empties the ledger and resets the finalized flag.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.finalized = false;
        self.final_totals = None;
    }

    /// Running totals over the current positions.
    ///
    /// Available before finalization for live display; after finalization
    /// this equals the snapshot.
    pub fn totals(&self) -> ReceiptTotals {
        ReceiptTotals::accumulate(&self.positions)
    }

    pub fn positions(&self) -> &[ReceiptPosition] {
        &self.positions
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Totals snapshot taken at finalization, if any.
    pub fn final_totals(&self) -> Option<&ReceiptTotals> {
        self.final_totals.as_ref()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, price: f64, vat: Option<VatCode>) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            price,
            vat,
        }
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("3"), 3);
        assert_eq!(coerce_quantity("12"), 12);
        assert_eq!(coerce_quantity(""), 1);
        assert_eq!(coerce_quantity("0"), 1);
        assert_eq!(coerce_quantity("abc"), 1);
        assert_eq!(coerce_quantity("  "), 1);
    }

    #[test]
    fn test_vat_decomposition_standard_rate() {
        // price 10.00, code A: net = 10 / 1.19, tax = gross - net
        let mut ledger = ReceiptLedger::new();
        let pos = ledger
            .add_position(&item("0001", "Widget", 10.0, Some(VatCode::A)), 1)
            .clone();

        assert!((pos.net - 8.403_361_344_537_815).abs() < 1e-9);
        assert!((pos.tax - 1.596_638_655_462_185).abs() < 1e-9);
        assert!((pos.gross - pos.net - pos.tax).abs() < 1e-9);
    }

    #[test]
    fn test_unset_vat_taxed_and_grouped_as_a() {
        let mut ledger = ReceiptLedger::new();
        ledger.add_position(&item("0001", "Widget", 10.0, None), 1);
        let totals = ledger.totals();
        assert!(totals.tax_a > 1.59);
        assert_eq!(totals.tax_b, 0.0);
        assert_eq!(totals.tax_c, 0.0);
    }

    #[test]
    fn test_receipt_scenario_mixed_classes() {
        // A(5.00, C) x3 and B(2.50, A) x2, then finalize:
        // gross = 20.00, tax_A ~ 0.7983, tax_B = tax_C = 0
        let mut ledger = ReceiptLedger::new();
        ledger.add_position(&item("0001", "A", 5.0, Some(VatCode::C)), 3);
        ledger.add_position(&item("0002", "B", 2.5, Some(VatCode::A)), 2);

        let totals = *ledger.finalize().expect("non-empty ledger finalizes");
        assert!(ledger.is_finalized());
        assert!((totals.gross - 20.0).abs() < 1e-9);
        assert!((totals.tax_a - 0.798_319).abs() < 1e-4);
        assert_eq!(totals.tax_b, 0.0);
        assert_eq!(totals.tax_c, 0.0);
        assert!((totals.gross - totals.net - totals.tax()).abs() < 1e-9);
    }

    #[test]
    fn test_positions_never_merge() {
        let mut ledger = ReceiptLedger::new();
        let cola = item("0001", "Cola", 2.5, None);
        ledger.add_position(&cola, 1);
        ledger.add_position(&cola, 1);
        assert_eq!(ledger.positions().len(), 2);
    }

    #[test]
    fn test_zero_quantity_coerces_to_one() {
        let mut ledger = ReceiptLedger::new();
        let pos = ledger.add_position(&item("0001", "Cola", 2.5, None), 0);
        assert_eq!(pos.quantity, 1);
    }

    #[test]
    fn test_finalize_empty_is_noop() {
        let mut ledger = ReceiptLedger::new();
        assert!(ledger.finalize().is_none());
        assert!(!ledger.is_finalized());
    }

    #[test]
    fn test_finalize_twice_keeps_first_snapshot() {
        let mut ledger = ReceiptLedger::new();
        ledger.add_position(&item("0001", "Cola", 2.5, None), 1);
        let first = *ledger.finalize().unwrap();

        // a stray scan after finalization must not disturb the snapshot
        ledger.add_position(&item("0001", "Cola", 2.5, None), 1);
        let second = *ledger.finalize().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut ledger = ReceiptLedger::new();
        ledger.add_position(&item("0001", "Cola", 2.5, None), 2);
        ledger.finalize();

        ledger.clear();
        assert!(ledger.is_empty());
        assert!(!ledger.is_finalized());
        assert!(ledger.final_totals().is_none());
    }
}
