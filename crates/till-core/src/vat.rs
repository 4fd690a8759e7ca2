//! # VAT Module
//!
//! VAT classification codes and the fixed rate table.
//!
//! ## Gross-Inclusive Prices
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CATALOG PRICES INCLUDE VAT                                             │
//! │                                                                         │
//! │  A shelf price of 10.00 with code A (19%) decomposes as:               │
//! │    net = 10.00 / 1.19 = 8.4033613...                                   │
//! │    tax = 10.00 − net  = 1.5966386...                                   │
//! │                                                                         │
//! │  Decomposition runs at full f64 precision. The two-decimal figures on  │
//! │  the receipt are a PRESENTATION concern; summing rounded lines would   │
//! │  compound error across a long receipt.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// VAT Code
// =============================================================================

/// Tax classification of a catalog item.
///
/// The rate table is fixed: A = 19 %, B = 7 %, C = 0 %. Items without a
/// code are taxed at A's rate and grouped under A in receipt summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatCode {
    /// Standard rate (19 %).
    A,
    /// Reduced rate (7 %).
    B,
    /// Zero-rated (0 %).
    C,
}

impl VatCode {
    /// All codes, in receipt summary order.
    pub const ALL: [VatCode; 3] = [VatCode::A, VatCode::B, VatCode::C];

    /// Returns the tax rate for this code as a fraction.
    #[inline]
    pub const fn rate(&self) -> f64 {
        match self {
            VatCode::A => 0.19,
            VatCode::B => 0.07,
            VatCode::C => 0.00,
        }
    }

    /// Returns the rate as a percent label for receipt summaries.
    #[inline]
    pub const fn percent_label(&self) -> &'static str {
        match self {
            VatCode::A => "19%",
            VatCode::B => "7%",
            VatCode::C => "0%",
        }
    }

    /// Resolves an optional code to its effective classification.
    ///
    /// Unset codes default to A, both for the rate applied at insertion and
    /// for the summary class the tax is grouped under.
    #[inline]
    pub fn effective(code: Option<VatCode>) -> VatCode {
        code.unwrap_or(VatCode::A)
    }

    /// Returns the rate for an optional code (unset ⇒ A's rate).
    #[inline]
    pub fn rate_of(code: Option<VatCode>) -> f64 {
        Self::effective(code).rate()
    }
}

impl fmt::Display for VatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            VatCode::A => "A",
            VatCode::B => "B",
            VatCode::C => "C",
        };
        write!(f, "{letter}")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table() {
        assert_eq!(VatCode::A.rate(), 0.19);
        assert_eq!(VatCode::B.rate(), 0.07);
        assert_eq!(VatCode::C.rate(), 0.00);
    }

    #[test]
    fn test_unset_defaults_to_a() {
        assert_eq!(VatCode::rate_of(None), 0.19);
        assert_eq!(VatCode::effective(None), VatCode::A);
        assert_eq!(VatCode::rate_of(Some(VatCode::C)), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(VatCode::A.to_string(), "A");
        assert_eq!(VatCode::B.percent_label(), "7%");
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&VatCode::B).unwrap();
        assert_eq!(json, "\"B\"");
        let code: VatCode = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(code, VatCode::C);
    }
}
