//! # Receipt Document
//!
//! Renders a ledger into the plain-text markup handed to the printer
//! collaborator. Layout:
//!
//! ```text
//! <business header lines>
//! <date>
//!
//! Cola (0001) [A]
//!   3 x 2.50€ = 7.50€
//!
//! Net: 16.81€
//! VAT (A=19%): 3.19€
//! VAT (B=7%): 0.00€
//! VAT (C=0%): 0.00€
//! Gross: 20.00€
//! ```
//!
//! This is the only place amounts are rounded to two decimals; the ledger
//! itself accumulates at full precision.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use till_core::{ReceiptLedger, ReceiptPosition, ReceiptTotals, VatCode};

/// A rendered receipt, ready for the printer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDocument {
    header: Vec<String>,
    date: NaiveDate,
    positions: Vec<ReceiptPosition>,
    totals: ReceiptTotals,
    finalized: bool,
}

impl ReceiptDocument {
    /// Snapshots the ledger into a printable document.
    ///
    /// The summary uses the finalization snapshot when one exists and the
    /// running totals otherwise, so printing a draft receipt shows its
    /// current sums without finalizing the ledger itself.
    pub fn render(ledger: &ReceiptLedger, header: &[String], date: NaiveDate) -> Self {
        let totals = ledger
            .final_totals()
            .copied()
            .unwrap_or_else(|| ledger.totals());

        ReceiptDocument {
            header: header.to_vec(),
            date,
            positions: ledger.positions().to_vec(),
            totals,
            finalized: ledger.is_finalized(),
        }
    }

    pub fn positions(&self) -> &[ReceiptPosition] {
        &self.positions
    }

    pub fn totals(&self) -> &ReceiptTotals {
        &self.totals
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The full document as printer markup.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReceiptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.header {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{}", self.date.format("%d.%m.%Y"))?;
        writeln!(f)?;

        for position in &self.positions {
            writeln!(
                f,
                "{} ({}) [{}]",
                position.item_name, position.item_id, position.vat_class()
            )?;
            writeln!(
                f,
                "  {} x {:.2}€ = {:.2}€",
                position.quantity, position.unit_gross, position.gross
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Net: {:.2}€", self.totals.net)?;
        for code in VatCode::ALL {
            writeln!(
                f,
                "VAT ({}={}): {:.2}€",
                code,
                code.percent_label(),
                self.totals.tax_for(code)
            )?;
        }
        write!(f, "Gross: {:.2}€", self.totals.gross)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
