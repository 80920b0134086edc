//! Income/expense aggregation over transaction-log entries.

use serde::Serialize;

use crate::ops::{FlowClass, OpType};

/// Aggregated money flow over a report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlowTotals {
    /// Sum of income operation amounts.
    pub income: i64,
    /// Sum of expense operation amounts.
    pub expense: i64,
}

/// Sums income and expense over `(op_type, amount)` entries.
///
/// Internal transfers and debt operations are excluded from both totals:
/// they move money between pockets without changing how much there is.
pub fn summarize<I>(entries: I) -> FlowTotals
where
    I: IntoIterator<Item = (OpType, i64)>,
{
    let mut totals = FlowTotals::default();
    for (op, amount) in entries {
        match op.class() {
            FlowClass::Income => totals.income += amount,
            FlowClass::Expense => totals.expense += amount,
            FlowClass::Transfer | FlowClass::Debt => {}
        }
    }
    totals
}
