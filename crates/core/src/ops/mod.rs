//! The operation catalog and its resolution into balance effects.
//!
//! Every money movement the ledger accepts is one of a fixed set of
//! operation types. Each type maps to exactly one balance-effect pattern,
//! encoded as data in [`types`], so adding an operation type is an
//! addition to the table, not a branching rewrite.

pub mod error;
pub mod service;
pub mod types;

pub use error::OpError;
pub use service::{
    BalanceDelta, BalanceRef, DebtEffect, DebtView, OperationRequest, OperationService,
    ResolvedOperation, UnitBalances,
};
pub use types::{ADJUSTMENT_TYPE, BalanceField, Direction, FlowClass, OpType, Party, label_for};

#[cfg(test)]
mod props;
