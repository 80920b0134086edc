//! `SeaORM` entity definitions.

pub mod debts;
pub mod transactions;
pub mod units;
pub mod users;
