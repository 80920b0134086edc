//! Repository abstractions for data access.

pub mod debt;
pub mod operation;
pub mod transaction;
pub mod unit;
pub mod user;

pub use debt::DebtRepository;
pub use operation::{ExecutedOperation, OperationRepository};
pub use transaction::TransactionRepository;
pub use unit::{UnitError, UnitRepository};
pub use user::{UserError, UserRepository};
