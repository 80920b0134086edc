//! Operation repository: the persistence half of the Operation Processor.
//!
//! Validation and effect resolution are pure (`kassa_core::ops`); this
//! repository runs them against live snapshots and applies the result
//! inside a single database transaction. Debits use conditional atomic
//! updates (`SET field = field - X ... AND field >= X`), so the
//! non-negativity check and the write are one statement and concurrent
//! operations on the same unit serialize on its row instead of losing
//! updates.

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::info;

use kassa_core::ops::{
    BalanceDelta, BalanceField, DebtEffect, DebtView, OpError, OperationRequest, OperationService,
    ResolvedOperation, UnitBalances,
};

use crate::entities::{debts, transactions, units};

/// The outcome of a committed operation.
#[derive(Debug, Clone, Copy)]
pub struct ExecutedOperation {
    /// Id of the appended transaction-log row.
    pub transaction_id: i32,
    /// Post-operation value of the primary affected balance.
    pub new_balance: i64,
}

/// Repository that applies ledger operations atomically.
#[derive(Debug, Clone)]
pub struct OperationRepository {
    db: DatabaseConnection,
}

impl OperationRepository {
    /// Creates a new operation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and applies a submitted operation.
    ///
    /// Everything - the snapshot reads, balance mutations, debt upsert,
    /// and the log append - happens in one database transaction; any
    /// failure rolls the whole operation back.
    ///
    /// # Errors
    ///
    /// Returns an `OpError` describing the first failed validation step,
    /// or `OpError::Database` on infrastructure failure.
    pub async fn submit(
        &self,
        actor_id: i64,
        request: OperationRequest,
    ) -> Result<ExecutedOperation, OpError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let source = match request.unit_id {
            Some(id) => fetch_balances(&txn, id).await?,
            None => None,
        };
        let target = match request.target_unit_id {
            Some(id) => fetch_balances(&txn, id).await?,
            None => None,
        };

        let resolved = OperationService::resolve(&request, source.as_ref(), target.as_ref())?;
        let executed = apply(&txn, actor_id, &resolved).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            op_type = resolved.op_type.as_str(),
            amount = resolved.amount,
            unit_id = ?resolved.unit_id,
            actor = actor_id,
            "Operation committed"
        );
        Ok(executed)
    }

    /// Validates and applies a debt repayment as a constrained `pogasit`
    /// operation: debtor cash to creditor cash, debt decrement (deleting
    /// at zero), and the log append, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `DebtNotFound`, `InvalidAmount`, `ExceedsDebt`,
    /// `InsufficientFunds`, or `OpError::Database`.
    pub async fn repay(
        &self,
        actor_id: i64,
        debt_id: i32,
        amount: i64,
    ) -> Result<ExecutedOperation, OpError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let debt = debts::Entity::find_by_id(debt_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(OpError::DebtNotFound(debt_id))?;
        let debtor = fetch_balances(&txn, debt.debtor_unit_id)
            .await?
            .ok_or(OpError::UnitNotFound(debt.debtor_unit_id))?;
        let creditor = fetch_balances(&txn, debt.creditor_unit_id)
            .await?
            .ok_or(OpError::UnitNotFound(debt.creditor_unit_id))?;

        let view = DebtView {
            id: debt.id,
            creditor_unit_id: debt.creditor_unit_id,
            debtor_unit_id: debt.debtor_unit_id,
            amount: debt.amount,
        };
        let resolved = OperationService::resolve_repayment(&view, &debtor, &creditor, amount)?;
        let executed = apply(&txn, actor_id, &resolved).await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            debt_id,
            amount,
            actor = actor_id,
            "Debt repayment committed"
        );
        Ok(executed)
    }
}

/// Applies a resolved operation inside an open transaction.
async fn apply(
    txn: &DatabaseTransaction,
    actor_id: i64,
    op: &ResolvedOperation,
) -> Result<ExecutedOperation, OpError> {
    // Row locks are taken in ascending (unit, field) order so concurrent
    // multi-unit operations cannot deadlock on each other.
    let mut deltas = op.deltas.clone();
    deltas.sort_by_key(|d| (d.unit_id, d.field));
    for delta in &deltas {
        apply_delta(txn, delta).await?;
    }

    match op.debt {
        Some(DebtEffect::Lend {
            creditor_unit_id,
            debtor_unit_id,
            amount,
        }) => upsert_debt(txn, creditor_unit_id, debtor_unit_id, amount).await?,
        Some(DebtEffect::Settle { debt_id, amount }) => settle_debt(txn, debt_id, amount).await?,
        None => {}
    }

    let row = transactions::ActiveModel {
        user_id: Set(actor_id),
        unit_id: Set(op.unit_id),
        target_unit_id: Set(op.target_unit_id),
        tx_type: Set(op.op_type.as_str().to_owned()),
        amount: Set(op.amount),
        comment: Set(op.comment.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let row = row.insert(txn).await.map_err(db_err)?;

    let new_balance = fetch_balances(txn, op.primary.unit_id)
        .await?
        .ok_or(OpError::UnitNotFound(op.primary.unit_id))?
        .get(op.primary.field);

    Ok(ExecutedOperation {
        transaction_id: row.id,
        new_balance,
    })
}

/// Applies one signed balance mutation as a conditional atomic update.
async fn apply_delta(txn: &DatabaseTransaction, delta: &BalanceDelta) -> Result<(), OpError> {
    let column = balance_column(delta.field);
    let mut update = units::Entity::update_many()
        .col_expr(column, Expr::col(column).add(delta.delta))
        .filter(units::Column::Id.eq(delta.unit_id));
    if delta.delta < 0 {
        update = update.filter(column.gte(-delta.delta));
    }

    let result = update.exec(txn).await.map_err(db_err)?;
    if result.rows_affected == 0 {
        return Err(match fetch_balances(txn, delta.unit_id).await? {
            Some(balances) if delta.delta < 0 => OpError::InsufficientFunds {
                field: delta.field,
                available: balances.get(delta.field),
                required: -delta.delta,
            },
            _ => OpError::UnitNotFound(delta.unit_id),
        });
    }
    Ok(())
}

/// Opens or grows the debt for the ordered (creditor, debtor) pair.
///
/// Same-pair races already serialize on the creditor's row lock taken by
/// the balance update, so update-then-insert cannot duplicate the pair.
async fn upsert_debt(
    txn: &DatabaseTransaction,
    creditor_unit_id: i32,
    debtor_unit_id: i32,
    amount: i64,
) -> Result<(), OpError> {
    let now = Utc::now();
    let updated = debts::Entity::update_many()
        .col_expr(
            debts::Column::Amount,
            Expr::col(debts::Column::Amount).add(amount),
        )
        .col_expr(debts::Column::UpdatedAt, Expr::value(now))
        .filter(debts::Column::CreditorUnitId.eq(creditor_unit_id))
        .filter(debts::Column::DebtorUnitId.eq(debtor_unit_id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if updated.rows_affected == 0 {
        let debt = debts::ActiveModel {
            creditor_unit_id: Set(creditor_unit_id),
            debtor_unit_id: Set(debtor_unit_id),
            amount: Set(amount),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        debt.insert(txn).await.map_err(db_err)?;
    }
    Ok(())
}

/// Shrinks a debt, deleting the row once it reaches zero.
async fn settle_debt(txn: &DatabaseTransaction, debt_id: i32, amount: i64) -> Result<(), OpError> {
    let updated = debts::Entity::update_many()
        .col_expr(
            debts::Column::Amount,
            Expr::col(debts::Column::Amount).sub(amount),
        )
        .col_expr(debts::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(debts::Column::Id.eq(debt_id))
        .filter(debts::Column::Amount.gte(amount))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if updated.rows_affected == 0 {
        return Err(
            match debts::Entity::find_by_id(debt_id)
                .one(txn)
                .await
                .map_err(db_err)?
            {
                Some(debt) => OpError::ExceedsDebt {
                    requested: amount,
                    outstanding: debt.amount,
                },
                None => OpError::DebtNotFound(debt_id),
            },
        );
    }

    let remaining = debts::Entity::find_by_id(debt_id)
        .one(txn)
        .await
        .map_err(db_err)?;
    if let Some(debt) = remaining
        && debt.amount == 0
    {
        debts::Entity::delete_by_id(debt_id)
            .exec(txn)
            .await
            .map_err(db_err)?;
    }
    Ok(())
}

/// Reads a unit's balance snapshot.
async fn fetch_balances<C: ConnectionTrait>(
    conn: &C,
    unit_id: i32,
) -> Result<Option<UnitBalances>, OpError> {
    let unit = units::Entity::find_by_id(unit_id)
        .one(conn)
        .await
        .map_err(db_err)?;
    Ok(unit.map(|u| UnitBalances {
        id: u.id,
        bank: u.bank_balance,
        cash: u.cash_balance,
        debit: u.debit_balance,
    }))
}

const fn balance_column(field: BalanceField) -> units::Column {
    match field {
        BalanceField::Bank => units::Column::BankBalance,
        BalanceField::Cash => units::Column::CashBalance,
        BalanceField::Debit => units::Column::DebitBalance,
    }
}

fn db_err(err: DbErr) -> OpError {
    OpError::Database(err.to_string())
}
