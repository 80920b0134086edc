//! Business unit repository: admin-side CRUD and the audited correction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::info;

use kassa_core::ops::ADJUSTMENT_TYPE;

use crate::entities::{transactions, units};

/// Error types for unit operations.
#[derive(Debug, Error)]
pub enum UnitError {
    /// A unit with this name already exists.
    #[error("ИП с именем «{0}» уже существует")]
    NameTaken(String),

    /// No such unit.
    #[error("ИП {0} не найдено")]
    NotFound(i32),

    /// A balance was set to a negative value.
    #[error("Балансы не могут быть отрицательными")]
    NegativeBalance,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl UnitError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NameTaken(_) | Self::NegativeBalance => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

/// Business unit repository.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    db: DatabaseConnection,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a unit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<units::Model>, DbErr> {
        units::Entity::find_by_id(id).one(&self.db).await
    }

    /// All units, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<units::Model>, DbErr> {
        units::Entity::find()
            .order_by_asc(units::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a unit with the given starting balances.
    ///
    /// The initial capital is recorded as their sum and never changes
    /// afterwards, even through corrections.
    ///
    /// # Errors
    ///
    /// Returns `NameTaken` for a duplicate name, `NegativeBalance` for
    /// negative starting balances.
    pub async fn create(
        &self,
        name: &str,
        bank_balance: i64,
        cash_balance: i64,
    ) -> Result<units::Model, UnitError> {
        if bank_balance < 0 || cash_balance < 0 {
            return Err(UnitError::NegativeBalance);
        }

        let exists = units::Entity::find()
            .filter(units::Column::Name.eq(name))
            .count(&self.db)
            .await?;
        if exists > 0 {
            return Err(UnitError::NameTaken(name.to_string()));
        }

        let unit = units::ActiveModel {
            name: Set(name.to_string()),
            bank_balance: Set(bank_balance),
            debit_balance: Set(0),
            cash_balance: Set(cash_balance),
            initial_capital: Set(bank_balance + cash_balance),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let unit = unit.insert(&self.db).await?;

        info!(
            unit_id = unit.id,
            name = %unit.name,
            bank = bank_balance,
            cash = cash_balance,
            "Unit created"
        );
        Ok(unit)
    }

    /// Directly sets a unit's bank and cash balances (admin correction).
    ///
    /// Bypasses the operation catalog but still appends an audit entry to
    /// the transaction log, in the same database transaction as the
    /// balance write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `NegativeBalance` for negative targets.
    pub async fn adjust_balances(
        &self,
        unit_id: i32,
        bank_balance: i64,
        cash_balance: i64,
        actor_id: i64,
    ) -> Result<units::Model, UnitError> {
        if bank_balance < 0 || cash_balance < 0 {
            return Err(UnitError::NegativeBalance);
        }

        let txn = self.db.begin().await?;

        let unit = units::Entity::find_by_id(unit_id)
            .one(&txn)
            .await?
            .ok_or(UnitError::NotFound(unit_id))?;

        let adjustment =
            (bank_balance - unit.bank_balance).abs() + (cash_balance - unit.cash_balance).abs();
        let comment = format!(
            "Р/С: {} -> {}, нал: {} -> {}",
            unit.bank_balance, bank_balance, unit.cash_balance, cash_balance
        );

        let mut active: units::ActiveModel = unit.into();
        active.bank_balance = Set(bank_balance);
        active.cash_balance = Set(cash_balance);
        let unit = active.update(&txn).await?;

        let audit = transactions::ActiveModel {
            user_id: Set(actor_id),
            unit_id: Set(Some(unit.id)),
            target_unit_id: Set(None),
            tx_type: Set(ADJUSTMENT_TYPE.to_owned()),
            amount: Set(adjustment),
            comment: Set(Some(comment)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        audit.insert(&txn).await?;

        txn.commit().await?;

        info!(
            unit_id = unit.id,
            bank = bank_balance,
            cash = cash_balance,
            actor = actor_id,
            "Unit balances corrected"
        );
        Ok(unit)
    }
}
