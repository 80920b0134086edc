//! Transaction log read queries.
//!
//! The log is append-only; rows are written exclusively by
//! `OperationRepository` and the admin correction in `UnitRepository`.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::entities::transactions;

/// Transaction history repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The most recent transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recent(&self, limit: u64) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// All transactions created at or after `since`, or the whole log
    /// when `since` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        let mut query = transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id);
        if let Some(since) = since {
            query = query.filter(transactions::Column::CreatedAt.gte(since));
        }
        query.all(&self.db).await
    }
}
