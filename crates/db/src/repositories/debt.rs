//! Debt ledger read queries.
//!
//! All debt mutation happens inside the Operation Processor's transaction
//! (`OperationRepository`); this repository only reads.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use crate::entities::debts;

/// Debt ledger repository.
#[derive(Debug, Clone)]
pub struct DebtRepository {
    db: DatabaseConnection,
}

impl DebtRepository {
    /// Creates a new debt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a debt by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<debts::Model>, DbErr> {
        debts::Entity::find_by_id(id).one(&self.db).await
    }

    /// All open debts, oldest first.
    ///
    /// Settled debts are deleted, so every row here is outstanding.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_open(&self) -> Result<Vec<debts::Model>, DbErr> {
        debts::Entity::find()
            .order_by_asc(debts::Column::CreatedAt)
            .order_by_asc(debts::Column::Id)
            .all(&self.db)
            .await
    }
}
