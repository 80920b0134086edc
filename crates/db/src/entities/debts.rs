//! `SeaORM` Entity for the bilateral debt ledger.
//!
//! At most one open row exists per ordered (creditor, debtor) pair;
//! settled debts are deleted, which is what lets the pair stay unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub creditor_unit_id: i32,
    pub debtor_unit_id: i32,
    pub amount: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::CreditorUnitId",
        to = "super::units::Column::Id"
    )]
    CreditorUnit,
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::DebtorUnitId",
        to = "super::units::Column::Id"
    )]
    DebtorUnit,
}

impl ActiveModelBehavior for ActiveModel {}
