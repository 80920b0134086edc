//! `SeaORM` Entity for the business units ("IP") table.
//!
//! All balance columns are whole-ruble integers and must stay
//! non-negative; every mutation goes through a repository transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub bank_balance: i64,
    pub debit_balance: i64,
    pub cash_balance: i64,
    pub initial_capital: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
