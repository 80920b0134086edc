//! `SeaORM` Entity for the users table.
//!
//! The primary key is the Telegram id supplied by the verified credential,
//! so there is no autoincrement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The admin role name.
pub const ROLE_ADMIN: &str = "admin";
/// The regular user role name.
pub const ROLE_USER: &str = "user";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub username: Option<String>,
    pub role: String,
    pub cash_balance: i64,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Returns true if the user carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Display name: `@username`, or the id when there is no username.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.username
            .as_ref()
            .map_or_else(|| format!("ID:{}", self.id), |name| format!("@{name}"))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
