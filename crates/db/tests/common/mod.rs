//! Shared test harness: in-memory SQLite with the entity-derived schema.

#![allow(dead_code)]

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, EntityTrait, Schema,
    Set,
};

use kassa_db::entities::{debts, transactions, units, users};
use kassa_db::repositories::{UnitRepository, UserRepository};

/// Connects an in-memory SQLite database and creates the schema.
///
/// A single pooled connection keeps every query on the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let statements = [
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(units::Entity),
        schema.create_table_from_entity(transactions::Entity),
        schema.create_table_from_entity(debts::Entity),
    ];
    for statement in statements {
        db.execute(db.get_database_backend().build(&statement))
            .await
            .expect("create table");
    }

    db
}

/// Registers a test user and returns its model.
pub async fn seed_user(db: &DatabaseConnection, id: i64) -> users::Model {
    UserRepository::new(db.clone())
        .get_or_create(id, Some("tester"), &[])
        .await
        .expect("seed user")
}

/// Creates a unit with the given starting balances.
pub async fn seed_unit(
    db: &DatabaseConnection,
    name: &str,
    bank_balance: i64,
    cash_balance: i64,
) -> units::Model {
    UnitRepository::new(db.clone())
        .create(name, bank_balance, cash_balance)
        .await
        .expect("seed unit")
}

/// Sets a unit's debit balance directly (no catalog operation funds it).
pub async fn set_debit(db: &DatabaseConnection, unit_id: i32, amount: i64) {
    let unit = units::Entity::find_by_id(unit_id)
        .one(db)
        .await
        .expect("query unit")
        .expect("unit exists");
    let mut active: units::ActiveModel = unit.into();
    active.debit_balance = Set(amount);
    sea_orm::ActiveModelTrait::update(active, db)
        .await
        .expect("set debit");
}

/// Re-reads a unit.
pub async fn reload_unit(db: &DatabaseConnection, unit_id: i32) -> units::Model {
    units::Entity::find_by_id(unit_id)
        .one(db)
        .await
        .expect("query unit")
        .expect("unit exists")
}

/// All transaction-log rows, oldest first.
pub async fn all_log_rows(db: &DatabaseConnection) -> Vec<transactions::Model> {
    transactions::Entity::find()
        .all(db)
        .await
        .expect("query log")
}

/// All open debts.
pub async fn all_debts(db: &DatabaseConnection) -> Vec<debts::Model> {
    debts::Entity::find().all(db).await.expect("query debts")
}

/// Sum of bank + cash over every unit (the system total).
pub async fn system_total(db: &DatabaseConnection) -> i64 {
    units::Entity::find()
        .all(db)
        .await
        .expect("query units")
        .iter()
        .map(|u| u.bank_balance + u.cash_balance)
        .sum()
}
