//! Initial database migration.
//!
//! Creates the four ledger tables: users, business units, the transaction
//! log, and the debt ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(UNITS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(DEBTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const USERS_SQL: &str = r"
-- Users keyed by their Telegram id (no autoincrement)
CREATE TABLE users (
    id BIGINT PRIMARY KEY,
    username VARCHAR(255),
    role VARCHAR(20) NOT NULL DEFAULT 'user',
    cash_balance BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_users_role CHECK (role IN ('admin', 'user')),
    CONSTRAINT chk_users_cash CHECK (cash_balance >= 0)
);
";

const UNITS_SQL: &str = r"
-- Business units with materialized balances (whole rubles, never negative)
CREATE TABLE units (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE,
    bank_balance BIGINT NOT NULL DEFAULT 0,
    debit_balance BIGINT NOT NULL DEFAULT 0,
    cash_balance BIGINT NOT NULL DEFAULT 0,
    initial_capital BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_units_bank CHECK (bank_balance >= 0),
    CONSTRAINT chk_units_debit CHECK (debit_balance >= 0),
    CONSTRAINT chk_units_cash CHECK (cash_balance >= 0)
);
";

const TRANSACTIONS_SQL: &str = r"
-- Append-only transaction log; the authoritative operation history
CREATE TABLE transactions (
    id SERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id),
    unit_id INTEGER REFERENCES units(id),
    target_unit_id INTEGER REFERENCES units(id),
    type VARCHAR(30) NOT NULL,
    amount BIGINT NOT NULL,
    comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transactions_amount CHECK (amount >= 0)
);

-- History feed and report windows read newest-first by creation time
CREATE INDEX idx_transactions_created ON transactions(created_at DESC, id DESC);
CREATE INDEX idx_transactions_unit ON transactions(unit_id, created_at DESC);
";

const DEBTS_SQL: &str = r"
-- Bilateral debt ledger; one open row per ordered (creditor, debtor) pair
CREATE TABLE debts (
    id SERIAL PRIMARY KEY,
    creditor_unit_id INTEGER NOT NULL REFERENCES units(id),
    debtor_unit_id INTEGER NOT NULL REFERENCES units(id),
    amount BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- amount may touch 0 inside the settling transaction, which then deletes the row
    CONSTRAINT chk_debts_amount CHECK (amount >= 0),
    CONSTRAINT chk_debts_distinct CHECK (creditor_unit_id <> debtor_unit_id),
    CONSTRAINT uq_debts_pair UNIQUE (creditor_unit_id, debtor_unit_id)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS debts CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS units CASCADE;
DROP TABLE IF EXISTS users CASCADE;
";
