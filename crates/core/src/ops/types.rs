//! Operation types and their balance-effect rules.
//!
//! The catalog is the single source of truth for what each operation does
//! to which balance field. The vocabulary is the original bot's: `zakup`
//! is a business purchase, `prihod_*` are incomes, `snyat_*`/`vnesti_rs`
//! move money between a unit's own balances, `odolzhit`/`pogasit` drive
//! the debt ledger.

use serde::{Deserialize, Serialize};

/// Transaction type recorded for admin balance corrections.
///
/// Not part of the submittable catalog; it only ever appears in the
/// transaction log as an audit trail entry.
pub const ADJUSTMENT_TYPE: &str = "korrekt";

/// A balance field of a business unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceField {
    /// Settlement account ("расчётный счёт").
    Bank,
    /// Cash on hand.
    Cash,
    /// Debit card balance.
    Debit,
}

impl BalanceField {
    /// Returns the lowercase field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Debit => "debit",
        }
    }
}

impl std::fmt::Display for BalanceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an operation is counted in income/expense reports.
///
/// Internal transfers and debt movements are deliberately neither income
/// nor expense: they move money around without changing the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowClass {
    /// Money entering the system.
    Income,
    /// Money leaving the system.
    Expense,
    /// Movement between balances of one unit.
    Transfer,
    /// Loan or repayment between two units.
    Debt,
}

/// Which unit a posting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The unit named by `unit_id`.
    Source,
    /// The unit named by `target_unit_id` (the borrower / the creditor).
    Target,
}

/// Whether a posting takes from or adds to a balance field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The field decreases by the operation amount; requires sufficiency.
    Withdraw,
    /// The field increases by the operation amount.
    Deposit,
}

/// One balance movement of an operation's effect rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// The unit the posting applies to.
    pub party: Party,
    /// The balance field moved.
    pub field: BalanceField,
    /// Withdraw or deposit.
    pub direction: Direction,
}

/// The full effect of an operation type, as pure data.
#[derive(Debug, Clone, Copy)]
pub struct EffectRule {
    /// Balance movements, all by the operation amount.
    pub postings: &'static [Posting],
    /// Whether a non-empty comment is mandatory.
    pub requires_comment: bool,
    /// Report classification.
    pub class: FlowClass,
}

impl EffectRule {
    /// Returns true if the rule posts to the source unit.
    #[must_use]
    pub fn needs_source(&self) -> bool {
        self.postings.iter().any(|p| p.party == Party::Source)
    }

    /// Returns true if the rule posts to a target unit.
    #[must_use]
    pub fn needs_target(&self) -> bool {
        self.postings.iter().any(|p| p.party == Party::Target)
    }

    /// The source-unit field whose post-operation value is reported back
    /// to the caller: the field the source unit receives into, or failing
    /// that the field it pays from.
    #[must_use]
    pub fn primary_field(&self) -> BalanceField {
        self.postings
            .iter()
            .find(|p| p.party == Party::Source && p.direction == Direction::Deposit)
            .or_else(|| self.postings.iter().find(|p| p.party == Party::Source))
            .map_or(BalanceField::Cash, |p| p.field)
    }
}

/// The operation catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    /// Business purchase, paid from unit cash.
    Zakup,
    /// Outside expense, paid from unit cash; comment required.
    Storonnie,
    /// Monthly income onto the settlement account.
    PrihodMes,
    /// Fast income into unit cash.
    PrihodFast,
    /// Outside income into unit cash; comment required.
    PrihodSto,
    /// Withdraw settlement account into cash.
    SnyatRs,
    /// Withdraw debit card into cash.
    SnyatDebit,
    /// Deposit cash onto the settlement account.
    VnestiRs,
    /// Lend cash to another unit; opens or grows a debt.
    Odolzhit,
    /// Repay a debt; only reachable through the debt ledger.
    Pogasit,
}

impl OpType {
    /// All catalog members, in display order.
    pub const ALL: [Self; 10] = [
        Self::Zakup,
        Self::Storonnie,
        Self::PrihodMes,
        Self::PrihodFast,
        Self::PrihodSto,
        Self::SnyatRs,
        Self::SnyatDebit,
        Self::VnestiRs,
        Self::Odolzhit,
        Self::Pogasit,
    ];

    /// Parses the wire name of an operation type.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "zakup" => Some(Self::Zakup),
            "storonnie" => Some(Self::Storonnie),
            "prihod_mes" => Some(Self::PrihodMes),
            "prihod_fast" => Some(Self::PrihodFast),
            "prihod_sto" => Some(Self::PrihodSto),
            "snyat_rs" => Some(Self::SnyatRs),
            "snyat_debit" => Some(Self::SnyatDebit),
            "vnesti_rs" => Some(Self::VnestiRs),
            "odolzhit" => Some(Self::Odolzhit),
            "pogasit" => Some(Self::Pogasit),
            _ => None,
        }
    }

    /// The wire name of the operation type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zakup => "zakup",
            Self::Storonnie => "storonnie",
            Self::PrihodMes => "prihod_mes",
            Self::PrihodFast => "prihod_fast",
            Self::PrihodSto => "prihod_sto",
            Self::SnyatRs => "snyat_rs",
            Self::SnyatDebit => "snyat_debit",
            Self::VnestiRs => "vnesti_rs",
            Self::Odolzhit => "odolzhit",
            Self::Pogasit => "pogasit",
        }
    }

    /// Human-readable label, as shown in the history feed.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zakup => "🛒 Закуп",
            Self::Storonnie => "💸 Посторонние траты",
            Self::PrihodMes => "📥 Приход ежемесячный",
            Self::PrihodFast => "⚡ Приход быстрый",
            Self::PrihodSto => "🏦 Приход сторонний",
            Self::SnyatRs => "💴 Снять с Р/С → Нал",
            Self::SnyatDebit => "💵 Снять с Дебета → Нал",
            Self::VnestiRs => "🏛 Внести на Р/С",
            Self::Odolzhit => "🤝 Одолжить",
            Self::Pogasit => "✅ Погашение долга",
        }
    }

    /// The effect rule for this operation type.
    #[must_use]
    pub fn rule(self) -> &'static EffectRule {
        match self {
            Self::Zakup => &ZAKUP_RULE,
            Self::Storonnie => &STORONNIE_RULE,
            Self::PrihodMes => &PRIHOD_MES_RULE,
            Self::PrihodFast => &PRIHOD_FAST_RULE,
            Self::PrihodSto => &PRIHOD_STO_RULE,
            Self::SnyatRs => &SNYAT_RS_RULE,
            Self::SnyatDebit => &SNYAT_DEBIT_RULE,
            Self::VnestiRs => &VNESTI_RS_RULE,
            Self::Odolzhit => &ODOLZHIT_RULE,
            Self::Pogasit => &POGASIT_RULE,
        }
    }

    /// Report classification of this operation type.
    #[must_use]
    pub fn class(self) -> FlowClass {
        self.rule().class
    }
}

const fn take(party: Party, field: BalanceField) -> Posting {
    Posting {
        party,
        field,
        direction: Direction::Withdraw,
    }
}

const fn give(party: Party, field: BalanceField) -> Posting {
    Posting {
        party,
        field,
        direction: Direction::Deposit,
    }
}

static ZAKUP_RULE: EffectRule = EffectRule {
    postings: &[take(Party::Source, BalanceField::Cash)],
    requires_comment: false,
    class: FlowClass::Expense,
};

static STORONNIE_RULE: EffectRule = EffectRule {
    postings: &[take(Party::Source, BalanceField::Cash)],
    requires_comment: true,
    class: FlowClass::Expense,
};

static PRIHOD_MES_RULE: EffectRule = EffectRule {
    postings: &[give(Party::Source, BalanceField::Bank)],
    requires_comment: false,
    class: FlowClass::Income,
};

static PRIHOD_FAST_RULE: EffectRule = EffectRule {
    postings: &[give(Party::Source, BalanceField::Cash)],
    requires_comment: false,
    class: FlowClass::Income,
};

static PRIHOD_STO_RULE: EffectRule = EffectRule {
    postings: &[give(Party::Source, BalanceField::Cash)],
    requires_comment: true,
    class: FlowClass::Income,
};

static SNYAT_RS_RULE: EffectRule = EffectRule {
    postings: &[
        take(Party::Source, BalanceField::Bank),
        give(Party::Source, BalanceField::Cash),
    ],
    requires_comment: false,
    class: FlowClass::Transfer,
};

static SNYAT_DEBIT_RULE: EffectRule = EffectRule {
    postings: &[
        take(Party::Source, BalanceField::Debit),
        give(Party::Source, BalanceField::Cash),
    ],
    requires_comment: false,
    class: FlowClass::Transfer,
};

static VNESTI_RS_RULE: EffectRule = EffectRule {
    postings: &[
        take(Party::Source, BalanceField::Cash),
        give(Party::Source, BalanceField::Bank),
    ],
    requires_comment: false,
    class: FlowClass::Transfer,
};

static ODOLZHIT_RULE: EffectRule = EffectRule {
    postings: &[
        take(Party::Source, BalanceField::Cash),
        give(Party::Target, BalanceField::Cash),
    ],
    requires_comment: false,
    class: FlowClass::Debt,
};

static POGASIT_RULE: EffectRule = EffectRule {
    postings: &[
        take(Party::Source, BalanceField::Cash),
        give(Party::Target, BalanceField::Cash),
    ],
    requires_comment: false,
    class: FlowClass::Debt,
};

/// Label lookup for raw transaction-log type strings.
///
/// Falls back to the raw string for types outside the catalog, so history
/// rendering never breaks on old or administrative entries.
#[must_use]
pub fn label_for(raw: &str) -> &str {
    if raw == ADJUSTMENT_TYPE {
        return "🛠 Корректировка балансов";
    }
    OpType::parse(raw).map_or(raw, |op| op.label())
}
