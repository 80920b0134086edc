//! Operation validation and resolution.
//!
//! This module is the pure half of the Operation Processor: it checks an
//! incoming request against the catalog and current balance snapshots and
//! resolves it into the exact balance deltas and debt effect to apply.
//! Persisting those effects atomically is the repository layer's job.

use super::error::OpError;
use super::types::{BalanceField, Direction, EffectRule, OpType, Party};

/// An incoming operation request, already parsed to a catalog member.
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// The operation type.
    pub op_type: OpType,
    /// Amount in whole rubles; must be positive.
    pub amount: i64,
    /// Source business unit.
    pub unit_id: Option<i32>,
    /// Target business unit for loans.
    pub target_unit_id: Option<i32>,
    /// Free-form comment; mandatory for some operation types.
    pub comment: Option<String>,
}

/// A snapshot of one unit's balances, used for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitBalances {
    /// Unit id.
    pub id: i32,
    /// Settlement account balance.
    pub bank: i64,
    /// Cash balance.
    pub cash: i64,
    /// Debit card balance.
    pub debit: i64,
}

impl UnitBalances {
    /// Returns the value of one balance field.
    #[must_use]
    pub const fn get(&self, field: BalanceField) -> i64 {
        match field {
            BalanceField::Bank => self.bank,
            BalanceField::Cash => self.cash,
            BalanceField::Debit => self.debit,
        }
    }
}

/// One signed balance mutation to apply to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceDelta {
    /// The unit whose balance moves.
    pub unit_id: i32,
    /// The balance field.
    pub field: BalanceField,
    /// Signed amount; negative deltas require sufficiency.
    pub delta: i64,
}

/// Reference to one balance field of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceRef {
    /// Unit id.
    pub unit_id: i32,
    /// Balance field.
    pub field: BalanceField,
}

/// Debt-ledger side effect of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtEffect {
    /// Open or grow the debt for the ordered (creditor, debtor) pair.
    Lend {
        /// The lending unit.
        creditor_unit_id: i32,
        /// The borrowing unit.
        debtor_unit_id: i32,
        /// Amount added to the debt.
        amount: i64,
    },
    /// Shrink an existing debt, deleting it when it reaches zero.
    Settle {
        /// The debt record.
        debt_id: i32,
        /// Amount taken off the debt.
        amount: i64,
    },
}

/// A debt record as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtView {
    /// Debt id.
    pub id: i32,
    /// The unit that is owed.
    pub creditor_unit_id: i32,
    /// The unit that owes.
    pub debtor_unit_id: i32,
    /// Outstanding amount.
    pub amount: i64,
}

/// A fully validated operation, ready to be applied atomically.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    /// The operation type recorded in the log.
    pub op_type: OpType,
    /// Operation amount.
    pub amount: i64,
    /// Source unit recorded in the log.
    pub unit_id: Option<i32>,
    /// Target unit recorded in the log.
    pub target_unit_id: Option<i32>,
    /// Normalized (trimmed) comment.
    pub comment: Option<String>,
    /// Balance mutations to apply.
    pub deltas: Vec<BalanceDelta>,
    /// Debt-ledger mutation to apply, if any.
    pub debt: Option<DebtEffect>,
    /// The balance whose post-operation value is returned to the caller.
    pub primary: BalanceRef,
}

/// Pure validation and resolution for ledger operations.
pub struct OperationService;

impl OperationService {
    /// Validates a submitted operation and resolves its effects.
    ///
    /// `source` and `target` are the balance snapshots for the referenced
    /// units, or `None` when the referenced unit does not exist. The checks
    /// run in contract order; the first failure wins and nothing is applied.
    ///
    /// `pogasit` is rejected here: repayments are constrained operations
    /// that must come through [`Self::resolve_repayment`] so they cannot
    /// bypass the debt ledger.
    ///
    /// # Errors
    ///
    /// Returns an `OpError` describing the first failed validation step.
    pub fn resolve(
        req: &OperationRequest,
        source: Option<&UnitBalances>,
        target: Option<&UnitBalances>,
    ) -> Result<ResolvedOperation, OpError> {
        if req.op_type == OpType::Pogasit {
            return Err(OpError::DirectRepayment);
        }
        if req.amount <= 0 {
            return Err(OpError::InvalidAmount);
        }

        let rule = req.op_type.rule();

        let unit_id = req
            .unit_id
            .ok_or(OpError::UnitRequired(req.op_type.as_str()))?;
        let source = source.ok_or(OpError::UnitNotFound(unit_id))?;

        let target = if rule.needs_target() {
            let target_id = req
                .target_unit_id
                .ok_or(OpError::TargetRequired(req.op_type.as_str()))?;
            if target_id == unit_id {
                return Err(OpError::SelfTransfer);
            }
            Some(target.ok_or(OpError::UnitNotFound(target_id))?)
        } else {
            None
        };

        let comment = normalize_comment(req.comment.as_deref());
        if rule.requires_comment && comment.is_none() {
            return Err(OpError::CommentRequired(req.op_type.as_str()));
        }

        let deltas = build_deltas(rule, req.amount, source, target)?;
        let debt = match req.op_type {
            OpType::Odolzhit => Some(DebtEffect::Lend {
                creditor_unit_id: source.id,
                debtor_unit_id: target.map_or(unit_id, |t| t.id),
                amount: req.amount,
            }),
            _ => None,
        };

        Ok(ResolvedOperation {
            op_type: req.op_type,
            amount: req.amount,
            unit_id: Some(source.id),
            target_unit_id: target.map(|t| t.id),
            comment,
            deltas,
            debt,
            primary: BalanceRef {
                unit_id: source.id,
                field: rule.primary_field(),
            },
        })
    }

    /// Validates a debt repayment and resolves it as a constrained
    /// `pogasit` operation: debtor cash to creditor cash plus the debt
    /// decrement, all in one atomic unit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount`, `ExceedsDebt`, or `InsufficientFunds`.
    pub fn resolve_repayment(
        debt: &DebtView,
        debtor: &UnitBalances,
        creditor: &UnitBalances,
        amount: i64,
    ) -> Result<ResolvedOperation, OpError> {
        if amount <= 0 {
            return Err(OpError::InvalidAmount);
        }
        if amount > debt.amount {
            return Err(OpError::ExceedsDebt {
                requested: amount,
                outstanding: debt.amount,
            });
        }

        let rule = OpType::Pogasit.rule();
        let deltas = build_deltas(rule, amount, debtor, Some(creditor))?;

        Ok(ResolvedOperation {
            op_type: OpType::Pogasit,
            amount,
            unit_id: Some(debtor.id),
            target_unit_id: Some(creditor.id),
            comment: Some(format!("Погашение долга #{}", debt.id)),
            deltas,
            debt: Some(DebtEffect::Settle {
                debt_id: debt.id,
                amount,
            }),
            primary: BalanceRef {
                unit_id: debtor.id,
                field: rule.primary_field(),
            },
        })
    }
}

fn normalize_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToOwned::to_owned)
}

/// Walks the effect rule's postings, checking withdraw sufficiency against
/// the snapshots and producing the signed deltas.
fn build_deltas(
    rule: &EffectRule,
    amount: i64,
    source: &UnitBalances,
    target: Option<&UnitBalances>,
) -> Result<Vec<BalanceDelta>, OpError> {
    let mut deltas = Vec::with_capacity(rule.postings.len());

    for posting in rule.postings {
        let unit = match posting.party {
            Party::Source => source,
            Party::Target => target.unwrap_or(source),
        };
        let delta = match posting.direction {
            Direction::Deposit => amount,
            Direction::Withdraw => {
                let available = unit.get(posting.field);
                if available < amount {
                    return Err(OpError::InsufficientFunds {
                        field: posting.field,
                        available,
                        required: amount,
                    });
                }
                -amount
            }
        };
        deltas.push(BalanceDelta {
            unit_id: unit.id,
            field: posting.field,
            delta,
        });
    }

    Ok(deltas)
}
