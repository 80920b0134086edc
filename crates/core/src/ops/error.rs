//! Ledger operation error types.
//!
//! One variant per taxonomy entry: validation failures, missing
//! references, insufficiency, and debt-ledger constraint violations.
//! Every error aborts the whole operation; no partial state is committed.

use thiserror::Error;

use super::types::BalanceField;

/// Errors that can occur while validating or applying an operation.
#[derive(Debug, Error)]
pub enum OpError {
    // ========== Validation Errors ==========
    /// The operation type is not a catalog member.
    #[error("Неизвестный тип операции: {0}")]
    UnknownType(String),

    /// The amount is zero or negative.
    #[error("Сумма должна быть больше нуля")]
    InvalidAmount,

    /// The operation needs a source unit but none was given.
    #[error("Операция {0} требует указать ИП")]
    UnitRequired(&'static str),

    /// The operation needs a target unit but none was given.
    #[error("Операция {0} требует указать ИП-получателя")]
    TargetRequired(&'static str),

    /// Source and target units are the same.
    #[error("ИП-источник и ИП-получатель должны различаться")]
    SelfTransfer,

    /// The operation needs a non-empty comment.
    #[error("Операция {0} требует комментарий")]
    CommentRequired(&'static str),

    /// Repayments must go through the debt ledger endpoint.
    #[error("Погашение долга проводится через список долгов")]
    DirectRepayment,

    // ========== Reference Errors ==========
    /// No such business unit.
    #[error("ИП {0} не найдено")]
    UnitNotFound(i32),

    /// No such debt.
    #[error("Долг {0} не найден")]
    DebtNotFound(i32),

    // ========== Funds Errors ==========
    /// A withdrawn balance field holds less than the amount.
    #[error("Недостаточно средств ({field}): доступно {available} ₽, требуется {required} ₽")]
    InsufficientFunds {
        /// The balance field that came up short.
        field: BalanceField,
        /// The current field value.
        available: i64,
        /// The amount the operation needed.
        required: i64,
    },

    /// A repayment is larger than the outstanding debt.
    #[error("Погашение {requested} ₽ превышает остаток долга {outstanding} ₽")]
    ExceedsDebt {
        /// The repayment amount requested.
        requested: i64,
        /// The outstanding debt amount.
        outstanding: i64,
    },

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Ошибка базы данных: {0}")]
    Database(String),
}

impl OpError {
    /// Returns the error code for logs and diagnostics.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType(_) => "UNKNOWN_OP_TYPE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::UnitRequired(_) => "UNIT_REQUIRED",
            Self::TargetRequired(_) => "TARGET_REQUIRED",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::CommentRequired(_) => "COMMENT_REQUIRED",
            Self::DirectRepayment => "DIRECT_REPAYMENT",
            Self::UnitNotFound(_) => "UNIT_NOT_FOUND",
            Self::DebtNotFound(_) => "DEBT_NOT_FOUND",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::ExceedsDebt { .. } => "EXCEEDS_DEBT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Insufficiency is 400 and malformed input 422, matching the original
    /// service's mapping; a debt addressed by URL that does not exist is
    /// 404.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientFunds { .. } | Self::ExceedsDebt { .. } => 400,

            Self::UnknownType(_)
            | Self::InvalidAmount
            | Self::UnitRequired(_)
            | Self::TargetRequired(_)
            | Self::SelfTransfer
            | Self::CommentRequired(_)
            | Self::DirectRepayment
            | Self::UnitNotFound(_) => 422,

            Self::DebtNotFound(_) => 404,

            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            OpError::UnknownType("x".into()).error_code(),
            "UNKNOWN_OP_TYPE"
        );
        assert_eq!(OpError::InvalidAmount.error_code(), "INVALID_AMOUNT");
        assert_eq!(
            OpError::InsufficientFunds {
                field: BalanceField::Cash,
                available: 1,
                required: 2,
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            OpError::ExceedsDebt {
                requested: 2,
                outstanding: 1,
            }
            .error_code(),
            "EXCEEDS_DEBT"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(OpError::InvalidAmount.http_status_code(), 422);
        assert_eq!(OpError::UnitNotFound(1).http_status_code(), 422);
        assert_eq!(OpError::DebtNotFound(1).http_status_code(), 404);
        assert_eq!(
            OpError::InsufficientFunds {
                field: BalanceField::Bank,
                available: 0,
                required: 1,
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            OpError::ExceedsDebt {
                requested: 2,
                outstanding: 1,
            }
            .http_status_code(),
            400
        );
        assert_eq!(OpError::Database("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_insufficient_funds_display() {
        let err = OpError::InsufficientFunds {
            field: BalanceField::Cash,
            available: 9_999,
            required: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "Недостаточно средств (cash): доступно 9999 ₽, требуется 10000 ₽"
        );
    }
}
