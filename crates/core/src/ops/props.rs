//! Property tests for the effect-rule invariants.

use proptest::prelude::*;

use super::service::{OperationRequest, OperationService, UnitBalances};
use super::types::{FlowClass, OpType};

fn funded_unit(id: i32, amount: i64) -> UnitBalances {
    // Every field holds enough for one withdrawal of `amount`.
    UnitBalances {
        id,
        bank: amount,
        cash: amount,
        debit: amount,
    }
}

fn single_unit_ops() -> impl Strategy<Value = OpType> {
    prop_oneof![
        Just(OpType::Zakup),
        Just(OpType::Storonnie),
        Just(OpType::PrihodMes),
        Just(OpType::PrihodFast),
        Just(OpType::PrihodSto),
        Just(OpType::SnyatRs),
        Just(OpType::SnyatDebit),
        Just(OpType::VnestiRs),
    ]
}

proptest! {
    /// Internal transfers and debt moves never change the system total;
    /// incomes add exactly the amount and expenses remove exactly it.
    #[test]
    fn system_total_follows_flow_class(
        op in single_unit_ops(),
        amount in 1i64..1_000_000,
    ) {
        let source = funded_unit(1, amount);
        let req = OperationRequest {
            op_type: op,
            amount,
            unit_id: Some(1),
            target_unit_id: None,
            comment: Some("проверка".to_string()),
        };

        let resolved = OperationService::resolve(&req, Some(&source), None).unwrap();
        let total: i64 = resolved.deltas.iter().map(|d| d.delta).sum();

        let expected = match op.class() {
            FlowClass::Income => amount,
            FlowClass::Expense => -amount,
            FlowClass::Transfer | FlowClass::Debt => 0,
        };
        prop_assert_eq!(total, expected);
    }

    /// Lending conserves the system total and books the full amount as debt.
    #[test]
    fn lending_conserves_total(amount in 1i64..1_000_000, extra in 0i64..1_000_000) {
        let source = funded_unit(1, amount + extra);
        let target = funded_unit(2, 0);
        let req = OperationRequest {
            op_type: OpType::Odolzhit,
            amount,
            unit_id: Some(1),
            target_unit_id: Some(2),
            comment: None,
        };

        let resolved = OperationService::resolve(&req, Some(&source), Some(&target)).unwrap();
        let total: i64 = resolved.deltas.iter().map(|d| d.delta).sum();
        prop_assert_eq!(total, 0);
    }

    /// A withdrawal never resolves when the field holds less than the amount.
    #[test]
    fn insufficiency_always_rejects(amount in 1i64..1_000_000, shortfall in 1i64..1_000) {
        let source = UnitBalances {
            id: 1,
            bank: 0,
            cash: amount - shortfall.min(amount),
            debit: 0,
        };
        let req = OperationRequest {
            op_type: OpType::Zakup,
            amount,
            unit_id: Some(1),
            target_unit_id: None,
            comment: None,
        };

        prop_assert!(OperationService::resolve(&req, Some(&source), None).is_err());
    }
}
