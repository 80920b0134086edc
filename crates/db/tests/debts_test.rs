//! Debt ledger behavior: accumulation, repayment, and deletion at zero.

mod common;

use kassa_core::ops::{OpError, OpType, OperationRequest};
use kassa_db::repositories::{DebtRepository, OperationRepository};

use common::{all_debts, all_log_rows, reload_unit, seed_unit, seed_user, setup_db};

const ACTOR: i64 = 1000;

fn loan(amount: i64, from: i32, to: i32) -> OperationRequest {
    OperationRequest {
        op_type: OpType::Odolzhit,
        amount,
        unit_id: Some(from),
        target_unit_id: Some(to),
        comment: None,
    }
}

#[tokio::test]
async fn test_repeated_loans_accumulate_into_one_debt() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 0).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(1_000, a.id, b.id)).await.unwrap();
    ops.submit(ACTOR, loan(2_000, a.id, b.id)).await.unwrap();

    let debts = all_debts(&db).await;
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].amount, 3_000);
    assert_eq!(reload_unit(&db, a.id).await.cash_balance, 7_000);
    assert_eq!(reload_unit(&db, b.id).await.cash_balance, 3_000);
}

#[tokio::test]
async fn test_opposite_directions_are_separate_debts() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 10_000).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(1_000, a.id, b.id)).await.unwrap();
    ops.submit(ACTOR, loan(500, b.id, a.id)).await.unwrap();

    let debts = all_debts(&db).await;
    assert_eq!(debts.len(), 2);
}

#[tokio::test]
async fn test_full_repayment_deletes_the_debt() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 0).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(5_000, a.id, b.id)).await.unwrap();
    let debt_id = all_debts(&db).await[0].id;

    ops.repay(ACTOR, debt_id, 2_000).await.unwrap();
    assert_eq!(all_debts(&db).await[0].amount, 3_000);

    ops.repay(ACTOR, debt_id, 3_000).await.unwrap();
    assert!(all_debts(&db).await.is_empty());

    // The repayments are on the log with the generated comment.
    let log = all_log_rows(&db).await;
    let repayments: Vec<_> = log.iter().filter(|t| t.tx_type == "pogasit").collect();
    assert_eq!(repayments.len(), 2);
    assert_eq!(
        repayments[0].comment.as_deref(),
        Some(format!("Погашение долга #{debt_id}").as_str())
    );

    // Money went round-trip: everything is back with the creditor.
    assert_eq!(reload_unit(&db, a.id).await.cash_balance, 10_000);
    assert_eq!(reload_unit(&db, b.id).await.cash_balance, 0);
}

#[tokio::test]
async fn test_over_repayment_is_rejected_without_side_effects() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 10_000).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(5_000, a.id, b.id)).await.unwrap();
    let debt_id = all_debts(&db).await[0].id;

    let result = ops.repay(ACTOR, debt_id, 5_001).await;
    assert!(matches!(
        result,
        Err(OpError::ExceedsDebt {
            requested: 5_001,
            outstanding: 5_000,
        })
    ));

    assert_eq!(all_debts(&db).await[0].amount, 5_000);
    assert_eq!(reload_unit(&db, a.id).await.cash_balance, 5_000);
    assert_eq!(reload_unit(&db, b.id).await.cash_balance, 15_000);
}

#[tokio::test]
async fn test_repaying_unknown_debt_is_rejected() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let ops = OperationRepository::new(db.clone());

    let result = ops.repay(ACTOR, 404, 1_000).await;
    assert!(matches!(result, Err(OpError::DebtNotFound(404))));
}

#[tokio::test]
async fn test_repayment_needs_debtor_cash() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 0).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(5_000, a.id, b.id)).await.unwrap();
    let debt_id = all_debts(&db).await[0].id;

    // Drain the debtor's cash, then try to repay more than remains.
    ops.submit(
        ACTOR,
        OperationRequest {
            op_type: OpType::Zakup,
            amount: 4_500,
            unit_id: Some(b.id),
            target_unit_id: None,
            comment: None,
        },
    )
    .await
    .unwrap();

    let result = ops.repay(ACTOR, debt_id, 1_000).await;
    assert!(matches!(
        result,
        Err(OpError::InsufficientFunds {
            available: 500,
            required: 1_000,
            ..
        })
    ));
    assert_eq!(all_debts(&db).await[0].amount, 5_000);
}

#[tokio::test]
async fn test_repayment_rejects_non_positive_amounts() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 0).await;
    let ops = OperationRepository::new(db.clone());

    ops.submit(ACTOR, loan(5_000, a.id, b.id)).await.unwrap();
    let debt_id = all_debts(&db).await[0].id;

    for amount in [0, -100] {
        let result = ops.repay(ACTOR, debt_id, amount).await;
        assert!(matches!(result, Err(OpError::InvalidAmount)));
    }
    assert_eq!(all_debts(&db).await[0].amount, 5_000);
}

#[tokio::test]
async fn test_list_open_returns_only_outstanding_debts() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let a = seed_unit(&db, "Альфа", 0, 10_000).await;
    let b = seed_unit(&db, "Бета", 0, 10_000).await;
    let ops = OperationRepository::new(db.clone());
    let debts = DebtRepository::new(db.clone());

    ops.submit(ACTOR, loan(1_000, a.id, b.id)).await.unwrap();
    ops.submit(ACTOR, loan(2_000, b.id, a.id)).await.unwrap();

    let open = debts.list_open().await.unwrap();
    assert_eq!(open.len(), 2);

    let first = open[0].id;
    ops.repay(ACTOR, first, open[0].amount).await.unwrap();

    let open = debts.list_open().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_ne!(open[0].id, first);
}
