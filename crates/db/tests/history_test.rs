//! Transaction history queries: ordering, limits, report windows.

mod common;

use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};

use kassa_core::ops::{OpType, OperationRequest};
use kassa_core::report::Period;
use kassa_db::entities::transactions;
use kassa_db::repositories::{OperationRepository, TransactionRepository};

use common::{seed_unit, seed_user, setup_db};

const ACTOR: i64 = 1000;

#[tokio::test]
async fn test_list_recent_is_newest_first_and_limited() {
    let db = setup_db().await;
    seed_user(&db, ACTOR).await;
    let unit = seed_unit(&db, "Альфа", 0, 0).await;
    let ops = OperationRepository::new(db.clone());

    for amount in [1_000, 2_000, 3_000] {
        ops.submit(
            ACTOR,
            OperationRequest {
                op_type: OpType::PrihodFast,
                amount,
                unit_id: Some(unit.id),
                target_unit_id: None,
                comment: None,
            },
        )
        .await
        .unwrap();
    }

    let recent = TransactionRepository::new(db.clone())
        .list_recent(2)
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].amount, 3_000);
    assert_eq!(recent[1].amount, 2_000);
}

#[tokio::test]
async fn test_list_since_filters_by_window() {
    let db = setup_db().await;
    let user = seed_user(&db, ACTOR).await;
    let unit = seed_unit(&db, "Альфа", 0, 0).await;

    // One old row outside the month window, one fresh row inside it.
    for (amount, age_days) in [(1_000, 45), (2_000, 3)] {
        let row = transactions::ActiveModel {
            user_id: Set(user.id),
            unit_id: Set(Some(unit.id)),
            target_unit_id: Set(None),
            tx_type: Set(OpType::PrihodFast.as_str().to_owned()),
            amount: Set(amount),
            comment: Set(None),
            created_at: Set(Utc::now() - Duration::days(age_days)),
            ..Default::default()
        };
        row.insert(&db).await.unwrap();
    }

    let history = TransactionRepository::new(db.clone());

    let month = history
        .list_since(Period::Month.start(Utc::now()))
        .await
        .unwrap();
    assert_eq!(month.len(), 1);
    assert_eq!(month[0].amount, 2_000);

    let all = history
        .list_since(Period::All.start(Utc::now()))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
