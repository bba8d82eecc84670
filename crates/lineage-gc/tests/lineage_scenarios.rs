//! End-to-end collection scenarios driven through the service and the
//! in-memory adapters, using content-hashed transactions.

use std::sync::Arc;

use lineage_gc::{
    FileRecordStore, GcConfig, InMemoryLedger, InMemoryRecordStore, LedgerGcApi, LedgerGcService,
};
use shared_types::{LedgerTransaction, TxId};

fn service(ledger: &Arc<InMemoryLedger>) -> LedgerGcService {
    let config = GcConfig {
        verify_result: true,
        ..Default::default()
    };
    LedgerGcService::with_config(
        config,
        ledger.clone(),
        ledger.clone(),
        Arc::new(InMemoryRecordStore::new()),
    )
}

fn sorted(mut ids: Vec<TxId>) -> Vec<TxId> {
    ids.sort_unstable();
    ids
}

async fn collectible(service: &LedgerGcService) -> Vec<TxId> {
    service
        .collect_garbage()
        .await
        .expect("collection should succeed")
        .result
        .collectible_transactions
}

/// Issue, spend, exhaust, then a second chain that is reissued and exhausted.
#[tokio::test]
async fn test_issue_spend_reissue_lifecycle() {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = service(&ledger);

    // T1 issues a, b to the same owner
    let t1 = LedgerTransaction::issue(2, b"owner=alice;amount=10,5");
    ledger.append(t1.clone());
    assert!(collectible(&service).await.is_empty());

    // T2 consumes a, produces c, d
    let t2 = LedgerTransaction::new(vec![t1.id.output(0)], 2, b"split");
    ledger.append(t2.clone());
    assert!(collectible(&service).await.is_empty());

    // T3 consumes b, produces nothing
    let t3 = LedgerTransaction::new(vec![t1.id.output(1)], 0, b"burn b");
    ledger.append(t3.clone());
    assert!(collectible(&service).await.is_empty());

    // T4 consumes c
    let t4 = LedgerTransaction::new(vec![t2.id.output(0)], 0, b"burn c");
    ledger.append(t4.clone());
    assert!(collectible(&service).await.is_empty());

    // T5 consumes d: nothing unspent anywhere
    let t5 = LedgerTransaction::new(vec![t2.id.output(1)], 0, b"burn d");
    ledger.append(t5.clone());
    let first_chain = sorted(vec![t1.id, t2.id, t3.id, t4.id, t5.id]);
    assert_eq!(collectible(&service).await, first_chain);

    // T6 issues e
    let t6 = LedgerTransaction::issue(1, b"owner=bob;amount=1");
    ledger.append(t6.clone());
    assert_eq!(collectible(&service).await, first_chain);

    // T7 consumes e, reissues e'
    let t7 = LedgerTransaction::new(vec![t6.id.output(0)], 1, b"reissue");
    ledger.append(t7.clone());
    let result = collectible(&service).await;
    assert_eq!(result, first_chain);
    assert!(!result.contains(&t6.id));

    // T8 consumes e'
    let t8 = LedgerTransaction::new(vec![t7.id.output(0)], 0, b"burn e'");
    ledger.append(t8.clone());
    let everything = sorted(vec![
        t1.id, t2.id, t3.id, t4.id, t5.id, t6.id, t7.id, t8.id,
    ]);
    assert_eq!(collectible(&service).await, everything);
}

/// Deleting the first exhausted chain must not disturb later collections.
#[tokio::test]
async fn test_collection_after_partial_history_pruned() {
    let ledger = Arc::new(InMemoryLedger::new());
    let service = service(&ledger);

    let dead = LedgerTransaction::issue(1, b"dead");
    let dead_spend = LedgerTransaction::new(vec![dead.id.output(0)], 0, b"dead spend");
    let live = LedgerTransaction::issue(1, b"live");
    let live_spend = LedgerTransaction::new(vec![live.id.output(0)], 1, b"live spend");
    for tx in [&dead, &dead_spend, &live, &live_spend] {
        ledger.append(tx.clone());
    }

    let report = service.run_full_cycle().await.unwrap();
    assert_eq!(report.deleted_count, 2);
    assert_eq!(ledger.len(), 2);

    // Exhausting the surviving chain makes all three collectible
    let tail = LedgerTransaction::new(vec![live_spend.id.output(0)], 0, b"tail");
    ledger.append(tail.clone());
    let report = service.run_full_cycle().await.unwrap();
    assert_eq!(report.deleted_count, 3);
    assert!(ledger.is_empty());
}

/// A consumer whose producer was pruned in an earlier pass is handled.
#[tokio::test]
async fn test_dangling_history_is_tolerated() {
    let pruned_producer = LedgerTransaction::issue(2, b"already gone");
    let keeper = LedgerTransaction::new(vec![pruned_producer.id.output(0)], 1, b"keeper");
    let ender = LedgerTransaction::new(vec![pruned_producer.id.output(1)], 0, b"ender");
    let ledger = Arc::new(InMemoryLedger::with_transactions(vec![
        keeper.clone(),
        ender.clone(),
    ]));

    let result = collectible(&service(&ledger)).await;
    assert_eq!(result, vec![ender.id]);
}

/// Pending record survives on disk between schedule and apply.
#[tokio::test]
async fn test_pending_record_on_disk() {
    let dir = std::env::temp_dir().join(format!("lineage-gc-it-{}", uuid::Uuid::new_v4()));
    let records = Arc::new(FileRecordStore::new(dir.join("pending.rec")));

    let issue = LedgerTransaction::issue(1, b"x");
    let spend = LedgerTransaction::new(vec![issue.id.output(0)], 0, b"y");
    let ledger = Arc::new(InMemoryLedger::with_transactions(vec![
        issue.clone(),
        spend.clone(),
    ]));

    let scheduler = LedgerGcService::new(ledger.clone(), ledger.clone(), records.clone());
    let report = scheduler.schedule_collection().await.unwrap();
    assert_eq!(report.result.len(), 2);
    assert!(records.path().exists());

    // A fresh service instance picks the record up
    let applier = LedgerGcService::new(ledger.clone(), ledger.clone(), records.clone());
    let (applied, deleted) = applier.apply_pending_collection().await.unwrap();
    assert_eq!(applied, report.result);
    assert_eq!(deleted, 2);
    assert!(ledger.is_empty());
    assert!(!records.path().exists());

    let _ = std::fs::remove_dir_all(dir);
}
