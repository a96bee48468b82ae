//! End-to-end checks: ledger operations through `SharedLedger`, persisted and
//! restored through the snapshot codec and the file helpers.

use std::fs;
use std::path::PathBuf;

use proptest::prelude::*;

use stockledger_core::LedgerError;
use stockledger_infra::{LedgerConfig, SharedLedger, SnapshotError, snapshot};
use stockledger_inventory::{LedgerStore, RandomTokenSource, Reservation};

const CHAIR: &str = "00abcdef";
const TABLE: &str = "01234567";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "stockledger-it-{name}-{}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn seeded_ledger(seed: u64) -> SharedLedger {
    SharedLedger::from_config(&LedgerConfig {
        token_seed: Some(seed),
        ..LedgerConfig::default()
    })
}

#[test]
fn worked_example_survives_a_file_round_trip() {
    stockledger_observability::init();
    let ledger = seeded_ledger(1);

    ledger
        .add_stock_with_details(10, "AcmeCo", "Lounger", CHAIR, 2023, 6, "blue velvet")
        .unwrap();
    ledger.set_price(CHAIR, 500).unwrap();
    ledger.sell(3, CHAIR).unwrap();
    let token = ledger.reserve(2, CHAIR).unwrap();

    assert_eq!(ledger.total_units_of(CHAIR).unwrap(), 7);
    assert_eq!(ledger.reserved_units(), 2);
    assert_eq!(ledger.reserved_value(), 1000);
    assert_eq!(ledger.total_revenue(), 1500);

    let dir = scratch_dir("worked-example");
    let config = LedgerConfig {
        snapshot_path: dir.join("ledger.snapshot"),
        token_seed: Some(2),
    };
    ledger.save_to_path(&config.snapshot_path).unwrap();

    let restored = SharedLedger::from_config(&config);
    restored.reload().unwrap();
    assert_eq!(restored.snapshot(), ledger.snapshot());
    assert_eq!(restored.details(CHAIR).unwrap(), "blue velvet");

    // The restored reservation is live: its token settles at the frozen price.
    restored.finalize_reservation(token).unwrap();
    assert_eq!(restored.units_sold_of(CHAIR).unwrap(), 5);
    assert_eq!(restored.revenue_of(CHAIR).unwrap(), 2500);
    assert_eq!(restored.reserved_units(), 0);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn failed_load_leaves_the_shared_ledger_empty() {
    let ledger = seeded_ledger(3);
    ledger.add_stock(4, "BeanWorks", "Pouf", TABLE, 2021, 12).unwrap();

    let err = ledger.load(&[0u8, 1, 2][..]).unwrap_err();
    assert!(matches!(err, SnapshotError::Io(_)), "got {err:?}");
    assert_eq!(ledger.distinct_item_count(), 0);
    assert_eq!(
        ledger.total_units_of(TABLE),
        Err(LedgerError::UnknownIdentifier(TABLE.to_string()))
    );
}

#[test]
fn rename_and_reset_are_persisted() {
    let ledger = seeded_ledger(4);
    ledger.add_stock(6, "AcmeCo", "Lounger", CHAIR, 2022, 3).unwrap();
    ledger.set_price(CHAIR, 120).unwrap();
    ledger.sell(1, CHAIR).unwrap();
    ledger.reserve(2, CHAIR).unwrap();
    ledger.rename_identifier(CHAIR, TABLE).unwrap();
    ledger.reset_sales_tracking();

    let mut bytes = Vec::new();
    ledger.save(&mut bytes).unwrap();

    let mut store = LedgerStore::new();
    snapshot::load(&mut store, bytes.as_slice()).unwrap();
    assert_eq!(store.total_units_of(TABLE).unwrap(), 5);
    assert_eq!(store.stock()[0].quantity(), 3);
    assert!(store.sales().is_empty());
    assert_eq!(store.reservations()[0].item_id().as_str(), TABLE);
}

#[derive(Debug, Clone)]
enum Op {
    Add(u64, usize),
    Price(u64, usize),
    Sell(u64, usize),
    Reserve(u64, usize),
    Unreserve(usize),
    Finalize(usize),
}

const IDS: [&str; 3] = [CHAIR, TABLE, "7fffffff"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..50, 0usize..3).prop_map(|(q, i)| Op::Add(q, i)),
        (1u64..1_000, 0usize..3).prop_map(|(p, i)| Op::Price(p, i)),
        (1u64..20, 0usize..3).prop_map(|(q, i)| Op::Sell(q, i)),
        (1u64..20, 0usize..3).prop_map(|(q, i)| Op::Reserve(q, i)),
        (0usize..8).prop_map(Op::Unreserve),
        (0usize..8).prop_map(Op::Finalize),
    ]
}

fn apply(store: &mut LedgerStore, op: &Op) {
    // Rejected operations are part of the workload; the ledgers stay as they were.
    let _ = match *op {
        Op::Add(q, i) => store.add_stock(q, "AcmeCo", "Lounger", IDS[i], 2020, 1),
        Op::Price(p, i) => store.set_price(IDS[i], p),
        Op::Sell(q, i) => store.sell(q, IDS[i]),
        Op::Reserve(q, i) => store.reserve(q, IDS[i]).map(|_| ()),
        Op::Unreserve(n) => match store.reservations().get(n).map(Reservation::token) {
            Some(token) => store.unreserve(token),
            None => Ok(()),
        },
        Op::Finalize(n) => match store.reservations().get(n).map(Reservation::token) {
            Some(token) => store.finalize_reservation(token),
            None => Ok(()),
        },
    };
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Property: save then load reproduces all three ledgers, in order.
    #[test]
    fn snapshot_round_trip_preserves_every_ledger(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 0..80),
    ) {
        let mut store = LedgerStore::with_token_source(RandomTokenSource::seeded(seed));
        for op in &ops {
            apply(&mut store, op);
        }

        let mut bytes = Vec::new();
        snapshot::save(&store, &mut bytes).unwrap();

        let mut restored = LedgerStore::new();
        snapshot::load(&mut restored, bytes.as_slice()).unwrap();
        prop_assert_eq!(restored.snapshot(), store.snapshot());
        prop_assert_eq!(restored.total_units(), store.total_units());
        prop_assert_eq!(restored.total_revenue(), store.total_revenue());
    }
}
