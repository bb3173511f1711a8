// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use expensebook::commands::{doctor, expenses, reports};
use expensebook::config::{Backend, Settings};
use expensebook::{ExpenseRecord, JsonLedgerStore, LedgerStore, NewExpense, ReadPolicy, cli};
use rust_decimal::Decimal;
use std::path::Path;
use tempfile::tempdir;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seeded(path: &Path) -> JsonLedgerStore {
    let store = JsonLedgerStore::new(path);
    for (date, amt, cat) in [
        ("2025-01-03", "10", "Food"),
        ("2025-01-01", "20", "Rent"),
        ("2025-01-02", "30", "Food"),
    ] {
        store
            .insert(NewExpense::new(d(date), amt.parse().unwrap(), cat, ""))
            .unwrap();
    }
    store
}

#[test]
fn settings_follow_flags_and_extension() {
    let m = cli::build_cli().get_matches_from([
        "expensebook",
        "--file",
        "/tmp/ledger.sqlite",
        "--lenient-reads",
        "list",
    ]);
    let s = Settings::from_matches(&m).unwrap();
    assert_eq!(s.backend, Backend::Sqlite);
    assert_eq!(s.read_policy, ReadPolicy::Degrade);
    assert_eq!(s.data_file, Path::new("/tmp/ledger.sqlite"));

    let m = cli::build_cli().get_matches_from([
        "expensebook",
        "--backend",
        "json",
        "--file",
        "/tmp/ledger.sqlite",
        "list",
    ]);
    let s = Settings::from_matches(&m).unwrap();
    assert_eq!(s.backend, Backend::Json);
    assert_eq!(s.read_policy, ReadPolicy::Propagate);
}

#[test]
fn list_filters_by_category_in_date_order() {
    let dir = tempdir().unwrap();
    let store = seeded(&dir.path().join("e.json"));
    let m = cli::build_cli().get_matches_from(["expensebook", "list", "--category", "Food"]);
    let Some(("list", sub)) = m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows: Vec<ExpenseRecord> = expenses::query_rows(&store, sub).unwrap();
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.expense_date).collect();
    assert_eq!(dates, vec![d("2025-01-02"), d("2025-01-03")]);
}

#[test]
fn list_with_range() {
    let dir = tempdir().unwrap();
    let store = seeded(&dir.path().join("e.json"));
    let m = cli::build_cli().get_matches_from([
        "expensebook",
        "list",
        "--from",
        "2025-01-01",
        "--to",
        "2025-01-02",
    ]);
    let Some(("list", sub)) = m.subcommand() else {
        panic!("no list subcommand");
    };
    assert_eq!(expenses::query_rows(&store, sub).unwrap().len(), 2);
}

#[test]
fn add_edit_and_rm_through_handlers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("e.json");
    let path_str = path.to_string_lossy().to_string();
    let run = |args: &[&str]| {
        let mut argv = vec!["expensebook", "--file", path_str.as_str()];
        argv.extend_from_slice(args);
        let m = cli::build_cli().get_matches_from(argv);
        let store = Settings::from_matches(&m).unwrap().open_store().unwrap();
        let (name, sub) = m.subcommand().unwrap();
        expenses::handle(store.as_ref(), name, sub)
    };

    run(&["add", "--date", "2024-08-02", "--amount", "25.75", "--category", "Food", "--note", "Lunch"]).unwrap();
    run(&["edit", "1", "--amount", "30"]).unwrap();
    assert!(run(&["edit", "1"]).is_err());
    assert!(run(&["add", "--date", "2024-13-01", "--amount", "1", "--category", "Food"]).is_err());

    let store = JsonLedgerStore::new(&path);
    let rec = store.get_by_id(1).unwrap().unwrap();
    assert_eq!(rec.amount, "30".parse::<Decimal>().unwrap());
    assert_eq!(rec.notes, "Lunch");

    run(&["rm", "--id", "1"]).unwrap();
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn rm_requires_a_target() {
    let res = cli::build_cli().try_get_matches_from(["expensebook", "rm"]);
    assert!(res.is_err());
    let res =
        cli::build_cli().try_get_matches_from(["expensebook", "rm", "--date", "2024-01-01", "--id", "2"]);
    assert!(res.is_err());
}

#[test]
fn reports_reject_reversed_range() {
    let dir = tempdir().unwrap();
    let store = seeded(&dir.path().join("e.json"));
    let m = cli::build_cli().get_matches_from([
        "expensebook",
        "report",
        "by-category",
        "--from",
        "2025-02-01",
        "--to",
        "2025-01-01",
    ]);
    let Some(("report", sub)) = m.subcommand() else {
        panic!("no report subcommand");
    };
    assert!(reports::handle(&store, sub).is_err());
}

#[test]
fn doctor_flags_bad_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("e.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "expense_date": "2024-05-01", "amount": -3, "category": " ", "notes": ""},
            {"id": 2, "expense_date": "2999-01-01", "amount": 4, "category": "Food", "notes": ""}]"#,
    )
    .unwrap();
    let store = JsonLedgerStore::new(&path);
    let rows = doctor::check(&store.get_all().unwrap(), d("2025-01-01"));
    let issues: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(issues, vec!["negative_amount", "blank_category", "future_date"]);
    assert!(doctor::handle(&store).is_ok());

    std::fs::write(&path, "[").unwrap();
    assert!(doctor::handle(&store).is_ok());
}

#[test]
fn unknown_expense_command_is_an_error() {
    let dir = tempdir().unwrap();
    let store = seeded(&dir.path().join("e.json"));
    let m = cli::build_cli().get_matches_from(["expensebook", "show", "1"]);
    let (_, sub) = m.subcommand().unwrap();
    let err = expenses::handle(&store, "bogus", sub).unwrap_err();
    assert!(err.to_string().contains("bogus"));
    assert_eq!(store.get_all().unwrap().len(), 3);
}
