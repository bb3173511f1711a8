// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use expensebook::{ExpenseRecord, LedgerError};
use expensebook::summary::{category_totals, check_range, month_name, month_totals};
use rust_decimal::Decimal;

fn rec(id: i64, date: &str, amount: &str, category: &str) -> ExpenseRecord {
    ExpenseRecord {
        id,
        expense_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount: amount.parse().unwrap(),
        category: category.into(),
        notes: String::new(),
    }
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn category_totals_include_shares_and_bounds() {
    let records = vec![
        rec(1, "2024-03-01", "30", "Food"),
        rec(2, "2024-03-31", "30", "Food"),
        rec(3, "2024-03-15", "40", "Travel"),
        rec(4, "2024-04-01", "500", "Travel"),
        rec(5, "2024-02-29", "500", "Rent"),
    ];
    let totals = category_totals(&records, d("2024-03-01"), d("2024-03-31")).unwrap();
    let rows: Vec<(&str, Decimal, Decimal)> = totals
        .iter()
        .map(|c| (c.category.as_str(), c.total, c.percentage))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Food", Decimal::from(60), Decimal::from(60)),
            ("Travel", Decimal::from(40), Decimal::from(40)),
        ]
    );
}

#[test]
fn zero_amounts_give_zero_share() {
    let records = vec![rec(1, "2024-03-01", "0", "Food")];
    let totals = category_totals(&records, d("2024-03-01"), d("2024-03-01")).unwrap();
    assert_eq!(totals.len(), 1);
    assert!(totals[0].percentage.is_zero());
}

#[test]
fn month_totals_are_ordered_and_never_double_count() {
    let records = vec![
        rec(1, "2024-12-31", "1", "A"),
        rec(2, "2024-01-01", "2", "A"),
        rec(3, "2024-01-31", "3", "B"),
        rec(4, "2025-01-01", "100", "A"),
    ];
    let months = month_totals(&records, 2024).unwrap();
    let pairs: Vec<(u32, Decimal)> = months.iter().map(|m| (m.month, m.total)).collect();
    assert_eq!(pairs, vec![(1, Decimal::from(5)), (12, Decimal::from(1))]);
    let total: Decimal = months.iter().map(|m| m.total).sum();
    assert_eq!(total, Decimal::from(6));
    assert_eq!(months[1].name, "December");
}

#[test]
fn month_names_and_ranges() {
    assert_eq!(month_name(2), "February");
    assert_eq!(month_name(13), "");
    assert!(check_range(d("2024-01-01"), d("2024-01-01")).is_ok());
    assert!(check_range(d("2024-01-02"), d("2024-01-01")).is_err());
}

#[test]
fn very_large_amounts_summarize() {
    let records = vec![
        rec(1, "2024-03-01", "1000000000000000000000000000", "Rent"),
        rec(2, "2024-03-02", "1", "Food"),
    ];
    let totals = category_totals(&records, d("2024-03-01"), d("2024-03-31")).unwrap();
    assert_eq!(totals[0].category, "Food");
    assert!(totals[0].percentage.is_zero());
    assert_eq!(totals[1].total, "1000000000000000000000000000".parse::<Decimal>().unwrap());
    assert_eq!(totals[1].percentage, Decimal::from(100));

    let months = month_totals(&records, 2024).unwrap();
    assert_eq!(months[0].total, "1000000000000000000000000001".parse::<Decimal>().unwrap());
}

#[test]
fn overflowing_totals_are_rejected() {
    let half = "50000000000000000000000000000";
    let same_category = vec![
        rec(1, "2024-03-01", half, "Rent"),
        rec(2, "2024-03-02", half, "Rent"),
    ];
    let err = category_totals(&same_category, d("2024-03-01"), d("2024-03-31")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    // Each category fits on its own; only the grand total overflows.
    let split = vec![
        rec(1, "2024-03-01", half, "Rent"),
        rec(2, "2024-03-02", half, "Tax"),
    ];
    let err = category_totals(&split, d("2024-03-01"), d("2024-03-31")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    let err = month_totals(&same_category, 2024).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn high_precision_amounts_sum_exactly() {
    let records = vec![
        rec(1, "2024-05-01", "1234567890.123456789", "Gear"),
        rec(2, "2024-05-02", "0.000000001", "Gear"),
    ];
    let totals = category_totals(&records, d("2024-05-01"), d("2024-05-31")).unwrap();
    assert_eq!(totals[0].total, "1234567890.123456790".parse::<Decimal>().unwrap());
    let months = month_totals(&records, 2024).unwrap();
    assert_eq!(months[0].total, totals[0].total);
}
