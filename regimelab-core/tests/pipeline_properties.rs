//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Daily returns keep the input length, start with the 0.0 sentinel, and
//!    match the day-over-day formula
//! 2. Yearly rollup of sorted years yields one entry per year with the run sum
//! 3. The rollup never merges non-contiguous runs and conserves the total
//! 4. Presidency filtering keeps exactly the matching rows, in order
//! 5. Partitioning emits each (term, year) match exactly once

use proptest::prelude::*;
use regimelab_core::domain::{Party, PartyTerm, PresidencyRecord, YearlyReturn};
use regimelab_core::pipeline::{
    daily_returns, partition_by_presidency, presidency_table, yearly_returns_from_parts,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01..10_000.0_f64, 1..200)
}

/// Sorted year labels with the matching daily returns.
fn arb_sorted_years() -> impl Strategy<Value = (Vec<i32>, Vec<f64>)> {
    prop::collection::vec((0..3i32, -0.1..0.1_f64), 1..200).prop_map(|steps| {
        let mut year = 1920;
        let mut years = Vec::with_capacity(steps.len());
        let mut returns = Vec::with_capacity(steps.len());
        for (bump, r) in steps {
            year += bump;
            years.push(year);
            returns.push(r);
        }
        (years, returns)
    })
}

fn arb_terms() -> impl Strategy<Value = Vec<PartyTerm>> {
    prop::collection::vec((1900..2030i32, 1..12i32), 0..8).prop_map(|spans| {
        spans
            .into_iter()
            .map(|(start, len)| PartyTerm {
                start,
                end: start + len,
                party: Party::Republican,
            })
            .collect()
    })
}

fn arb_rows() -> impl Strategy<Value = Vec<(i32, i32, bool)>> {
    prop::collection::vec((1850..2030i32, 1..9i32, prop::bool::ANY), 0..30)
        .prop_map(|rows| rows.into_iter().map(|(s, len, rep)| (s, s + len, rep)).collect())
}

// ── 1. Daily returns ────────────────────────────────────────────────

proptest! {
    #[test]
    fn daily_returns_keep_length_and_sentinel(prices in arb_prices()) {
        let r = daily_returns(&prices).unwrap();
        prop_assert_eq!(r.len(), prices.len());
        prop_assert_eq!(r[0], 0.0);
    }

    #[test]
    fn daily_returns_match_formula(prices in arb_prices()) {
        let r = daily_returns(&prices).unwrap();
        for i in 1..prices.len() {
            let expected = (prices[i] - prices[i - 1]) / prices[i - 1];
            prop_assert!((r[i] - expected).abs() < 1e-9);
        }
    }
}

// ── 2/3. Yearly rollup ──────────────────────────────────────────────

proptest! {
    #[test]
    fn sorted_years_give_one_entry_per_distinct_year((years, returns) in arb_sorted_years()) {
        let out = yearly_returns_from_parts(&years, &returns).unwrap();

        let mut distinct = years.clone();
        distinct.dedup();
        let out_years: Vec<i32> = out.iter().map(|y| y.year).collect();
        prop_assert_eq!(out_years, distinct);

        for entry in &out {
            let expected: f64 = years
                .iter()
                .zip(&returns)
                .filter(|(y, _)| **y == entry.year)
                .map(|(_, r)| r)
                .sum();
            prop_assert!((entry.returns - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn rollup_counts_runs_and_conserves_total(
        years in prop::collection::vec(1920..1924i32, 0..100),
    ) {
        let returns: Vec<f64> = (0..years.len()).map(|i| i as f64 * 0.001).collect();
        let out = yearly_returns_from_parts(&years, &returns).unwrap();

        let runs = years.windows(2).filter(|w| w[0] != w[1]).count()
            + usize::from(!years.is_empty());
        prop_assert_eq!(out.len(), runs);

        for pair in out.windows(2) {
            prop_assert_ne!(pair[0].year, pair[1].year);
        }

        let total: f64 = returns.iter().sum();
        let rolled: f64 = out.iter().map(|y| y.returns).sum();
        prop_assert!((total - rolled).abs() < 1e-9);
    }
}

// ── 4. Presidency table ─────────────────────────────────────────────

proptest! {
    #[test]
    fn presidency_table_keeps_matching_rows_in_order(rows in arb_rows()) {
        let records: Vec<PresidencyRecord> = rows
            .iter()
            .map(|&(start, end, rep)| {
                PresidencyRecord::new(
                    format!("March 4 {start}"),
                    format!("March 4 {end}"),
                    if rep { "Republican" } else { "Democratic" },
                )
            })
            .collect();

        let terms = presidency_table(&records, Party::Republican).unwrap();
        let expected: Vec<(i32, i32)> = rows
            .iter()
            .filter(|(start, _, rep)| *rep && *start >= 1920)
            .map(|&(start, end, _)| (start, end))
            .collect();
        let got: Vec<(i32, i32)> = terms.iter().map(|t| (t.start, t.end)).collect();
        prop_assert_eq!(got, expected);
        prop_assert!(terms.iter().all(|t| t.party == Party::Republican));
    }
}

// ── 5. Partitioning ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn partition_emits_each_match_once_per_term(terms in arb_terms()) {
        let yearly: Vec<YearlyReturn> = (1900..2045)
            .map(|year| YearlyReturn { year, returns: year as f64 / 1e4 })
            .collect();

        let out = partition_by_presidency(&yearly, &terms);

        let expected: Vec<i32> = terms
            .iter()
            .flat_map(|t| (t.start..t.end).filter(|y| (1900..2045).contains(y)))
            .collect();
        let got: Vec<i32> = out.iter().map(|p| p.year).collect();
        prop_assert_eq!(got, expected);

        for p in &out {
            prop_assert!((p.returns - p.year as f64 / 1e4).abs() < 1e-12);
        }
    }
}
