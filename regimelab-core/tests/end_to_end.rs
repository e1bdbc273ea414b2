//! End-to-end pipeline tests: raw bars and a term table in, party partitions out.

use chrono::NaiveDate;
use regimelab_core::data::{ingest, read_presidents, RawBar};
use regimelab_core::domain::{Party, PricePoint, YearlyReturn};
use regimelab_core::pipeline::{
    annotate_days, daily_returns, partition_by_presidency, presidency_table, year_labels,
    yearly_returns,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn three_days_one_republican_term() {
    let prices = vec![
        PricePoint::new(d(1920, 3, 1), 100.0),
        PricePoint::new(d(1920, 3, 2), 110.0),
        PricePoint::new(d(1920, 3, 3), 99.0),
    ];
    let closes: Vec<f64> = prices.iter().map(|p| p.adj_close).collect();

    let daily = daily_returns(&closes).unwrap();
    assert_eq!(daily.len(), 3);
    assert_eq!(daily[0], 0.0);
    assert_close(daily[1], 0.10);
    assert_close(daily[2], -0.1);

    assert_eq!(year_labels(&prices), vec![1920, 1920, 1920]);

    let yearly = yearly_returns(&annotate_days(&prices).unwrap());
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].year, 1920);
    assert_close(yearly[0].returns, 0.0);

    let table = read_presidents("Start,End,Party\nMarch 4 1920,March 4 1922,Republican\n".as_bytes())
        .unwrap();
    let rep = presidency_table(&table, Party::Republican).unwrap();
    let partitioned = partition_by_presidency(&yearly, &rep);
    assert_eq!(partitioned.len(), 1);
    assert_eq!(partitioned[0].year, 1920);
    assert_close(partitioned[0].returns, 0.0);

    let dem = presidency_table(&table, Party::Democratic).unwrap();
    assert!(partition_by_presidency(&yearly, &dem).is_empty());
}

#[test]
fn unsorted_raw_bars_are_sorted_before_rollup() {
    // Out-of-order input would otherwise split 1952 into two runs.
    let bars = vec![
        RawBar { date: d(1953, 1, 2), close: 26.54, adj_close: 26.54 },
        RawBar { date: d(1952, 12, 31), close: 26.57, adj_close: 26.57 },
        RawBar { date: d(1952, 1, 2), close: 23.80, adj_close: 23.80 },
    ];
    let prices = ingest(bars).unwrap().prices;
    let yearly = yearly_returns(&annotate_days(&prices).unwrap());

    let years: Vec<i32> = yearly.iter().map(|y| y.year).collect();
    assert_eq!(years, vec![1952, 1953]);
    assert_close(yearly[0].returns, (26.57 - 23.80) / 23.80);
    assert_close(yearly[1].returns, (26.54 - 26.57) / 26.57);
}

#[test]
fn both_parties_split_a_multi_decade_series() {
    let table = read_presidents(
        "President,Start,End,Party\n\
         Harry S. Truman,April 12 1945,January 20 1953,Democratic\n\
         Dwight D. Eisenhower,January 20 1953,January 20 1961,Republican\n\
         John F. Kennedy,January 20 1961,November 22 1963,Democratic\n"
            .as_bytes(),
    )
    .unwrap();

    let yearly: Vec<YearlyReturn> = (1950..1964)
        .map(|year| YearlyReturn { year, returns: (year - 1950) as f64 / 100.0 })
        .collect();

    let rep = partition_by_presidency(&yearly, &presidency_table(&table, Party::Republican).unwrap());
    let dem = partition_by_presidency(&yearly, &presidency_table(&table, Party::Democratic).unwrap());

    let rep_years: Vec<i32> = rep.iter().map(|p| p.year).collect();
    let dem_years: Vec<i32> = dem.iter().map(|p| p.year).collect();
    assert_eq!(rep_years, (1953..1961).collect::<Vec<_>>());
    assert_eq!(dem_years, vec![1950, 1951, 1952, 1961, 1962]);
}
