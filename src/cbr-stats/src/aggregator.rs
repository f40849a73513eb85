use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::forex::DailyRates;

/// A single currency's quote taken from one day's feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyRateRecord {
    /// The alphabetic currency code, e.g. `USD`. Used as the aggregation key.
    pub currency_code: String,
    /// The numeric currency code, e.g. `840`.
    pub numeric_code: String,
    /// The human readable currency name.
    pub display_name: String,
    /// The number of currency units the rate is quoted for.
    pub nominal: u32,
    /// The quoted rate as published, using a decimal comma.
    pub rate_text: String,
    /// The publication date of the feed the record was taken from.
    pub as_of_date: NaiveDate,
}

/// The running summary of every rate observed for one currency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrencyAggregate {
    /// The alphabetic currency code.
    pub currency_code: String,
    /// The human readable currency name, as first observed.
    pub display_name: String,
    /// The numeric currency code, as first observed.
    pub numeric_code: String,
    /// The nominal, as first observed.
    pub nominal: u32,
    /// The lowest rate observed so far.
    pub min_value: f64,
    /// The date on which [CurrencyAggregate::min_value] was first observed.
    pub min_date: NaiveDate,
    /// The highest rate observed so far.
    pub max_value: f64,
    /// The date on which [CurrencyAggregate::max_value] was first observed.
    pub max_date: NaiveDate,
    /// The sum of every observed rate.
    pub sum: f64,
    /// The number of observed rates.
    pub count: u64,
    /// The mean rate. Only available once [RateAggregator::finalize] has been called.
    pub average: Option<f64>,
}

impl CurrencyAggregate {
    fn new(record: &DailyRateRecord, value: f64) -> Self {
        Self {
            currency_code: record.currency_code.clone(),
            display_name: record.display_name.clone(),
            numeric_code: record.numeric_code.clone(),
            nominal: record.nominal,
            min_value: value,
            min_date: record.as_of_date,
            max_value: value,
            max_date: record.as_of_date,
            sum: value,
            count: 1,
            average: None,
        }
    }

    /// Extremes only move on a strict inequality so the first date a tied
    /// extreme was seen on is kept.
    fn observe(&mut self, value: f64, date: NaiveDate) {
        self.sum += value;
        self.count += 1;
        if value > self.max_value {
            self.max_value = value;
            self.max_date = date;
        }
        if value < self.min_value {
            self.min_value = value;
            self.min_date = date;
        }
    }
}

/// The reason a record was left out of the statistics.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The rate text could not be read as a finite number.
    #[error("rate {rate_text:?} for {currency_code} is not numeric")]
    NotNumeric {
        /// The currency the record belonged to.
        currency_code: String,
        /// The rate text as published.
        rate_text: String,
    },
}

/// The outcome of folding one day's batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FoldSummary {
    /// Records that were incorporated.
    pub folded: usize,
    /// Records that were skipped.
    pub skipped: usize,
}

/// Replaces the decimal comma used by the feed with a decimal point.
pub fn normalize_decimal(text: &str) -> String {
    text.trim().replace(',', ".")
}

fn parse_rate(text: &str) -> Option<f64> {
    normalize_decimal(text)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Maintains one [CurrencyAggregate] per currency code.
#[derive(Clone, Debug, Default)]
pub struct RateAggregator {
    aggregates: HashMap<String, CurrencyAggregate>,
}

impl RateAggregator {
    /// Creates an aggregator with an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a single record into the table. Nothing changes if the rate is not numeric.
    pub fn fold(&mut self, record: &DailyRateRecord) -> Result<(), SkipReason> {
        let value = parse_rate(&record.rate_text).ok_or_else(|| SkipReason::NotNumeric {
            currency_code: record.currency_code.clone(),
            rate_text: record.rate_text.clone(),
        })?;

        self.aggregates
            .entry(record.currency_code.clone())
            .and_modify(|aggregate| aggregate.observe(value, record.as_of_date))
            .or_insert_with(|| CurrencyAggregate::new(record, value));
        Ok(())
    }

    /// Folds every record of one day. Skipped records are logged and counted.
    pub fn fold_batch(&mut self, batch: &DailyRates) -> FoldSummary {
        let mut summary = FoldSummary::default();
        for record in &batch.records {
            match self.fold(record) {
                Ok(()) => summary.folded += 1,
                Err(reason) => {
                    tracing::warn!(date = %batch.as_of_date, "skipping record: {}", reason);
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    /// Computes the average of every aggregate and returns them sorted by currency code.
    pub fn finalize(&mut self) -> Vec<CurrencyAggregate> {
        let mut aggregates = self
            .aggregates
            .values_mut()
            .filter(|aggregate| aggregate.count > 0)
            .map(|aggregate| {
                aggregate.average = Some(aggregate.sum / aggregate.count as f64);
                aggregate.clone()
            })
            .collect::<Vec<_>>();
        aggregates.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));
        aggregates
    }

    /// Returns the aggregate for the given currency code, if it was observed.
    pub fn get(&self, currency_code: &str) -> Option<&CurrencyAggregate> {
        self.aggregates.get(currency_code)
    }

    /// The number of distinct currencies observed.
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    /// Returns true if no currency has been observed.
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}

#[cfg(test)]
mod test {
    use rand::seq::SliceRandom;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
    }

    fn record(code: &str, rate: &str, day: u32) -> DailyRateRecord {
        DailyRateRecord {
            currency_code: code.to_string(),
            numeric_code: "000".to_string(),
            display_name: format!("{} name", code),
            nominal: 1,
            rate_text: rate.to_string(),
            as_of_date: date(day),
        }
    }

    #[test]
    fn normalize_decimal_replaces_every_comma() {
        assert_eq!(normalize_decimal("75,5"), "75.5");
        assert_eq!(normalize_decimal(" 1,2,3 "), "1.2.3");
        assert_eq!(normalize_decimal("90.1"), "90.1");
    }

    #[test]
    fn fold_tracks_extremes_and_their_dates() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "75,5", 1)).unwrap();
        aggregator.fold(&record("USD", "76,2", 2)).unwrap();
        aggregator.fold(&record("USD", "74,0", 3)).unwrap();

        let aggregates = aggregator.finalize();
        assert_eq!(aggregates.len(), 1);
        let usd = &aggregates[0];
        assert_eq!(usd.min_value, 74.0);
        assert_eq!(usd.min_date, date(3));
        assert_eq!(usd.max_value, 76.2);
        assert_eq!(usd.max_date, date(2));
        assert_eq!(usd.count, 3);
        let average = usd.average.unwrap();
        assert!((average - 75.233_333).abs() < 1e-6);
    }

    #[test]
    fn fold_skips_non_numeric_rate_without_creating_aggregate() {
        let mut aggregator = RateAggregator::new();
        let result = aggregator.fold(&record("EUR", "abc", 1));

        assert_eq!(
            result,
            Err(SkipReason::NotNumeric {
                currency_code: "EUR".to_string(),
                rate_text: "abc".to_string(),
            })
        );
        assert!(aggregator.get("EUR").is_none());
        assert!(aggregator.is_empty());
        assert!(aggregator.finalize().is_empty());
    }

    #[test]
    fn fold_skip_leaves_existing_aggregate_untouched() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("EUR", "90,1", 1)).unwrap();
        let before = aggregator.get("EUR").cloned();

        assert!(aggregator.fold(&record("EUR", "", 2)).is_err());
        assert!(aggregator.fold(&record("EUR", "NaN", 3)).is_err());
        assert!(aggregator.fold(&record("EUR", "inf", 4)).is_err());
        assert_eq!(aggregator.get("EUR").cloned(), before);
    }

    #[test]
    fn single_record_has_equal_extremes_and_average() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("JPY", "0,5", 1)).unwrap();

        let jpy = aggregator.finalize().remove(0);
        assert_eq!(jpy.min_value, 0.5);
        assert_eq!(jpy.max_value, 0.5);
        assert_eq!(jpy.average, Some(0.5));
        assert_eq!(jpy.min_date, date(1));
        assert_eq!(jpy.max_date, date(1));
    }

    #[test]
    fn tied_extremes_keep_first_seen_date() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "75,0", 5)).unwrap();
        aggregator.fold(&record("USD", "75,0", 6)).unwrap();

        let usd = aggregator.get("USD").unwrap();
        assert_eq!(usd.max_date, date(5));
        assert_eq!(usd.min_date, date(5));
        assert_eq!(usd.count, 2);
    }

    #[test]
    fn value_between_extremes_changes_only_sum_and_count() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "70", 1)).unwrap();
        aggregator.fold(&record("USD", "80", 2)).unwrap();
        aggregator.fold(&record("USD", "75", 3)).unwrap();

        let usd = aggregator.get("USD").unwrap();
        assert_eq!((usd.min_value, usd.min_date), (70.0, date(1)));
        assert_eq!((usd.max_value, usd.max_date), (80.0, date(2)));
        assert_eq!(usd.sum, 225.0);
        assert_eq!(usd.count, 3);
    }

    #[test]
    fn identity_is_fixed_at_first_observation() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "70", 1)).unwrap();
        let mut renamed = record("USD", "71", 2);
        renamed.display_name = "Renamed".to_string();
        renamed.nominal = 10;
        aggregator.fold(&renamed).unwrap();

        let usd = aggregator.get("USD").unwrap();
        assert_eq!(usd.display_name, "USD name");
        assert_eq!(usd.nominal, 1);
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "75,5", 1)).unwrap();
        aggregator.fold(&record("EUR", "80,25", 1)).unwrap();
        aggregator.fold(&record("USD", "76,1", 2)).unwrap();

        let first = aggregator.finalize();
        let second = aggregator.finalize();
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|a| a.currency_code.as_str()).collect::<Vec<_>>(),
            vec!["EUR", "USD"]
        );
    }

    #[test]
    fn average_is_not_defined_before_finalize() {
        let mut aggregator = RateAggregator::new();
        aggregator.fold(&record("USD", "75,5", 1)).unwrap();
        assert_eq!(aggregator.get("USD").unwrap().average, None);
    }

    /// Folds a random mix of valid and invalid records and checks the invariants
    /// against a straightforward recomputation.
    #[test]
    fn count_and_bounds_hold_for_random_input() {
        let mut rng = rand::thread_rng();
        let rates = ["70,1", "71,9", "bad", "69,5", "72,0", "", "70,1", "x,y"];
        let mut records = (1..=28)
            .flat_map(|day| {
                ["USD", "EUR", "CNY"]
                    .into_iter()
                    .enumerate()
                    .map(move |(i, code)| record(code, rates[(day as usize + i) % rates.len()], day))
            })
            .collect::<Vec<_>>();
        records.shuffle(&mut rng);

        let mut aggregator = RateAggregator::new();
        for r in &records {
            let _ = aggregator.fold(r);
        }

        for code in ["USD", "EUR", "CNY"] {
            let values = records
                .iter()
                .filter(|r| r.currency_code == code)
                .filter_map(|r| parse_rate(&r.rate_text))
                .collect::<Vec<_>>();
            let aggregate = aggregator.get(code).unwrap();
            assert_eq!(aggregate.count, values.len() as u64);
            assert!(values
                .iter()
                .all(|v| aggregate.min_value <= *v && *v <= aggregate.max_value));
        }

        for aggregate in aggregator.finalize() {
            assert_eq!(aggregate.average, Some(aggregate.sum / aggregate.count as f64));
        }
    }

    /// Interleaving of different currencies must not change any single currency's result.
    #[test]
    fn fold_order_across_currencies_does_not_matter() {
        let mut rng = rand::thread_rng();
        let usd = (1..=10)
            .map(|day| record("USD", &format!("{},{}", 70 + day % 4, day), day))
            .collect::<Vec<_>>();
        let eur = (1..=10)
            .map(|day| record("EUR", &format!("{},{}", 80 + day % 3, day), day))
            .collect::<Vec<_>>();

        let mut sequential = RateAggregator::new();
        usd.iter().chain(eur.iter()).for_each(|r| {
            sequential.fold(r).unwrap();
        });

        // Shuffle the currency tags while keeping each currency's own order.
        let mut tags = vec![true; usd.len()];
        tags.extend(vec![false; eur.len()]);
        tags.shuffle(&mut rng);
        let (mut usd_iter, mut eur_iter) = (usd.iter(), eur.iter());
        let mut interleaved = RateAggregator::new();
        for is_usd in tags {
            let next = if is_usd { usd_iter.next() } else { eur_iter.next() };
            interleaved.fold(next.unwrap()).unwrap();
        }

        assert_eq!(sequential.finalize(), interleaved.finalize());
    }

    #[test]
    fn fold_batch_counts_skipped_records() {
        let batch = DailyRates {
            as_of_date: date(1),
            records: vec![
                record("USD", "75,5", 1),
                record("EUR", "n/a", 1),
                record("CNY", "10,1", 1),
            ],
        };
        let mut aggregator = RateAggregator::new();
        let summary = aggregator.fold_batch(&batch);

        assert_eq!(summary, FoldSummary { folded: 2, skipped: 1 });
        assert_eq!(aggregator.len(), 2);
    }
}
