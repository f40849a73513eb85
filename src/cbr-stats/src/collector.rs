use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::aggregator::RateAggregator;
use crate::environment::Environment;
use crate::forex::{DailyRates, Forex};
use crate::report::Report;
use crate::{ExtractError, FetchError};

/// The number of calendar days, ending today, that a run covers.
pub const WINDOW_DAYS: u64 = 90;

/// The counters of a collection run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    /// Days for which a feed was requested.
    pub days_requested: usize,
    /// Days skipped because the fetch or the parse failed.
    pub days_failed: usize,
    /// Records folded into the statistics.
    pub records_folded: usize,
    /// Records skipped because their rate was not numeric.
    pub records_skipped: usize,
}

#[derive(Debug, thiserror::Error)]
enum DayError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Returns the `days` calendar days ending at `today`, oldest first.
pub fn window(today: NaiveDate, days: u64) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}

async fn collect_day<E: Environment + ?Sized>(
    env: &E,
    source: &Forex,
    url: &str,
) -> Result<DailyRates, DayError> {
    let bytes = env.fetch(url, source.max_response_bytes()).await?;
    Ok(source.extract_rates(&bytes)?)
}

/// Requests one feed per day of `dates`, in order, and folds every feed into
/// `aggregator`. Days that fail are logged and skipped. `base_url` replaces
/// the source's URL template when given.
pub async fn collect<E: Environment + ?Sized>(
    env: &E,
    source: &Forex,
    base_url: Option<&str>,
    dates: &[NaiveDate],
    aggregator: &mut RateAggregator,
) -> CollectionSummary {
    let mut summary = CollectionSummary::default();
    for date in dates {
        let url = match base_url {
            Some(base_url) => source.get_url_from(base_url, *date),
            None => source.get_url(*date),
        };
        summary.days_requested += 1;
        tracing::debug!(%date, %url, "requesting feed");

        match collect_day(env, source, &url).await {
            Ok(rates) => {
                if rates.as_of_date != *date {
                    tracing::debug!(%date, published = %rates.as_of_date, "feed carries an earlier publication");
                }
                let folded = aggregator.fold_batch(&rates);
                summary.records_folded += folded.folded;
                summary.records_skipped += folded.skipped;
            }
            Err(error) => {
                tracing::warn!(%date, source = %source, "skipping day: {}", error);
                summary.days_failed += 1;
            }
        }
    }
    summary
}

/// Collects the [WINDOW_DAYS] days ending today and returns the finalized report.
pub async fn run<E: Environment + ?Sized>(env: &E, source: &Forex, base_url: Option<&str>) -> Report {
    run_window(env, source, base_url, WINDOW_DAYS).await
}

pub(crate) async fn run_window<E: Environment + ?Sized>(
    env: &E,
    source: &Forex,
    base_url: Option<&str>,
    days: u64,
) -> Report {
    let today = env.today();
    let dates = window(today, days);
    let mut aggregator = RateAggregator::new();
    let summary = collect(env, source, base_url, &dates, &mut aggregator).await;
    tracing::info!(
        days = summary.days_requested,
        failed = summary.days_failed,
        currencies = aggregator.len(),
        "collection finished"
    );

    Report {
        window_start: dates.first().copied().unwrap_or(today),
        window_end: today,
        summary,
        currencies: aggregator.finalize(),
    }
}
