use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregator::CurrencyAggregate;
use crate::collector::CollectionSummary;

/// The ways a [Report] can be rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per currency.
    #[default]
    Text,
    /// A pretty printed JSON document.
    Json,
}

/// The finalized statistics of one run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// The first requested date.
    pub window_start: NaiveDate,
    /// The last requested date.
    pub window_end: NaiveDate,
    /// What happened while collecting.
    pub summary: CollectionSummary,
    /// One entry per observed currency, sorted by currency code.
    pub currencies: Vec<CurrencyAggregate>,
}

const TEXT_DATE_FORMAT: &str = "%d.%m.%Y";

impl Report {
    /// Renders the report in the requested format.
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => self.render_json(),
        }
    }

    /// Renders one line per currency. An empty report renders as an empty string.
    pub fn render_text(&self) -> String {
        self.currencies
            .iter()
            .fold(String::new(), |mut output, currency| {
                let average = currency
                    .average
                    .map(|average| format!("{:.6}", average))
                    .unwrap_or_else(|| "n/a".to_string());
                let _ = writeln!(
                    output,
                    "{} ({}, {}) - Nominal: {}, Max: {:.6} ({}), Min: {:.6} ({}), Average: {}",
                    currency.display_name,
                    currency.currency_code,
                    currency.numeric_code,
                    currency.nominal,
                    currency.max_value,
                    currency.max_date.format(TEXT_DATE_FORMAT),
                    currency.min_value,
                    currency.min_date.format(TEXT_DATE_FORMAT),
                    average,
                );
                output
            })
    }

    /// Renders the report as pretty printed JSON with ISO-8601 dates.
    pub fn render_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
