#![deny(missing_docs)]

//! Collects the daily exchange rates published by the Central Bank of the
//! Russian Federation over a trailing window and summarises every currency
//! seen: its minimum and maximum rate, the dates those were published on, and
//! the average over the window.

mod aggregator;
mod collector;
mod environment;
mod forex;
mod http;
mod report;
mod utils;

pub use aggregator::{
    normalize_decimal, CurrencyAggregate, DailyRateRecord, FoldSummary, RateAggregator, SkipReason,
};
pub use collector::{collect, run, window, CollectionSummary, WINDOW_DAYS};
pub use environment::{Environment, LiveEnvironment};
pub use forex::{CentralBankOfRussia, DailyRates, Forex, IsForex, FOREX_SOURCES};
pub use http::FeedHttpRequest;
pub use report::{OutputFormat, Report};

/// 1KiB = 1024 bytes.
pub const ONE_KIB: u64 = 1_024;

/// The user agent sent along with every feed request. The feed refuses some
/// default client agents.
pub const USER_AGENT: &str = "Mozilla/5.0";

/// The possible errors that can occur when fetching a feed document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the response could not be read.
    #[error("Failed to request {url}: {error}")]
    Http {
        /// The requested URL.
        url: String,
        /// The underlying client error.
        error: String,
    },
    /// The server answered with a non-success status.
    #[error("Request to {url} returned status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The received HTTP status code.
        status: u16,
    },
    /// The response body exceeded the size accepted for the source.
    #[error("Response from {url} exceeded {max_response_bytes} bytes")]
    ResponseTooLarge {
        /// The requested URL.
        url: String,
        /// The size cap that was exceeded.
        max_response_bytes: u64,
    },
}

/// The possible errors that can occur when extracting rates from a feed document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The document is not well-formed or does not follow the expected schema.
    #[error("Failed to deserialize XML: {0}")]
    XmlDeserialize(String),
    /// The document declares an encoding that cannot be decoded.
    #[error("Unsupported document encoding: {0}")]
    UnsupportedEncoding(String),
    /// The publication date attribute could not be understood.
    #[error("Invalid publication date: {0}")]
    InvalidDate(String),
}

/// The errors that stop a run before any feed is requested.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// A base URL override is missing the date placeholder.
    #[error("Base URL {0} does not contain the DATE placeholder")]
    MissingDatePlaceholder(String),
}
