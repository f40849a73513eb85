mod russia;

use chrono::NaiveDate;

use crate::aggregator::DailyRateRecord;
use crate::ExtractError;

/// Every record published in one feed document, tagged with the feed's date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyRates {
    /// The date the feed was published for. Shared by all records.
    pub as_of_date: NaiveDate,
    /// One record per quoted currency.
    pub records: Vec<DailyRateRecord>,
}

/// This macro generates the necessary boilerplate when adding a forex data source to this module.
macro_rules! forex {
    ($($name:ident),*) => {
        /// Enum that contains all of the possible forex sources.
        #[derive(Clone, Copy, Debug)]
        pub enum Forex {
            $(
                #[allow(missing_docs)]
                $name($name),
            )*
        }

        $(
            #[allow(missing_docs)]
            #[derive(Clone, Copy, Debug)]
            pub struct $name;
        )*

        impl core::fmt::Display for Forex {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Forex::$name(_) => write!(f, stringify!($name))),*,
                }
            }
        }

        /// Contains all of the known forex sources that can be found in the
        /// [Forex] enum.
        pub const FOREX_SOURCES: &[Forex] = &[
            $(Forex::$name($name)),*
        ];

        /// Implements the core functionality of the generated `Forex` enum.
        impl Forex {
            /// This method routes the request to the correct forex's [IsForex::get_url] method.
            pub fn get_url(&self, date: NaiveDate) -> String {
                match self {
                    $(Forex::$name(forex) => forex.get_url(date)),*,
                }
            }

            /// This method routes the request to the correct forex's
            /// [IsForex::get_url_from] method.
            pub fn get_url_from(&self, base_url: &str, date: NaiveDate) -> String {
                match self {
                    $(Forex::$name(forex) => forex.get_url_from(base_url, date)),*,
                }
            }

            /// This method routes the response's body to the correct forex's
            /// [IsForex::extract_rates].
            pub fn extract_rates(&self, bytes: &[u8]) -> Result<DailyRates, ExtractError> {
                match self {
                    $(Forex::$name(forex) => forex.extract_rates(bytes)),*,
                }
            }

            /// This method returns the forex's base URL template.
            pub fn get_base_url(&self) -> &str {
                match self {
                    $(Forex::$name(forex) => forex.get_base_url()),*,
                }
            }

            /// This method returns the response size cap of the forex.
            pub fn max_response_bytes(&self) -> u64 {
                match self {
                    $(Forex::$name(forex) => forex.max_response_bytes()),*,
                }
            }
        }
    }
}

forex! { CentralBankOfRussia }

/// The base URL may contain the following placeholders:
/// `DATE`: This string must be replaced with the date string as provided by `format_date`.
pub(crate) const DATE: &str = "DATE";

/// This trait is use to provide the basic methods needed for a forex data source.
pub trait IsForex {
    /// The base URL template that is provided to [IsForex::get_url].
    fn get_base_url(&self) -> &str;

    /// Formats the requested date the way the source expects it in the URL.
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// A default implementation to generate a URL for the given date from
    /// [IsForex::get_base_url].
    fn get_url(&self, date: NaiveDate) -> String {
        self.get_url_from(self.get_base_url(), date)
    }

    /// Replaces the [DATE] placeholder of an arbitrary URL template.
    fn get_url_from(&self, base_url: &str, date: NaiveDate) -> String {
        base_url.replace(DATE, &self.format_date(date))
    }

    /// Parses one feed document into its publication date and records.
    fn extract_rates(&self, bytes: &[u8]) -> Result<DailyRates, ExtractError>;

    /// The largest response body accepted from the source.
    fn max_response_bytes(&self) -> u64;
}
