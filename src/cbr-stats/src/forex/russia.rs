use chrono::NaiveDate;
use serde::Deserialize;

use crate::aggregator::DailyRateRecord;
use crate::{utils, ExtractError, ONE_KIB};

use super::{CentralBankOfRussia, DailyRates, IsForex};

#[derive(Deserialize, Debug)]
struct XmlValCurs {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Valute", default)]
    valutes: Vec<XmlValute>,
}

#[derive(Deserialize, Debug)]
struct XmlValute {
    #[serde(rename = "NumCode")]
    num_code: String,
    #[serde(rename = "CharCode")]
    char_code: String,
    #[serde(rename = "Nominal")]
    nominal: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value")]
    value: String,
}

/// Central Bank of the Russian Federation
impl IsForex for CentralBankOfRussia {
    fn get_base_url(&self) -> &str {
        "http://www.cbr.ru/scripts/XML_daily_eng.asp?date_req=DATE"
    }

    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    fn extract_rates(&self, bytes: &[u8]) -> Result<DailyRates, ExtractError> {
        let document = utils::decode_document(bytes)?;
        let data: XmlValCurs = serde_xml_rs::from_str(&document)
            .map_err(|e| ExtractError::XmlDeserialize(format!("{:?}", e)))?;

        // The feed answers with the latest publication at or before the
        // requested date, so the date is taken from the document.
        let as_of_date = NaiveDate::parse_from_str(data.date.trim(), "%d.%m.%Y")
            .map_err(|_| ExtractError::InvalidDate(data.date.clone()))?;

        let records = data
            .valutes
            .into_iter()
            .map(|valute| {
                let nominal = valute.nominal.trim().parse::<u32>().map_err(|_| {
                    ExtractError::XmlDeserialize(format!(
                        "invalid nominal {:?} for {}",
                        valute.nominal, valute.char_code
                    ))
                })?;
                Ok(DailyRateRecord {
                    currency_code: valute.char_code.trim().to_string(),
                    numeric_code: valute.num_code.trim().to_string(),
                    display_name: valute.name.trim().to_string(),
                    nominal,
                    rate_text: valute.value,
                    as_of_date,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;

        Ok(DailyRates {
            as_of_date,
            records,
        })
    }

    /// Responses are around 8 KiB in English and 10 KiB in Russian.
    fn max_response_bytes(&self) -> u64 {
        ONE_KIB * 64
    }
}
