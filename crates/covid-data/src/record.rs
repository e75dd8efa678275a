//! Serde records for the published CSV files.
//!
//! Field names follow the source headers through `#[serde(rename)]`; empty
//! numeric cells deserialize to `None`. Columns not listed here are ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// One row of the regional DPC dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionRecord {
    /// Report date, floored to the day.
    #[serde(rename = "data", deserialize_with = "deserialize_day")]
    pub time: NaiveDate,
    /// Country code.
    #[serde(rename = "stato", default)]
    pub country: String,
    /// ISTAT region code without leading zeros.
    #[serde(rename = "codice_regione", deserialize_with = "deserialize_code")]
    pub region_code: String,
    /// Region name.
    #[serde(rename = "denominazione_regione", deserialize_with = "deserialize_trimmed")]
    pub region: String,
    /// Hospitalized with symptoms.
    #[serde(rename = "ricoverati_con_sintomi", default)]
    pub n_hospitalized: Option<f64>,
    /// In intensive care.
    #[serde(rename = "terapia_intensiva", default)]
    pub n_intensive_care: Option<f64>,
    /// Total hospitalized.
    #[serde(rename = "totale_ospedalizzati", default)]
    pub tot_n_hospitalized: Option<f64>,
    /// Home isolation.
    #[serde(rename = "isolamento_domiciliare", default)]
    pub n_home_quarantine: Option<f64>,
    /// Currently positive.
    #[serde(default)]
    pub totale_positivi: Option<f64>,
    /// Day-over-day change of currently positive.
    #[serde(default)]
    pub variazione_totale_positivi: Option<f64>,
    /// New positives.
    #[serde(default)]
    pub nuovi_positivi: Option<f64>,
    /// Cumulative discharged or recovered.
    #[serde(rename = "dimessi_guariti", default)]
    pub n_discharged_recovered: Option<f64>,
    /// Cumulative deaths.
    #[serde(rename = "deceduti", default)]
    pub n_deceased: Option<f64>,
    /// Cumulative cases.
    #[serde(rename = "totale_casi", default)]
    pub tot_n_cases: Option<f64>,
    /// Cumulative tests.
    #[serde(rename = "tamponi", default)]
    pub n_tested: Option<f64>,
}

/// One row of the provincial DPC dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProvinceRecord {
    /// Report date, floored to the day.
    #[serde(rename = "data", deserialize_with = "deserialize_day")]
    pub time: NaiveDate,
    /// Country code.
    #[serde(rename = "stato", default)]
    pub country: String,
    /// ISTAT region code without leading zeros.
    #[serde(rename = "codice_regione", deserialize_with = "deserialize_code")]
    pub region_code: String,
    /// Region name.
    #[serde(rename = "denominazione_regione", deserialize_with = "deserialize_trimmed")]
    pub region: String,
    /// ISTAT province code without leading zeros.
    #[serde(rename = "codice_provincia", deserialize_with = "deserialize_code")]
    pub province_code: String,
    /// Province name.
    #[serde(rename = "denominazione_provincia", deserialize_with = "deserialize_trimmed")]
    pub province: String,
    /// Two-letter abbreviation, empty for placeholders.
    #[serde(rename = "sigla_provincia", default)]
    pub province_abbreviation: String,
    /// Cumulative cases.
    #[serde(rename = "totale_casi", default)]
    pub tot_n_cases: Option<f64>,
}

/// Resident population of a region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationRecord {
    /// ISTAT region code without leading zeros.
    #[serde(deserialize_with = "deserialize_code")]
    pub region_code: String,
    /// Region name.
    #[serde(default)]
    pub region: String,
    /// Residents.
    pub population: f64,
}

/// Intensive care capacity of a region.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IcuBedsRecord {
    /// ISTAT region code without leading zeros.
    #[serde(deserialize_with = "deserialize_code")]
    pub region_code: String,
    /// Intensive care beds.
    pub icu_beds: f64,
}

/// Calendar day of a `YYYY-MM-DD...` timestamp.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Numeric code without leading zeros, so `"03"` and `"3"` match.
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('0');
    if trimmed.is_empty() && !raw.trim().is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn deserialize_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_code(&raw))
}

fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_floors_timestamps() {
        assert_eq!(
            parse_day("2020-03-01T17:00:00"),
            NaiveDate::from_ymd_opt(2020, 3, 1)
        );
        assert_eq!(parse_day("2020-03-01"), NaiveDate::from_ymd_opt(2020, 3, 1));
        assert_eq!(parse_day("03/01/2020"), None);
        assert_eq!(parse_day("short"), None);
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("03"), "3");
        assert_eq!(normalize_code(" 14 "), "14");
        assert_eq!(normalize_code("00"), "0");
        assert_eq!(normalize_code(""), "");
    }

    #[test]
    fn test_empty_cell_is_undefined() {
        let csv_text = "data,codice_regione,denominazione_regione,terapia_intensiva\n\
                        2020-02-24T18:00:00,03, Lombardia ,\n";
        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let record: RegionRecord = reader.deserialize().next().unwrap().unwrap();

        assert_eq!(record.region_code, "3");
        assert_eq!(record.region, "Lombardia");
        assert_eq!(record.n_intensive_care, None);
        assert_eq!(record.tot_n_cases, None);
    }
}
