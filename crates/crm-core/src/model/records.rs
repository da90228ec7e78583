//! Raw table records.
//!
//! Field names match the CSV headers. Empty cells load as `None`; columns
//! missing from a header entirely also default to `None`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One pipeline opportunity from `sales_pipeline.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default)]
    pub opportunity_id: Option<String>,
    pub sales_agent: String,
    pub product: String,
    #[serde(default)]
    pub account: Option<String>,
    pub deal_stage: String,
    #[serde(default, deserialize_with = "optional_date")]
    pub engage_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub close_date: Option<NaiveDate>,
    #[serde(default)]
    pub close_value: Option<f64>,
}

/// Account lookup row from `accounts.csv`, keyed by `account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub year_established: Option<i64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub employees: Option<i64>,
    #[serde(default)]
    pub office_location: Option<String>,
    #[serde(default)]
    pub subsidiary_of: Option<String>,
}

/// Product lookup row from `products.csv`, keyed by `product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub sales_price: Option<f64>,
}

/// Sales team lookup row from `sales_teams.csv`, keyed by `sales_agent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTeam {
    pub sales_agent: String,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub regional_office: Option<String>,
}

/// Accepts `YYYY-MM-DD` or a datetime whose date part is kept.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("unparseable date {s:?}"))
        }),
    }
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    // Datetime forms: "2024-01-10 13:45:00", "2024-01-10T13:45:00"
    let date_part = s.split([' ', 'T']).next()?;
    if date_part.len() < s.len() {
        return NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
    }
    None
}
