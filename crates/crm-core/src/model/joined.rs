//! The joined, analysis-ready row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::records::{Account, Deal, Product, SalesTeam};
use super::stage::{is_lost_stage, is_won_stage};

/// Features derived from a single deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derived {
    /// `close_date - engage_date` in days; `None` unless both dates exist.
    /// Negative when the dates are inverted.
    pub deal_age: Option<i64>,
    pub is_won: bool,
    pub is_lost: bool,
}

impl Derived {
    pub fn from_deal(deal: &Deal) -> Self {
        let deal_age = match (deal.engage_date, deal.close_date) {
            (Some(engage), Some(close)) => Some((close - engage).num_days()),
            _ => None,
        };
        Self {
            deal_age,
            is_won: is_won_stage(&deal.deal_stage),
            is_lost: is_lost_stage(&deal.deal_stage),
        }
    }
}

/// A deal enriched with derived features and every lookup attribute.
///
/// Lookup attributes are `None` when the deal's key had no match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedDeal {
    pub opportunity_id: Option<String>,
    pub sales_agent: String,
    pub product: String,
    pub account: Option<String>,
    pub deal_stage: String,
    pub engage_date: Option<NaiveDate>,
    pub close_date: Option<NaiveDate>,
    pub close_value: Option<f64>,

    pub deal_age: Option<i64>,
    pub is_won: bool,
    pub is_lost: bool,

    pub sector: Option<String>,
    pub year_established: Option<i64>,
    pub revenue: Option<f64>,
    pub employees: Option<i64>,
    pub office_location: Option<String>,
    pub subsidiary_of: Option<String>,

    pub manager: Option<String>,
    pub regional_office: Option<String>,

    pub series: Option<String>,
    pub sales_price: Option<f64>,
}

impl JoinedDeal {
    /// A joined row with no lookup matches.
    pub fn unmatched(deal: Deal, derived: Derived) -> Self {
        Self {
            opportunity_id: deal.opportunity_id,
            sales_agent: deal.sales_agent,
            product: deal.product,
            account: deal.account,
            deal_stage: deal.deal_stage,
            engage_date: deal.engage_date,
            close_date: deal.close_date,
            close_value: deal.close_value,
            deal_age: derived.deal_age,
            is_won: derived.is_won,
            is_lost: derived.is_lost,
            sector: None,
            year_established: None,
            revenue: None,
            employees: None,
            office_location: None,
            subsidiary_of: None,
            manager: None,
            regional_office: None,
            series: None,
            sales_price: None,
        }
    }

    pub fn with_account(mut self, account: &Account) -> Self {
        self.sector = account.sector.clone();
        self.year_established = account.year_established;
        self.revenue = account.revenue;
        self.employees = account.employees;
        self.office_location = account.office_location.clone();
        self.subsidiary_of = account.subsidiary_of.clone();
        self
    }

    pub fn with_team(mut self, team: &SalesTeam) -> Self {
        self.manager = team.manager.clone();
        self.regional_office = team.regional_office.clone();
        self
    }

    pub fn with_product(mut self, product: &Product) -> Self {
        self.series = product.series.clone();
        self.sales_price = product.sales_price;
        self
    }
}
