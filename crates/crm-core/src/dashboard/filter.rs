//! Filter selection and row filtering.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::snapshot::{FilterOptions, Snapshot};
use crate::model::JoinedDeal;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("date range start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown stage {0:?}")]
    UnknownStage(String),

    #[error("unknown sales agent {0:?}")]
    UnknownAgent(String),
}

impl From<SelectionError> for crm_common::Error {
    fn from(err: SelectionError) -> Self {
        crm_common::Error::InvalidSelection(err.to_string())
    }
}

/// Inclusive close-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SelectionError> {
        if start > end {
            return Err(SelectionError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Every representable date.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the three filter controls currently hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub stages: BTreeSet<String>,
    pub agents: BTreeSet<String>,
    pub close_dates: DateRange,
}

impl FilterSelection {
    /// Everything selected: the unfiltered view.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            stages: options.stages.iter().cloned().collect(),
            agents: options.agents.iter().cloned().collect(),
            close_dates: options.close_dates.unwrap_or_else(DateRange::unbounded),
        }
    }

    /// Narrow the default selection.
    ///
    /// Empty `stages`/`agents` keep every option; `from`/`to` default to the
    /// observed bounds. Values a control would not offer are rejected.
    pub fn narrowed(
        options: &FilterOptions,
        stages: &[String],
        agents: &[String],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, SelectionError> {
        let mut selection = Self::all(options);
        if !stages.is_empty() {
            if let Some(unknown) = stages.iter().find(|s| !options.stages.contains(*s)) {
                return Err(SelectionError::UnknownStage(unknown.clone()));
            }
            selection.stages = stages.iter().cloned().collect();
        }
        if !agents.is_empty() {
            if let Some(unknown) = agents.iter().find(|a| !options.agents.contains(*a)) {
                return Err(SelectionError::UnknownAgent(unknown.clone()));
            }
            selection.agents = agents.iter().cloned().collect();
        }
        selection.close_dates = DateRange::new(
            from.unwrap_or(selection.close_dates.start),
            to.unwrap_or(selection.close_dates.end),
        )?;
        Ok(selection)
    }

    pub fn matches(&self, row: &JoinedDeal) -> bool {
        self.stages.contains(&row.deal_stage)
            && self.agents.contains(&row.sales_agent)
            && row.close_date.is_some_and(|d| self.close_dates.contains(d))
    }
}

/// Rows of `snapshot` matching `selection`, in snapshot order.
pub fn filter<'a>(snapshot: &'a Snapshot, selection: &FilterSelection) -> Vec<&'a JoinedDeal> {
    snapshot
        .rows()
        .iter()
        .filter(|row| selection.matches(row))
        .collect()
}
