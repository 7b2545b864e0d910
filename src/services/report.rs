//! Report service
//!
//! Income, expense and savings totals for a calendar month or year.

use serde::Serialize;

use crate::error::FinanceResult;
use crate::models::{Money, ReportPeriod, UserId};
use crate::storage::Storage;

/// Totals for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub income: Money,
    pub expenses: Money,
}

impl PeriodReport {
    /// Income minus expenses; negative when spending exceeded income
    pub fn savings(&self) -> Money {
        self.income - self.expenses
    }
}

/// Service for period reports
pub struct ReportService<'a> {
    storage: &'a Storage,
}

impl<'a> ReportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn monthly(&self, user_id: UserId, year: i32, month: u32) -> FinanceResult<PeriodReport> {
        self.for_period(user_id, ReportPeriod::month(year, month)?)
    }

    pub fn yearly(&self, user_id: UserId, year: i32) -> FinanceResult<PeriodReport> {
        self.for_period(user_id, ReportPeriod::year(year)?)
    }

    /// Totals for an already validated period
    pub fn for_period(&self, user_id: UserId, period: ReportPeriod) -> FinanceResult<PeriodReport> {
        let totals = self.storage.transactions().totals_by_kind(user_id, &period)?;
        Ok(PeriodReport {
            period,
            income: totals.income,
            expenses: totals.expenses,
        })
    }
}
