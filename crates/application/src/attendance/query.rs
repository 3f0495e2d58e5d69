use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use domain::{
    AttendanceFilter, AttendanceId, AttendanceRecord, AttendanceRepository, DomainError,
    EmployeeId, HistoryFilter, Result,
};

/// Per-day attendance summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub date: NaiveDate,
    pub total_records: usize,
    pub checked_in: usize,
    pub checked_out: usize,
    pub still_working: usize,
    pub records: Vec<AttendanceRecord>,
}

/// Read-side projections over the ledger's records. Never mutates.
pub struct AttendanceQuery {
    repo: Arc<dyn AttendanceRepository>,
}

impl AttendanceQuery {
    pub fn new(repo: Arc<dyn AttendanceRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: AttendanceId) -> Result<AttendanceRecord> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("attendance {id}")))
    }

    /// Records matching every set filter, most recent check-in first
    pub async fn history(&self, filter: &HistoryFilter) -> Result<Vec<AttendanceRecord>> {
        filter.validate()?;
        self.fetch_sorted(&filter.to_attendance_filter()).await
    }

    pub async fn by_employee(&self, employee_id: EmployeeId) -> Result<Vec<AttendanceRecord>> {
        self.history(&HistoryFilter::for_employee(employee_id))
            .await
    }

    pub async fn on_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        self.fetch_sorted(&AttendanceFilter::on_date(date)).await
    }

    pub async fn daily_report(&self, date: NaiveDate) -> Result<DailyReport> {
        let records = self.on_date(date).await?;
        let checked_out = records.iter().filter(|r| r.check_out.is_some()).count();

        Ok(DailyReport {
            date,
            total_records: records.len(),
            checked_in: records.len(),
            checked_out,
            still_working: records.len() - checked_out,
            records,
        })
    }

    async fn fetch_sorted(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>> {
        let mut records = self.repo.find_by(filter).await?;
        // Ties on check-in fall back to the newer id so the order is stable.
        records.sort_by(|a, b| b.check_in.cmp(&a.check_in).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
