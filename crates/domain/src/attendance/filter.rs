use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceRecord;
use crate::employee::EmployeeId;
use crate::{DomainError, Result};

/// Storage-level selection of attendance records. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<EmployeeId>,
    /// Inclusive lower bound on `date`
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`
    pub end_date: Option<NaiveDate>,
    pub open_only: bool,
}

impl AttendanceFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            ..Self::default()
        }
    }

    /// Sessions of the employee that have no check-out yet
    pub fn open_sessions(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            open_only: true,
            ..Self::default()
        }
    }

    pub fn on_date(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id.is_none_or(|id| record.employee_id == id)
            && self.start_date.is_none_or(|start| record.date >= start)
            && self.end_date.is_none_or(|end| record.date <= end)
            && (!self.open_only || record.is_open())
    }
}

/// History query options accepted from callers.
///
/// Only these keys are recognized; anything else is rejected at
/// deserialization time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryFilter {
    pub employee_id: Option<EmployeeId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn for_employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            ..Self::default()
        }
    }

    pub fn between(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(DomainError::invalid_input(format!(
                    "startDate {start} is after endDate {end}"
                )));
            }
        }
        Ok(())
    }

    pub fn to_attendance_filter(&self) -> AttendanceFilter {
        AttendanceFilter {
            employee_id: self.employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            open_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{AttendanceId, NewAttendanceRecord};
    use chrono::{TimeZone, Utc};

    fn record(employee: i64, day: u32, open: bool) -> AttendanceRecord {
        let check_in = Utc.with_ymd_and_hms(2024, 10, day, 8, 0, 0).unwrap();
        let mut record = NewAttendanceRecord::open(EmployeeId::new(employee), check_in, check_in)
            .into_record(AttendanceId::new(1));
        if !open {
            record.close(check_in + chrono::Duration::hours(8)).unwrap();
        }
        record
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, day).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let filter = HistoryFilter::default()
            .between(date(10), date(20))
            .to_attendance_filter();

        assert!(filter.matches(&record(1, 10, false)));
        assert!(filter.matches(&record(1, 20, false)));
        assert!(!filter.matches(&record(1, 9, false)));
        assert!(!filter.matches(&record(1, 21, false)));
    }

    #[test]
    fn test_open_sessions_filter() {
        let filter = AttendanceFilter::open_sessions(EmployeeId::new(1));

        assert!(filter.matches(&record(1, 10, true)));
        assert!(!filter.matches(&record(1, 10, false)));
        assert!(!filter.matches(&record(2, 10, true)));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let filter = HistoryFilter::default().between(date(20), date(10));
        assert_eq!(filter.validate().unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_history_filter_rejects_unknown_keys() {
        let ok: HistoryFilter =
            serde_json::from_str(r#"{"employeeId": 3, "startDate": "2024-10-01"}"#).unwrap();
        assert_eq!(ok.employee_id, Some(EmployeeId::new(3)));
        assert_eq!(ok.start_date, Some(date(1)));

        let err = serde_json::from_str::<HistoryFilter>(r#"{"employee": 3}"#);
        assert!(err.is_err());
    }
}
