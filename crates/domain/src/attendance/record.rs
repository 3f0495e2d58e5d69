use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::attendance::AttendanceId;
use crate::employee::EmployeeId;
use crate::{DomainError, Result};

/// Session state of a single attendance record
///
/// A record is born OPEN by a check-in and becomes CLOSED exactly once.
/// Nothing leaves CLOSED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Open,
    Closed,
}

/// One check-in/check-out session of an employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn state(&self) -> SessionState {
        match self.check_out {
            Some(_) => SessionState::Closed,
            None => SessionState::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }

    /// OPEN -> CLOSED transition
    ///
    /// A checkout at or before the check-in instant is reported as
    /// `InvalidState` and leaves the record untouched.
    pub fn close(&mut self, at: DateTime<Utc>) -> Result<()> {
        if let Some(closed_at) = self.check_out {
            return Err(DomainError::Conflict(format!(
                "attendance {} already closed at {}",
                self.id, closed_at
            )));
        }

        if at <= self.check_in {
            return Err(DomainError::InvalidState(format!(
                "check-out {} is not after check-in {}",
                at, self.check_in
            )));
        }

        self.check_out = Some(at);
        Ok(())
    }

    /// Time between check-in and check-out; `None` while open
    pub fn worked(&self) -> Option<Duration> {
        self.check_out.map(|out| out - self.check_in)
    }
}

/// Record data ready to be appended; the repository assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NewAttendanceRecord {
    /// An open session starting at `check_in`; the date is its calendar day
    pub fn open(employee_id: EmployeeId, check_in: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            employee_id,
            date: check_in.date_naive(),
            check_in,
            check_out: None,
            created_at: now,
        }
    }

    pub fn into_record(self, id: AttendanceId) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: self.employee_id,
            date: self.date,
            check_in: self.check_in,
            check_out: self.check_out,
            created_at: self.created_at,
        }
    }

    /// Structural view used by attendance validation
    pub fn to_input(&self) -> AttendanceInput {
        AttendanceInput {
            employee_id: Some(self.employee_id),
            date: Some(self.date),
            check_in: Some(self.check_in),
            check_out: self.check_out,
        }
    }
}

/// Incoming attendance payload, used for manual entries and as the
/// structural pre-check of every record the ledger writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    pub employee_id: Option<EmployeeId>,
    pub date: Option<NaiveDate>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
}
