use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use domain::validation::validate_attendance;
use domain::{
    AttendanceFilter, AttendanceInput, AttendanceRecord, AttendanceRepository, AttendanceType,
    DomainError, EmployeeId, NewAttendanceRecord, Result,
};

use crate::clock::Clock;
use crate::employee::EmployeeDirectory;

type LockMap = DashMap<EmployeeId, Arc<Mutex<()>>>;

/// Owns attendance records and the check-in/check-out state machine
///
/// Per session: NONE -> OPEN -> CLOSED. Each decision that reads the
/// current open session and then writes runs under a per-employee lock, so
/// two concurrent check-ins for the same employee cannot both observe "no
/// open session". Different employees never share a lock. A lock entry
/// only lives while some call holds or waits on it.
pub struct AttendanceLedger {
    directory: Arc<EmployeeDirectory>,
    repo: Arc<dyn AttendanceRepository>,
    clock: Arc<dyn Clock>,
    locks: LockMap,
    records_processed: AtomicU64,
}

/// Held per-employee lock. Dropping it, even on cancellation, releases the
/// mutex and forgets the map entry once nobody else refers to it.
struct EmployeeLock<'a> {
    locks: &'a LockMap,
    employee_id: EmployeeId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EmployeeLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.employee_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl AttendanceLedger {
    pub fn new(
        directory: Arc<EmployeeDirectory>,
        repo: Arc<dyn AttendanceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            repo,
            clock,
            locks: DashMap::new(),
            records_processed: AtomicU64::new(0),
        }
    }

    /// Check-ins, check-outs and manual entries written since start-up
    pub fn records_processed(&self) -> u64 {
        self.records_processed.load(Ordering::Relaxed)
    }

    fn count_processed(&self) -> u64 {
        self.records_processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn check_in(&self, employee_id: EmployeeId) -> Result<AttendanceRecord> {
        self.check_in_at(employee_id, self.clock.now()).await
    }

    pub async fn check_out(&self, employee_id: EmployeeId) -> Result<AttendanceRecord> {
        self.check_out_at(employee_id, self.clock.now()).await
    }

    /// Generalized entry point; `timestamp` defaults to the server clock
    pub async fn record(
        &self,
        employee_id: EmployeeId,
        kind: AttendanceType,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AttendanceRecord> {
        let at = timestamp.unwrap_or_else(|| self.clock.now());
        match kind {
            AttendanceType::CheckIn => self.check_in_at(employee_id, at).await,
            AttendanceType::CheckOut => self.check_out_at(employee_id, at).await,
        }
    }

    pub async fn check_in_at(
        &self,
        employee_id: EmployeeId,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        let employee = self.directory.get(employee_id).await?;
        if !employee.can_check_in() {
            return Err(DomainError::InvalidState(format!(
                "employee {employee_id} is inactive"
            )));
        }

        let _lock = self.lock_employee(employee_id).await;
        if let Some(open) = self.current_open_session(employee_id).await? {
            warn!(%employee_id, attendance_id = %open.id, "Check-in rejected: session already open");
            return Err(DomainError::Conflict(format!(
                "employee {employee_id} already checked in (attendance {})",
                open.id
            )));
        }

        let new = NewAttendanceRecord::open(employee_id, at, self.clock.now());
        validate_attendance(&new.to_input()).into_result()?;

        let record = self.repo.insert(new).await?;
        let total = self.count_processed();
        info!(%employee_id, attendance_id = %record.id, check_in = %record.check_in, attendance_records_total = total, "Checked in");
        Ok(record)
    }

    pub async fn check_out_at(
        &self,
        employee_id: EmployeeId,
        at: DateTime<Utc>,
    ) -> Result<AttendanceRecord> {
        // Inactive employees may still close the session they opened.
        self.directory.get(employee_id).await?;

        let _lock = self.lock_employee(employee_id).await;

        let Some(mut record) = self.current_open_session(employee_id).await? else {
            warn!(%employee_id, "Check-out rejected: no open session");
            return Err(DomainError::Conflict(format!(
                "employee {employee_id} has no open check-in"
            )));
        };

        record.close(at)?;

        let stored = self.repo.update_by_id(&record).await?.ok_or_else(|| {
            DomainError::Inconsistent(format!(
                "open attendance {} disappeared during check-out",
                record.id
            ))
        })?;
        let total = self.count_processed();
        info!(%employee_id, attendance_id = %stored.id, check_out = %at, attendance_records_total = total, "Checked out");
        Ok(stored)
    }

    /// Append a manually entered record (corrections are new records)
    ///
    /// An entry without `check_out` opens a session and obeys the same
    /// rules as a check-in.
    pub async fn append_entry(&self, input: AttendanceInput) -> Result<AttendanceRecord> {
        validate_attendance(&input).into_result()?;
        let (Some(employee_id), Some(date), Some(check_in)) =
            (input.employee_id, input.date, input.check_in)
        else {
            return Err(DomainError::invalid_input("incomplete attendance entry"));
        };

        if date != check_in.date_naive() {
            return Err(DomainError::invalid_input(format!(
                "date {date} does not match checkIn calendar date {}",
                check_in.date_naive()
            )));
        }

        if let Some(check_out) = input.check_out {
            if check_out <= check_in {
                return Err(DomainError::InvalidState(format!(
                    "check-out {check_out} is not after check-in {check_in}"
                )));
            }
        }

        let employee = self.directory.get(employee_id).await?;
        let _lock = self.lock_employee(employee_id).await;
        if input.check_out.is_none() {
            if !employee.can_check_in() {
                return Err(DomainError::InvalidState(format!(
                    "employee {employee_id} is inactive"
                )));
            }
            if let Some(open) = self.current_open_session(employee_id).await? {
                return Err(DomainError::Conflict(format!(
                    "employee {employee_id} already checked in (attendance {})",
                    open.id
                )));
            }
        }

        let new = NewAttendanceRecord {
            employee_id,
            date,
            check_in,
            check_out: input.check_out,
            created_at: self.clock.now(),
        };
        let record = self.repo.insert(new).await?;
        let total = self.count_processed();
        info!(%employee_id, attendance_id = %record.id, attendance_records_total = total, "Manual attendance entry appended");
        Ok(record)
    }

    /// The employee's OPEN session, if any. More than one is a storage fault.
    pub async fn current_open_session(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<AttendanceRecord>> {
        let mut open = self
            .repo
            .find_by(&AttendanceFilter::open_sessions(employee_id))
            .await?;

        match open.len() {
            0 => Ok(None),
            1 => Ok(open.pop()),
            n => {
                warn!(%employee_id, count = n, "Multiple open sessions found");
                Err(DomainError::Inconsistent(format!(
                    "employee {employee_id} has {n} open sessions"
                )))
            }
        }
    }

    async fn lock_employee(&self, employee_id: EmployeeId) -> EmployeeLock<'_> {
        let mutex = self.locks.entry(employee_id).or_default().clone();
        let mut lock = EmployeeLock {
            locks: &self.locks,
            employee_id,
            guard: None,
        };
        lock.guard = Some(mutex.lock_owned().await);
        lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};
    use domain::EmployeeInput;
    use infrastructure::{InMemoryAttendanceRepository, InMemoryEmployeeRepository};

    fn ledger() -> (Arc<AttendanceLedger>, Arc<EmployeeDirectory>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 10, 30, 8, 0, 0).unwrap(),
        ));
        let directory = Arc::new(EmployeeDirectory::new(
            Arc::new(InMemoryEmployeeRepository::new()),
            clock.clone(),
        ));
        let ledger = Arc::new(AttendanceLedger::new(
            directory.clone(),
            Arc::new(InMemoryAttendanceRepository::new()),
            clock.clone(),
        ));
        (ledger, directory, clock)
    }

    #[tokio::test]
    async fn test_unknown_employees_leave_no_lock_behind() {
        let (ledger, _, _) = ledger();

        for n in 1..=10_000 {
            let err = ledger.check_in(EmployeeId::new(n)).await.unwrap_err();
            assert!(matches!(err, DomainError::NotFound(_)));
        }

        assert_eq!(ledger.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_locks_released_after_each_call() {
        let (ledger, directory, clock) = ledger();
        let id = directory
            .create(EmployeeInput::new("Ana", "ana@example.com", "RFID001"))
            .await
            .unwrap()
            .id;

        ledger.check_in(id).await.unwrap();
        assert_eq!(ledger.locks.len(), 0);

        // Failed transitions release too
        assert!(ledger.check_in(id).await.is_err());
        assert_eq!(ledger.locks.len(), 0);

        clock.advance(Duration::hours(8));
        ledger.check_out(id).await.unwrap();
        assert_eq!(ledger.locks.len(), 0);
        assert_eq!(ledger.records_processed(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_locks_released_after_contention() {
        let (ledger, directory, _) = ledger();
        let id = directory
            .create(EmployeeInput::new("Ana", "ana@example.com", "RFID001"))
            .await
            .unwrap()
            .id;

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.check_in(id).await })
            })
            .collect();
        let mut ok = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                ok += 1;
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(ledger.locks.len(), 0);
        assert_eq!(ledger.records_processed(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_wait_releases_lock_entry() {
        let (ledger, _, _) = ledger();
        let id = EmployeeId::new(1);

        let held = ledger.lock_employee(id).await;
        let waiting = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            ledger.lock_employee(id),
        )
        .await;
        assert!(waiting.is_err());
        assert_eq!(ledger.locks.len(), 1);

        drop(held);
        assert_eq!(ledger.locks.len(), 0);
    }
}
