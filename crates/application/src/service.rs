use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use domain::{
    AttendanceId, AttendanceInput, AttendanceRecord, AttendanceRepository, AttendanceType, Employee,
    EmployeeFilter, EmployeeId, EmployeeInput, EmployeeRepository, EmployeeUpdate, HistoryFilter,
    Result, RfidReading,
};

use crate::attendance::{AttendanceLedger, AttendanceQuery, DailyReport};
use crate::clock::Clock;
use crate::employee::EmployeeDirectory;

/// Single entry point of the attendance domain
///
/// Constructed explicitly with its repositories and clock and shared by
/// reference (`Arc`) with every transport: HTTP handlers, the RFID bridge,
/// tests.
pub struct AttendanceService {
    directory: Arc<EmployeeDirectory>,
    ledger: AttendanceLedger,
    query: AttendanceQuery,
}

impl AttendanceService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        attendances: Arc<dyn AttendanceRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let directory = Arc::new(EmployeeDirectory::new(employees, clock.clone()));
        let ledger = AttendanceLedger::new(directory.clone(), attendances.clone(), clock);
        let query = AttendanceQuery::new(attendances);

        Self {
            directory,
            ledger,
            query,
        }
    }

    // --- Employee directory ---

    pub async fn create_employee(&self, input: EmployeeInput) -> Result<Employee> {
        self.directory.create(input).await
    }

    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee> {
        self.directory.get(id).await
    }

    pub async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        self.directory.list(filter).await
    }

    pub async fn update_employee(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee> {
        self.directory.update(id, update).await
    }

    pub async fn deactivate_employee(&self, id: EmployeeId) -> Result<Employee> {
        self.directory.deactivate(id).await
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        self.directory.delete(id).await
    }

    pub async fn find_employee_by_rfid(&self, rfid_tag: &str) -> Result<Employee> {
        self.directory.find_by_rfid(rfid_tag).await
    }

    // --- Attendance ledger ---

    pub async fn check_in(&self, employee_id: EmployeeId) -> Result<AttendanceRecord> {
        self.ledger.check_in(employee_id).await
    }

    pub async fn check_out(&self, employee_id: EmployeeId) -> Result<AttendanceRecord> {
        self.ledger.check_out(employee_id).await
    }

    pub async fn record_attendance(
        &self,
        employee_id: EmployeeId,
        kind: AttendanceType,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AttendanceRecord> {
        self.ledger.record(employee_id, kind, timestamp).await
    }

    /// Resolve the badge holder and record the reading's event at its timestamp
    pub async fn record_rfid_reading(&self, reading: &RfidReading) -> Result<AttendanceRecord> {
        let employee = self.directory.find_by_rfid(&reading.rfid_tag).await?;
        info!(
            device_id = %reading.device_id,
            employee_id = %employee.id,
            event_type = %reading.event_type,
            "RFID reading resolved"
        );
        self.ledger
            .record(employee.id, reading.event_type, Some(reading.timestamp))
            .await
    }

    pub async fn add_attendance_entry(&self, input: AttendanceInput) -> Result<AttendanceRecord> {
        self.ledger.append_entry(input).await
    }

    /// Attendance records written through this service since start-up
    pub fn records_processed(&self) -> u64 {
        self.ledger.records_processed()
    }

    // --- Queries ---

    pub async fn get_attendance(&self, id: AttendanceId) -> Result<AttendanceRecord> {
        self.query.get(id).await
    }

    pub async fn get_attendance_history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<AttendanceRecord>> {
        self.query.history(filter).await
    }

    pub async fn get_employee_attendances(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<AttendanceRecord>> {
        self.query.by_employee(employee_id).await
    }

    pub async fn get_attendances_on(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        self.query.on_date(date).await
    }

    pub async fn get_daily_report(&self, date: NaiveDate) -> Result<DailyReport> {
        self.query.daily_report(date).await
    }
}
