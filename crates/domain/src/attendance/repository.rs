use crate::DomainError;
use crate::attendance::{AttendanceFilter, AttendanceId, AttendanceRecord, NewAttendanceRecord};
use async_trait::async_trait;

/// Repository interface for attendance records
///
/// Each call is atomic for a single record. The state machine and the
/// single-open-session rule are enforced by the ledger on top of it.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Append a record and return it with its assigned id
    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, DomainError>;

    async fn get_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, DomainError>;

    /// Records matching the filter, in no particular order
    async fn find_by(&self, filter: &AttendanceFilter)
    -> Result<Vec<AttendanceRecord>, DomainError>;

    /// Replace the stored record with the same id. Returns `None` if absent.
    async fn update_by_id(
        &self,
        record: &AttendanceRecord,
    ) -> Result<Option<AttendanceRecord>, DomainError>;

    async fn delete_by_id(&self, id: AttendanceId) -> Result<bool, DomainError>;
}
