//! Storage failures surface unchanged; the service never retries.

use application::{AttendanceService, ManualClock};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use domain::{
    AttendanceFilter, AttendanceId, AttendanceRecord, AttendanceRepository, DomainError,
    EmployeeInput, HistoryFilter, NewAttendanceRecord,
};
use infrastructure::InMemoryEmployeeRepository;
use mockall::mock;
use std::sync::Arc;

mock! {
    pub AttendanceRepo {}

    #[async_trait]
    impl AttendanceRepository for AttendanceRepo {
        async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, DomainError>;
        async fn get_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, DomainError>;
        async fn find_by(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>, DomainError>;
        async fn update_by_id(&self, record: &AttendanceRecord) -> Result<Option<AttendanceRecord>, DomainError>;
        async fn delete_by_id(&self, id: AttendanceId) -> Result<bool, DomainError>;
    }
}

async fn service_with(repo: MockAttendanceRepo) -> (AttendanceService, domain::EmployeeId) {
    let start = Utc.with_ymd_and_hms(2024, 10, 30, 8, 0, 0).unwrap();
    let service = AttendanceService::new(
        Arc::new(InMemoryEmployeeRepository::new()),
        Arc::new(repo),
        Arc::new(ManualClock::new(start)),
    );
    let id = service
        .create_employee(EmployeeInput::new("Ana", "ana@example.com", "RFID001"))
        .await
        .unwrap()
        .id;
    (service, id)
}

#[tokio::test]
async fn test_lookup_failure_aborts_check_in() {
    let mut repo = MockAttendanceRepo::new();
    repo.expect_find_by()
        .times(1)
        .returning(|_| Err(DomainError::Storage("connection refused".to_string())));
    repo.expect_insert().never();

    let (service, id) = service_with(repo).await;

    let err = service.check_in(id).await.unwrap_err();
    assert_eq!(err, DomainError::Storage("connection refused".to_string()));
}

#[tokio::test]
async fn test_insert_failure_propagates() {
    let mut repo = MockAttendanceRepo::new();
    repo.expect_find_by().returning(|_| Ok(Vec::new()));
    repo.expect_insert()
        .times(1)
        .returning(|_| Err(DomainError::Storage("disk full".to_string())));

    let (service, id) = service_with(repo).await;

    let err = service.check_in(id).await.unwrap_err();
    assert_eq!(err.kind(), "Storage");
}

#[tokio::test]
async fn test_vanished_open_session_is_inconsistent() {
    let start = Utc.with_ymd_and_hms(2024, 10, 30, 8, 0, 0).unwrap();

    let mut repo = MockAttendanceRepo::new();
    repo.expect_find_by().returning(move |filter| {
        let employee_id = filter.employee_id.expect("ledger filters by employee");
        Ok(vec![
            NewAttendanceRecord::open(employee_id, start - Duration::hours(1), start)
                .into_record(AttendanceId::new(7)),
        ])
    });
    repo.expect_update_by_id().times(1).returning(|_| Ok(None));

    let (service, id) = service_with(repo).await;

    let err = service.check_out(id).await.unwrap_err();
    assert!(matches!(err, DomainError::Inconsistent(_)), "got {err:?}");
}

#[tokio::test]
async fn test_history_filter_reaches_storage() {
    let mut repo = MockAttendanceRepo::new();
    repo.expect_find_by()
        .withf(|filter| filter.employee_id.is_some() && !filter.open_only)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let (service, id) = service_with(repo).await;

    let history = service
        .get_attendance_history(&HistoryFilter::for_employee(id))
        .await
        .unwrap();
    assert!(history.is_empty());
}
