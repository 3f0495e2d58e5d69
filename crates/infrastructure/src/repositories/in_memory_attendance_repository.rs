use async_trait::async_trait;
use domain::{
    AttendanceFilter, AttendanceId, AttendanceRecord, AttendanceRepository, DomainError,
    NewAttendanceRecord,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local attendance store. Stores whatever it is given; the
/// ledger is responsible for the session rules.
#[derive(Default)]
pub struct InMemoryAttendanceRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    records: BTreeMap<AttendanceId, AttendanceRecord>,
}

impl InMemoryAttendanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryAttendanceRepository {
    async fn insert(&self, record: NewAttendanceRecord) -> Result<AttendanceRecord, DomainError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = AttendanceId::new(state.next_id);

        let record = record.into_record(id);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: AttendanceId) -> Result<Option<AttendanceRecord>, DomainError> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn find_by(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update_by_id(
        &self,
        record: &AttendanceRecord,
    ) -> Result<Option<AttendanceRecord>, DomainError> {
        let mut state = self.state.write().await;
        match state.records.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: AttendanceId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.records.remove(&id).is_some())
    }
}
