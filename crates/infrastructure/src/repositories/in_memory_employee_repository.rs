use async_trait::async_trait;
use domain::{DomainError, Employee, EmployeeFilter, EmployeeId, EmployeeRepository, NewEmployee};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Process-local employee store
///
/// Used when no database is configured and by tests. Ids are assigned
/// sequentially starting at 1 and never reused.
#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    employees: BTreeMap<EmployeeId, Employee>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, DomainError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = EmployeeId::new(state.next_id);

        let employee = employee.into_employee(id);
        state.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        Ok(self.state.read().await.employees.get(&id).cloned())
    }

    async fn find_by(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .employees
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn update_by_id(&self, employee: &Employee) -> Result<Option<Employee>, DomainError> {
        let mut state = self.state.write().await;
        match state.employees.get_mut(&employee.id) {
            Some(stored) => {
                *stored = employee.clone();
                Ok(Some(employee.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.employees.remove(&id).is_some())
    }
}
