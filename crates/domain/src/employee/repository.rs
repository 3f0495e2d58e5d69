use crate::DomainError;
use crate::employee::{Employee, EmployeeFilter, EmployeeId, NewEmployee};
use async_trait::async_trait;

/// Repository interface for Employee persistence
///
/// Each call is atomic for a single record. Implementations live in the
/// infrastructure layer; uniqueness rules are enforced by the directory,
/// not here.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Store a new employee and return it with its assigned id
    async fn insert(&self, employee: NewEmployee) -> Result<Employee, DomainError>;

    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError>;

    /// Employees matching the filter, ordered by id
    async fn find_by(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, DomainError>;

    /// Replace the stored employee with the same id. Returns `None` if absent.
    async fn update_by_id(&self, employee: &Employee) -> Result<Option<Employee>, DomainError>;

    /// Returns whether a record was removed
    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, DomainError>;
}
