use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use domain::validation::validate_employee;
use domain::{
    DomainError, Employee, EmployeeFilter, EmployeeId, EmployeeInput, EmployeeRepository,
    EmployeeUpdate, NewEmployee, Result,
};

use crate::clock::Clock;

/// Owns the set of employees and their uniqueness rules
///
/// RFID tags and emails are unique across all employees, active or not.
/// Uniqueness spans the whole directory, so every write runs the
/// check-then-write sequence under a single lock.
pub struct EmployeeDirectory {
    repo: Arc<dyn EmployeeRepository>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl EmployeeDirectory {
    pub fn new(repo: Arc<dyn EmployeeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn create(&self, input: EmployeeInput) -> Result<Employee> {
        validate_employee(&input).into_result()?;
        let new = NewEmployee::from_input(&input, self.clock.now());

        let _guard = self.write_lock.lock().await;
        self.ensure_unique(&new.rfid_tag, &new.email, None).await?;

        let employee = self.repo.insert(new).await?;
        info!(employee_id = %employee.id, rfid_tag = %employee.rfid_tag, "Employee created");
        Ok(employee)
    }

    pub async fn get(&self, id: EmployeeId) -> Result<Employee> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("employee {id}")))
    }

    pub async fn list(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>> {
        self.repo.find_by(filter).await
    }

    /// Resolve the single employee holding `rfid_tag`
    pub async fn find_by_rfid(&self, rfid_tag: &str) -> Result<Employee> {
        let mut matches = self
            .repo
            .find_by(&EmployeeFilter::by_rfid_tag(rfid_tag.trim()))
            .await?;

        match matches.len() {
            0 => Err(DomainError::NotFound(format!(
                "employee with RFID tag '{rfid_tag}'"
            ))),
            1 => Ok(matches.remove(0)),
            n => {
                warn!(rfid_tag, count = n, "RFID tag shared by several employees");
                Err(DomainError::Inconsistent(format!(
                    "{n} employees share RFID tag '{rfid_tag}'"
                )))
            }
        }
    }

    pub async fn update(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee> {
        let _guard = self.write_lock.lock().await;
        let current = self.get(id).await?;

        let merged = update.merge(&current);
        validate_employee(&merged).into_result()?;
        let normalized = NewEmployee::from_input(&merged, current.created_at);
        self.ensure_unique(&normalized.rfid_tag, &normalized.email, Some(id))
            .await?;

        let updated = Employee {
            id,
            name: normalized.name,
            email: normalized.email,
            rfid_tag: normalized.rfid_tag,
            active: normalized.active,
            created_at: current.created_at,
            updated_at: self.clock.now(),
        };

        let stored = self
            .repo
            .update_by_id(&updated)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("employee {id}")))?;
        info!(employee_id = %id, "Employee updated");
        Ok(stored)
    }

    /// Mark the employee inactive. Open sessions are left as they are.
    pub async fn deactivate(&self, id: EmployeeId) -> Result<Employee> {
        let _guard = self.write_lock.lock().await;
        let mut employee = self.get(id).await?;
        if !employee.active {
            return Ok(employee);
        }

        employee.deactivate(self.clock.now());
        let stored = self
            .repo
            .update_by_id(&employee)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("employee {id}")))?;
        info!(employee_id = %id, "Employee deactivated");
        Ok(stored)
    }

    /// Remove the employee. Attendance records keep their `employee_id`.
    pub async fn delete(&self, id: EmployeeId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.repo.delete_by_id(id).await? {
            return Err(DomainError::NotFound(format!("employee {id}")));
        }
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    async fn ensure_unique(
        &self,
        rfid_tag: &str,
        email: &str,
        exclude: Option<EmployeeId>,
    ) -> Result<()> {
        let holders = self.repo.find_by(&EmployeeFilter::by_rfid_tag(rfid_tag)).await?;
        if let Some(holder) = holders.iter().find(|e| Some(e.id) != exclude) {
            return Err(DomainError::Conflict(format!(
                "RFID tag '{rfid_tag}' already assigned to employee {}",
                holder.id
            )));
        }

        let holders = self.repo.find_by(&EmployeeFilter::by_email(email)).await?;
        if let Some(holder) = holders.iter().find(|e| Some(e.id) != exclude) {
            return Err(DomainError::Conflict(format!(
                "email '{email}' already used by employee {}",
                holder.id
            )));
        }

        Ok(())
    }
}
