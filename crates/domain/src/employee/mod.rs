mod employee_id;
mod entity;
mod filter;
mod repository;

pub use employee_id::EmployeeId;
pub use entity::{Employee, EmployeeInput, EmployeeUpdate, NewEmployee};
pub use filter::EmployeeFilter;
pub use repository::EmployeeRepository;
