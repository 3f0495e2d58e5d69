//! Domain layer - Pure attendance business rules with no infrastructure
//!
//! This crate contains:
//! - Entities (Employee, AttendanceRecord)
//! - Value Objects (EmployeeId, AttendanceId, AttendanceType, filters)
//! - Structural validation of incoming payloads
//! - RFID device reading parsing
//! - Repository interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Every failure is a typed `DomainError`
//! - Testable in isolation

pub mod attendance;
pub mod employee;
pub mod error;
pub mod rfid;
pub mod validation;

// Re-export commonly used types
pub use attendance::{
    AttendanceFilter, AttendanceId, AttendanceInput, AttendanceRecord, AttendanceRepository,
    AttendanceType, HistoryFilter, NewAttendanceRecord, SessionState,
};
pub use employee::{
    Employee, EmployeeFilter, EmployeeId, EmployeeInput, EmployeeRepository, EmployeeUpdate,
    NewEmployee,
};
pub use error::{DomainError, Result};
pub use rfid::RfidReading;
pub use validation::ValidationReport;
