//! Application layer - Attendance use cases
//!
//! Composes the domain rules into the services every transport calls:
//! the employee directory, the attendance ledger, read-side queries and
//! the `AttendanceService` facade over all of them.

pub mod attendance;
pub mod clock;
pub mod employee;
pub mod service;

pub use attendance::{AttendanceLedger, AttendanceQuery, DailyReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use employee::EmployeeDirectory;
pub use service::AttendanceService;
