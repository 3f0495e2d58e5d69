pub mod ledger;
pub mod query;

pub use ledger::AttendanceLedger;
pub use query::{AttendanceQuery, DailyReport};
