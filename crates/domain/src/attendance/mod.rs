mod attendance_id;
mod attendance_type;
mod filter;
mod record;
mod repository;

pub use attendance_id::AttendanceId;
pub use attendance_type::AttendanceType;
pub use filter::{AttendanceFilter, HistoryFilter};
pub use record::{AttendanceInput, AttendanceRecord, NewAttendanceRecord, SessionState};
pub use repository::AttendanceRepository;
