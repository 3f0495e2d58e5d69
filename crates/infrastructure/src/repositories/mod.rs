pub mod in_memory_attendance_repository;
pub mod in_memory_employee_repository;

pub use in_memory_attendance_repository::InMemoryAttendanceRepository;
pub use in_memory_employee_repository::InMemoryEmployeeRepository;
