//! Infrastructure layer - Storage, configuration and device messaging

pub mod config;
pub mod database;
pub mod messaging;
pub mod repositories;

pub use config::ServerConfig;
pub use database::{PostgresAttendanceRepository, PostgresEmployeeRepository};
pub use messaging::mqtt_client::{MqttClient, MqttMessage};
pub use repositories::{InMemoryAttendanceRepository, InMemoryEmployeeRepository};
