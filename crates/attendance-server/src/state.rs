use application::{AttendanceService, SystemClock};
use infrastructure::{InMemoryAttendanceRepository, InMemoryEmployeeRepository, MqttClient};
use std::sync::Arc;

/// Shared state handed to every HTTP handler
pub struct AppState {
    pub service: Arc<AttendanceService>,
    /// Reader link, when MQTT is configured
    pub mqtt: Option<MqttClient>,
}

impl AppState {
    pub fn new(service: Arc<AttendanceService>) -> Self {
        Self {
            service,
            mqtt: None,
        }
    }

    pub fn with_mqtt(mut self, client: MqttClient) -> Self {
        self.mqtt = Some(client);
        self
    }

    /// Fresh in-memory service on the system clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(AttendanceService::new(
            Arc::new(InMemoryEmployeeRepository::new()),
            Arc::new(InMemoryAttendanceRepository::new()),
            Arc::new(SystemClock),
        )))
    }
}
