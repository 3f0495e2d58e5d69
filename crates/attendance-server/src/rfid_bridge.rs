//! MQTT -> attendance service bridge for RFID readers

use application::AttendanceService;
use domain::{AttendanceRecord, DomainError, Result, RfidReading};
use infrastructure::{MqttClient, MqttMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Parse one device payload and record it
pub async fn process_reading(
    service: &AttendanceService,
    topic: &str,
    payload: &[u8],
) -> Result<AttendanceRecord> {
    let reading = RfidReading::parse(payload)?;
    debug!(topic, device_id = %reading.device_id, rfid_tag = %reading.rfid_tag, "RFID reading received");
    service.record_rfid_reading(&reading).await
}

/// Whether a processed reading is settled and may be acked
///
/// Rejections are final and redelivery would fail the same way. Storage
/// faults are left unacked so the broker redelivers the reading.
pub fn should_ack(outcome: &Result<AttendanceRecord>) -> bool {
    !matches!(
        outcome,
        Err(DomainError::Storage(_) | DomainError::Inconsistent(_))
    )
}

/// Consume readings until the client's queue closes
///
/// `messages` must be taken from `client` before subscribing so that
/// session backlog is not missed.
pub async fn run(
    service: Arc<AttendanceService>,
    client: MqttClient,
    mut messages: mpsc::Receiver<MqttMessage>,
) {
    info!("📡 RFID bridge started");

    while let Some(msg) = messages.recv().await {
        let outcome = process_reading(&service, &msg.topic, &msg.payload).await;
        log_outcome(&msg, &outcome);

        if !should_ack(&outcome) {
            continue;
        }
        if let Err(e) = client.ack(&msg).await {
            warn!("Failed to Ack reading {}: {}", msg.pkid, e);
        }
    }

    info!("RFID bridge stopped");
}

fn log_outcome(msg: &MqttMessage, outcome: &Result<AttendanceRecord>) {
    match outcome {
        Ok(record) => info!(
            topic = %msg.topic,
            employee_id = %record.employee_id,
            attendance_id = %record.id,
            open = record.is_open(),
            "RFID reading recorded"
        ),
        Err(e) if should_ack(outcome) => warn!(
            topic = %msg.topic,
            kind = e.kind(),
            "RFID reading rejected: {}",
            e
        ),
        Err(e) => error!(
            topic = %msg.topic,
            pkid = msg.pkid,
            kind = e.kind(),
            "RFID reading not recorded, awaiting redelivery: {}",
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use domain::{DomainError, EmployeeInput};
    use serde_json::json;

    #[tokio::test]
    async fn test_process_reading() {
        let service = AppState::in_memory().service;
        let employee = service
            .create_employee(EmployeeInput::new("Ana", "ana@example.com", "RFID001"))
            .await
            .unwrap();

        let payload = json!({
            "deviceId": "GATE-01",
            "rfidTag": "RFID001",
            "eventType": "CHECK_IN",
            "timestamp": "2024-10-30T08:00:00Z"
        })
        .to_string();

        let record = process_reading(&service, "attendance/gate-01", payload.as_bytes())
            .await
            .unwrap();
        assert_eq!(record.employee_id, employee.id);
        assert!(record.is_open());
    }

    #[tokio::test]
    async fn test_rejects_bad_payload() {
        let service = AppState::in_memory().service;

        let err = process_reading(&service, "attendance/gate-01", b"not json")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_rejections_are_acked() {
        let service = AppState::in_memory().service;
        let payload = json!({
            "deviceId": "GATE-01",
            "rfidTag": "UNKNOWN",
            "eventType": "CHECK_IN",
            "timestamp": "2024-10-30T08:00:00Z"
        })
        .to_string();

        let outcome = process_reading(&service, "attendance/gate-01", payload.as_bytes()).await;
        assert!(matches!(outcome, Err(DomainError::NotFound(_))));
        assert!(should_ack(&outcome));

        let outcome = process_reading(&service, "attendance/gate-01", b"{}").await;
        assert!(should_ack(&outcome));
    }

    #[test]
    fn test_storage_faults_are_not_acked() {
        for err in [
            DomainError::Storage("connection refused".to_string()),
            DomainError::Inconsistent("two open sessions".to_string()),
        ] {
            assert!(!should_ack(&Err(err)));
        }

        for err in [
            DomainError::invalid_input("timestamp is required"),
            DomainError::NotFound("employee".to_string()),
            DomainError::Conflict("already checked in".to_string()),
            DomainError::InvalidState("inactive".to_string()),
        ] {
            assert!(should_ack(&Err(err)));
        }
    }
}
