use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::attendance::AttendanceType;
use crate::{DomainError, Result};

/// A badge read published by an RFID device
///
/// Wire format (JSON):
/// `{"deviceId": "DEV-01", "rfidTag": "RFID001", "eventType": "CHECK_IN",
///   "timestamp": "2024-10-30T08:00:00", "metadata": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfidReading {
    pub device_id: String,
    pub rfid_tag: String,
    pub event_type: AttendanceType,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<Value>,
}

impl RfidReading {
    /// Parse and validate a device payload, collecting every problem found
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let json: Value = serde_json::from_slice(payload)
            .map_err(|e| DomainError::invalid_input(format!("malformed JSON payload: {e}")))?;

        let obj = json
            .as_object()
            .ok_or_else(|| DomainError::invalid_input("payload must be a JSON object"))?;

        let mut errors = Vec::new();
        let mut required = |field: &str| -> Option<String> {
            match obj.get(field) {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Some(Value::String(_)) => {
                    errors.push(format!("{field} is empty"));
                    None
                }
                Some(Value::Null) | None => {
                    errors.push(format!("{field} is required"));
                    None
                }
                Some(_) => {
                    errors.push(format!("{field} must be a string"));
                    None
                }
            }
        };

        let device_id = required("deviceId");
        let rfid_tag = required("rfidTag");
        let event_type = required("eventType");
        let timestamp = required("timestamp");

        let event_type = event_type.and_then(|s| match s.parse::<AttendanceType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("eventType must be CHECK_IN or CHECK_OUT".to_string());
                None
            }
        });

        let timestamp = timestamp.and_then(|s| match parse_timestamp(&s) {
            Some(ts) => Some(ts),
            None => {
                errors.push(format!(
                    "timestamp must be ISO 8601 (e.g. 2024-01-15T08:30:00), got '{s}'"
                ));
                None
            }
        });

        match (device_id, rfid_tag, event_type, timestamp) {
            (Some(device_id), Some(rfid_tag), Some(event_type), Some(timestamp))
                if errors.is_empty() =>
            {
                Ok(Self {
                    device_id,
                    rfid_tag,
                    event_type,
                    timestamp,
                    metadata: obj.get("metadata").filter(|m| !m.is_null()).cloned(),
                })
            }
            _ => Err(DomainError::InvalidInput(errors)),
        }
    }
}

/// RFC 3339, or a local date-time without offset taken as UTC
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
