//! Structural validation of incoming payloads
//!
//! Pure functions. Every violated rule is reported, not just the first, so
//! callers can show the full list. Cross-entity rules (existence,
//! uniqueness, open sessions) need state and live in the application layer.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::attendance::AttendanceInput;
use crate::employee::EmployeeInput;
use crate::{DomainError, Result};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(DomainError::InvalidInput(self.errors))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

pub fn validate_employee(input: &EmployeeInput) -> ValidationReport {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push("name is required".to_string());
    }

    if input.email.trim().is_empty() {
        errors.push("email is required".to_string());
    } else if !is_valid_email(&input.email) {
        errors.push("email is invalid".to_string());
    }

    if input.rfid_tag.trim().is_empty() {
        errors.push("rfidTag is required".to_string());
    }

    ValidationReport::from_errors(errors)
}

pub fn validate_attendance(input: &AttendanceInput) -> ValidationReport {
    let mut errors = Vec::new();

    if input.employee_id.is_none() {
        errors.push("employeeId is required".to_string());
    }

    if input.date.is_none() {
        errors.push("date is required".to_string());
    }

    if input.check_in.is_none() {
        errors.push("checkIn is required".to_string());
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::EmployeeId;
    use chrono::Utc;

    #[test]
    fn test_valid_employee() {
        let report = validate_employee(&EmployeeInput::new(
            "E2E Test User",
            "e2e@test.com",
            "E2E001",
        ));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_empty_name() {
        let report = validate_employee(&EmployeeInput::new("   ", "a@b.com", "RFID001"));
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["name is required"]);
    }

    #[test]
    fn test_reports_every_violation() {
        let report = validate_employee(&EmployeeInput::default());
        assert_eq!(
            report.errors,
            vec!["name is required", "email is required", "rfidTag is required"]
        );

        let err = report.into_result().unwrap_err();
        assert_eq!(err.details().len(), 3);
    }

    #[test]
    fn test_invalid_email_shapes() {
        for email in ["plainaddress", "a@b", "a b@c.com", "@c.com", "a@.com@"] {
            let report = validate_employee(&EmployeeInput::new("X", email, "T1"));
            assert_eq!(report.errors, vec!["email is invalid"], "email: {email}");
        }
        assert!(is_valid_email("joao.silva@empresa.com.br"));
    }

    #[test]
    fn test_valid_attendance() {
        let now = Utc::now();
        let input = AttendanceInput {
            employee_id: Some(EmployeeId::new(1)),
            date: Some(now.date_naive()),
            check_in: Some(now),
            check_out: None,
        };
        assert!(validate_attendance(&input).is_valid);
    }

    #[test]
    fn test_attendance_missing_fields() {
        let report = validate_attendance(&AttendanceInput::default());
        assert_eq!(
            report.errors,
            vec![
                "employeeId is required",
                "date is required",
                "checkIn is required"
            ]
        );
    }
}
