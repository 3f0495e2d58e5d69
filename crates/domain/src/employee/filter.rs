use serde::{Deserialize, Serialize};

use crate::employee::Employee;

/// Equality filter over employees; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeFilter {
    pub rfid_tag: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl EmployeeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_rfid_tag(tag: impl Into<String>) -> Self {
        Self {
            rfid_tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn active(active: bool) -> Self {
        Self {
            active: Some(active),
            ..Self::default()
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.rfid_tag
            .as_ref()
            .is_none_or(|tag| employee.rfid_tag == *tag)
            && self.email.as_ref().is_none_or(|email| employee.email == *email)
            && self.active.is_none_or(|active| employee.active == active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::{EmployeeId, EmployeeInput, NewEmployee};
    use chrono::Utc;

    fn employee(tag: &str, active: bool) -> Employee {
        NewEmployee::from_input(
            &EmployeeInput::new("Test", format!("{tag}@pontual.io"), tag).with_active(active),
            Utc::now(),
        )
        .into_employee(EmployeeId::new(1))
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(EmployeeFilter::all().matches(&employee("RFID001", true)));
        assert!(EmployeeFilter::all().matches(&employee("RFID002", false)));
    }

    #[test]
    fn test_rfid_filter() {
        let filter = EmployeeFilter::by_rfid_tag("RFID001");
        assert!(filter.matches(&employee("RFID001", true)));
        assert!(!filter.matches(&employee("RFID002", true)));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filter = EmployeeFilter {
            rfid_tag: Some("RFID001".to_string()),
            active: Some(true),
            ..Default::default()
        };
        assert!(filter.matches(&employee("RFID001", true)));
        assert!(!filter.matches(&employee("RFID001", false)));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = serde_json::from_str::<EmployeeFilter>(r#"{"department":"IT"}"#);
        assert!(result.is_err());
    }
}
