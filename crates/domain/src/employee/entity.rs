use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::employee::EmployeeId;

/// A person who can register attendance with an RFID badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub rfid_tag: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Inactive employees stay in the directory and in history but cannot
    /// open new sessions.
    pub fn can_check_in(&self) -> bool {
        self.active
    }

    /// Payload view of the current fields, used to re-validate merged updates
    pub fn to_input(&self) -> EmployeeInput {
        EmployeeInput {
            name: self.name.clone(),
            email: self.email.clone(),
            rfid_tag: self.rfid_tag.clone(),
            active: Some(self.active),
        }
    }

    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.active = false;
        self.updated_at = at;
    }
}

/// Incoming employee payload (create or full replace)
///
/// Missing string fields deserialize as empty so that validation can report
/// every violated rule at once instead of failing on the first absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rfid_tag: String,
    #[serde(default)]
    pub active: Option<bool>,
}

impl EmployeeInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        rfid_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            rfid_tag: rfid_tag.into(),
            active: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rfid_tag: Option<String>,
    pub active: Option<bool>,
}

impl EmployeeUpdate {
    /// Merge this update over the current employee
    pub fn merge(&self, current: &Employee) -> EmployeeInput {
        EmployeeInput {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            rfid_tag: self
                .rfid_tag
                .clone()
                .unwrap_or_else(|| current.rfid_tag.clone()),
            active: Some(self.active.unwrap_or(current.active)),
        }
    }
}

impl From<EmployeeInput> for EmployeeUpdate {
    fn from(input: EmployeeInput) -> Self {
        Self {
            name: Some(input.name),
            email: Some(input.email),
            rfid_tag: Some(input.rfid_tag),
            active: input.active,
        }
    }
}

/// Validated employee data ready to be inserted; the repository assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub rfid_tag: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewEmployee {
    /// Normalizes an input that already passed validation
    pub fn from_input(input: &EmployeeInput, now: DateTime<Utc>) -> Self {
        Self {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            rfid_tag: input.rfid_tag.trim().to_string(),
            active: input.active.unwrap_or(true),
            created_at: now,
        }
    }

    pub fn into_employee(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            rfid_tag: self.rfid_tag,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}
