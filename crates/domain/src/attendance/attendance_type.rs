use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::DomainError;

/// Kind of attendance event sent by clients and RFID readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceType {
    CheckIn,
    CheckOut,
}

impl AttendanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "CHECK_IN",
            Self::CheckOut => "CHECK_OUT",
        }
    }
}

impl FromStr for AttendanceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CHECK_IN" => Ok(Self::CheckIn),
            "CHECK_OUT" => Ok(Self::CheckOut),
            other => Err(DomainError::invalid_input(format!(
                "type must be CHECK_IN or CHECK_OUT, got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for AttendanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
