use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::DomainError;

/// Value object identifying an Employee
///
/// Assigned by the repository on insert and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(i64);

impl EmployeeId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EmployeeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for EmployeeId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::invalid_input(format!("Invalid employee id: '{s}'")))
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_employee_id() {
        let id: EmployeeId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_parse_invalid_employee_id() {
        let result = "abc".parse::<EmployeeId>();
        assert_eq!(result.unwrap_err().kind(), "InvalidInput");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&EmployeeId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
