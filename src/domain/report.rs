// Email report request
use super::filters::PlantFilter;
use super::role::Role;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub fn is_valid_email(candidate: &str) -> bool {
    email_pattern().is_match(candidate)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub recipient_email: String,
    pub role: Role,
    pub plant: PlantFilter,
}

/// Acknowledgement from `POST /send-report`; backends answer with either field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportAck {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("cfo@starcement.com"));
        assert!(is_valid_email("a.b+c@x.co.in"));
        assert!(!is_valid_email("cfo@starcement"));
        assert!(!is_valid_email("cfo starcement.com"));
        assert!(!is_valid_email("cfo@@starcement.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = ReportRequest {
            recipient_email: "cfo@starcement.com".to_string(),
            role: Role::EnergyManager,
            plant: PlantFilter::All,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["role"], "Energy Manager");
        assert_eq!(json["plant"], "all");
    }
}
