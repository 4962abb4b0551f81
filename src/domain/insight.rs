// AI insight request/response models
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::charts::null_as_default;
use super::filters::DashboardFilters;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFilters {
    pub role: String,
    pub start: String,
    pub end: String,
    pub plant: String,
}

impl From<&DashboardFilters> for ContextFilters {
    fn from(filters: &DashboardFilters) -> Self {
        Self {
            role: filters.role.as_str().to_string(),
            start: filters.range.start_param(),
            end: filters.range.end_param(),
            plant: filters.plant.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightRequest {
    pub question: String,
    #[serde(rename = "contextFilters")]
    pub context_filters: ContextFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, deserialize_with = "null_as_default")]
    pub computed_metrics: BTreeMap<String, Value>,
    #[serde(default)]
    pub sql_query: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_data: Vec<Value>,
}

/// Body of `POST /insights`. `status` is `success` or `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub causes: Vec<String>,
    #[serde(default, rename = "recommendedActions", deserialize_with = "null_as_default")]
    pub recommended_actions: Vec<String>,
    #[serde(default)]
    pub evidence: Option<Evidence>,
    #[serde(default)]
    pub message: Option<String>,
}

impl InsightResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::PlantFilter;
    use crate::domain::role::Role;

    #[test]
    fn test_request_uses_camel_case_context() {
        let filters = DashboardFilters {
            role: Role::Sales,
            plant: PlantFilter::Named("Guwahati".to_string()),
            ..Default::default()
        };
        let request = InsightRequest {
            question: "Why did OTIF drop?".to_string(),
            context_filters: ContextFilters::from(&filters),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contextFilters"]["plant"], "Guwahati");
        assert_eq!(json["contextFilters"]["role"], "Sales");
        assert_eq!(json["contextFilters"]["start"], "2024-07-01");
    }

    #[test]
    fn test_error_body_is_not_success() {
        let response: InsightResponse = serde_json::from_str(
            r#"{"status": "error", "message": "AI service temporarily unavailable"}"#,
        )
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message.as_deref(), Some("AI service temporarily unavailable"));
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let response: InsightResponse = serde_json::from_str(
            r#"{"status": "success", "summary": null, "causes": null, "recommendedActions": ["Raise AFR"], "evidence": null}"#,
        )
        .unwrap();
        assert!(response.is_success());
        assert_eq!(response.summary, "");
        assert!(response.causes.is_empty());
        assert_eq!(response.recommended_actions, vec!["Raise AFR".to_string()]);
        assert!(response.evidence.is_none());
    }
}
