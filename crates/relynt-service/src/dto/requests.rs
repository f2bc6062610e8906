//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Validation runs inside the services, after the caller's identity is known.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::{Validate, ValidationError};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be empty"));
        return Err(err);
    }
    Ok(())
}

fn json_object(value: &JsonValue) -> Result<(), ValidationError> {
    if value.is_object() {
        return Ok(());
    }
    let mut err = ValidationError::new("not_object");
    err.message = Some(Cow::Borrowed("must be a JSON object"));
    Err(err)
}

// ============================================================================
// Audit Log Requests
// ============================================================================

/// Record one AI action
///
/// Missing summaries deserialize as empty strings so they surface as
/// validation errors rather than body rejections. A `risk_level` field in the
/// body is ignored; the level is always computed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RecordAuditLogRequest {
    /// Defaults to the configured action when absent or blank
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub input_summary: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub output_summary: String,

    #[validate(custom(function = "json_object"))]
    pub metadata: Option<JsonValue>,
}

/// Audit log listing parameters (query string)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListAuditLogsQuery {
    /// `low`, `medium`, `high` or `all`
    pub risk_level: Option<String>,

    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub search: Option<String>,

    /// RFC 3339 lower bound on `created_at`
    pub since: Option<DateTime<Utc>>,

    /// Keyset cursor: id of the last entry of the previous page
    pub before: Option<String>,

    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub limit: Option<i64>,
}

// ============================================================================
// Risk Requests
// ============================================================================

/// Risk overview window (query string)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RiskSummaryQuery {
    #[validate(range(min = 1, max = 90, message = "must be between 1 and 90"))]
    pub days: Option<u32>,
}

impl RiskSummaryQuery {
    pub const DEFAULT_DAYS: u32 = 7;

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(Self::DEFAULT_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(input: &str, output: &str) -> RecordAuditLogRequest {
        RecordAuditLogRequest {
            input_summary: input.to_string(),
            output_summary: output.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("hello", "hi").validate().is_ok());
    }

    #[test]
    fn test_blank_summaries_rejected() {
        let errors = request("", "hi").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("input_summary"));

        let errors = request("hello", "   ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("output_summary"));
    }

    #[test]
    fn test_metadata_must_be_object() {
        let mut req = request("hello", "hi");
        req.metadata = Some(json!(["not", "an", "object"]));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("metadata"));

        req.metadata = Some(json!({"model": "gpt-4o", "tokens": 12}));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_body_deserialization_ignores_risk_level() {
        let req: RecordAuditLogRequest = serde_json::from_value(json!({
            "input_summary": "hello",
            "output_summary": "hi",
            "risk_level": "low"
        }))
        .unwrap();
        assert_eq!(req.input_summary, "hello");
        assert!(req.action.is_none());
    }

    #[test]
    fn test_missing_summary_defaults_to_empty() {
        let req: RecordAuditLogRequest =
            serde_json::from_value(json!({"output_summary": "hi"})).unwrap();
        assert!(req.input_summary.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_list_query_limit_range() {
        let query = ListAuditLogsQuery {
            limit: Some(500),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_risk_summary_days() {
        assert_eq!(RiskSummaryQuery::default().days(), 7);
        assert!(RiskSummaryQuery { days: Some(0) }.validate().is_err());
        assert!(RiskSummaryQuery { days: Some(91) }.validate().is_err());
        assert!(RiskSummaryQuery { days: Some(30) }.validate().is_ok());
    }
}
