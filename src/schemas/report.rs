use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::time::format_primitive;
use crate::db::models::QuestionReport;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReportCreate {
    #[serde(alias = "assessmentId")]
    pub(crate) assessment_id: String,
    #[serde(alias = "itemId")]
    pub(crate) item_id: String,
    #[validate(
        length(max = 2000, message = "reason must be at most 2000 characters"),
        custom(function = "validate_non_blank", message = "reason must not be blank")
    )]
    pub(crate) reason: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) item_id: String,
    pub(crate) reason: String,
    pub(crate) created_at: String,
}

impl ReportResponse {
    pub(crate) fn from_db(report: QuestionReport) -> Self {
        Self {
            id: report.id,
            assessment_id: report.assessment_id,
            item_id: report.item_id,
            reason: report.reason,
            created_at: format_primitive(report.created_at),
        }
    }
}

fn validate_non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
