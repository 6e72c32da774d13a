use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::CourseAssessment;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseAssessmentCreate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
    pub(crate) score: f64,
    #[serde(alias = "maxScore")]
    pub(crate) max_score: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseAssessmentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) score: Option<f64>,
    #[serde(default, alias = "maxScore")]
    pub(crate) max_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseAssessmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) title: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseAssessmentResponse {
    pub(crate) fn from_db(record: CourseAssessment) -> Self {
        Self {
            id: record.id,
            course_id: record.course_id,
            title: record.title,
            score: record.score,
            max_score: record.max_score,
            created_at: format_primitive(record.created_at),
            updated_at: format_primitive(record.updated_at),
        }
    }
}
