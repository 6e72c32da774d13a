use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Course;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseCreate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default, alias = "semesterId")]
    pub(crate) semester_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CourseUpdate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) semester_id: Option<String>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) target_grade: Option<f64>,
    pub(crate) earned_grade: Option<f64>,
    pub(crate) completed_credits: Option<i32>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            owner_id: course.owner_id,
            semester_id: course.semester_id,
            title: course.title,
            description: course.description,
            target_grade: course.target_grade,
            earned_grade: course.earned_grade,
            completed_credits: course.completed_credits,
            created_at: format_primitive(course.created_at),
            updated_at: format_primitive(course.updated_at),
        }
    }
}
