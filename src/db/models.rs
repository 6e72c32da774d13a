use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, PrimitiveDateTime};

use crate::db::types::{AssessmentKind, AssessmentStatus, Correctness, QuestionType, Season};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) email: String,
    pub(crate) display_name: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Semester {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) name: String,
    pub(crate) year: i32,
    pub(crate) season: Season,
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) target_grade: Option<f64>,
    pub(crate) earned_grade: Option<f64>,
    pub(crate) completed_credits: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) semester_id: Option<String>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) target_grade: Option<f64>,
    pub(crate) earned_grade: Option<f64>,
    pub(crate) completed_credits: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A manually recorded score for coursework graded outside the service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseAssessment {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) score: f64,
    pub(crate) max_score: f64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) kind: AssessmentKind,
    pub(crate) course_id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) status: AssessmentStatus,
    pub(crate) contents_generated_at: Option<PrimitiveDateTime>,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// A generated question. `question_type` stays nullable so a broken generator
/// output surfaces as a grading error instead of being skipped.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AssessmentItem {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) question: String,
    pub(crate) question_type: Option<QuestionType>,
    pub(crate) explanation: Option<String>,
    pub(crate) is_true_answer: Option<bool>,
    pub(crate) choices: Vec<String>,
    pub(crate) answer_indices: Vec<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) display_order: i32,
    pub(crate) points: i32,
    pub(crate) is_liked: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ItemResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) item_id: String,
    pub(crate) user_id: String,
    pub(crate) selected_bool: Option<bool>,
    pub(crate) selected_indices: Vec<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) correctness: Correctness,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct AssessmentResult {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) user_id: String,
    pub(crate) score: i32,
    pub(crate) max_score: i32,
    pub(crate) feedback: Option<String>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) ended_at: PrimitiveDateTime,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct QuestionReport {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) item_id: String,
    pub(crate) user_id: String,
    pub(crate) reason: String,
    pub(crate) created_at: PrimitiveDateTime,
}
