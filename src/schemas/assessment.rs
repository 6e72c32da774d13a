use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::{format_optional, format_primitive};
use crate::db::models::{Assessment, AssessmentItem, AssessmentResult, ItemResponse};
use crate::db::types::{AssessmentKind, AssessmentStatus, Correctness, QuestionType};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentCreate {
    #[serde(alias = "courseId")]
    pub(crate) course_id: String,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentUpdate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
}

/// Items produced by the external generator for one assessment.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GeneratedItemsCreate {
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub(crate) items: Vec<GeneratedItem>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct GeneratedItem {
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub(crate) question: String,
    #[serde(default, alias = "questionType")]
    pub(crate) question_type: Option<QuestionType>,
    #[serde(default)]
    pub(crate) explanation: Option<String>,
    #[serde(default, alias = "isTrueAnswer")]
    pub(crate) is_true_answer: Option<bool>,
    #[serde(default)]
    pub(crate) choices: Vec<String>,
    #[serde(default, alias = "answerIndices")]
    pub(crate) answer_indices: Vec<i32>,
    #[serde(default, alias = "textAnswer")]
    pub(crate) text_answer: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1000, message = "points must be between 0 and 1000"))]
    pub(crate) points: Option<i32>,
}

impl GeneratedItem {
    /// Explicit points win; otherwise the question type decides. Untyped items are worth nothing.
    pub(crate) fn resolved_points(&self) -> i32 {
        self.points
            .or_else(|| self.question_type.map(QuestionType::default_points))
            .unwrap_or(0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionCreate {
    pub(crate) answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AnswerSubmission {
    #[serde(alias = "itemId")]
    pub(crate) item_id: String,
    #[serde(default, alias = "selectedBool")]
    pub(crate) selected_bool: Option<bool>,
    #[serde(default, alias = "selectedIndices")]
    pub(crate) selected_indices: Vec<i32>,
    #[serde(default, alias = "textAnswer")]
    pub(crate) text_answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) kind: AssessmentKind,
    pub(crate) course_id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) status: AssessmentStatus,
    pub(crate) contents_generated_at: Option<String>,
    pub(crate) submitted_at: Option<String>,
    pub(crate) graded_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) items: Option<Vec<ItemView>>,
}

impl AssessmentResponse {
    pub(crate) fn from_db(assessment: Assessment) -> Self {
        Self {
            id: assessment.id,
            kind: assessment.kind,
            course_id: assessment.course_id,
            owner_id: assessment.owner_id,
            title: assessment.title,
            status: assessment.status,
            contents_generated_at: format_optional(assessment.contents_generated_at),
            submitted_at: format_optional(assessment.submitted_at),
            graded_at: format_optional(assessment.graded_at),
            created_at: format_primitive(assessment.created_at),
            updated_at: format_primitive(assessment.updated_at),
            items: None,
        }
    }

    /// Answer keys are only revealed once the assessment carries a result.
    pub(crate) fn with_items(assessment: Assessment, items: Vec<AssessmentItem>) -> Self {
        let reveal = assessment.status.has_result();
        let items = items.into_iter().map(|item| ItemView::from_db(item, reveal)).collect();
        Self { items: Some(items), ..Self::from_db(assessment) }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ItemView {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) question: String,
    pub(crate) question_type: Option<QuestionType>,
    pub(crate) choices: Vec<String>,
    pub(crate) display_order: i32,
    pub(crate) points: i32,
    pub(crate) is_liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) answer: Option<AnswerKeyView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerKeyView {
    pub(crate) is_true_answer: Option<bool>,
    pub(crate) answer_indices: Vec<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) explanation: Option<String>,
}

impl ItemView {
    pub(crate) fn from_db(item: AssessmentItem, reveal: bool) -> Self {
        let answer = reveal.then(|| AnswerKeyView {
            is_true_answer: item.is_true_answer,
            answer_indices: item.answer_indices,
            text_answer: item.text_answer,
            explanation: item.explanation,
        });

        Self {
            id: item.id,
            assessment_id: item.assessment_id,
            question: item.question,
            question_type: item.question_type,
            choices: item.choices,
            display_order: item.display_order,
            points: item.points,
            is_liked: item.is_liked,
            answer,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResponseView {
    pub(crate) id: String,
    pub(crate) item_id: String,
    pub(crate) selected_bool: Option<bool>,
    pub(crate) selected_indices: Vec<i32>,
    pub(crate) text_answer: Option<String>,
    pub(crate) correctness: Correctness,
}

impl ResponseView {
    pub(crate) fn from_db(response: ItemResponse) -> Self {
        Self {
            id: response.id,
            item_id: response.item_id,
            selected_bool: response.selected_bool,
            selected_indices: response.selected_indices,
            text_answer: response.text_answer,
            correctness: response.correctness,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultView {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) user_id: String,
    pub(crate) score: i32,
    pub(crate) max_score: i32,
    pub(crate) feedback: Option<String>,
    pub(crate) started_at: String,
    pub(crate) ended_at: String,
    pub(crate) created_at: String,
}

impl ResultView {
    pub(crate) fn from_db(result: AssessmentResult) -> Self {
        Self {
            id: result.id,
            assessment_id: result.assessment_id,
            user_id: result.user_id,
            score: result.score,
            max_score: result.max_score,
            feedback: result.feedback,
            started_at: format_primitive(result.started_at),
            ended_at: format_primitive(result.ended_at),
            created_at: format_primitive(result.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) assessment_id: String,
    pub(crate) status: AssessmentStatus,
    pub(crate) responses: Vec<ResponseView>,
    pub(crate) result: ResultView,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultElement {
    pub(crate) item: ItemView,
    pub(crate) response: Option<ResponseView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultDetailResponse {
    pub(crate) assessment: AssessmentResponse,
    pub(crate) result: ResultView,
    pub(crate) elements: Vec<ResultElement>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResultResponse {
    pub(crate) id: String,
    pub(crate) assessment_id: String,
    pub(crate) assessment_title: String,
    pub(crate) user_id: String,
    pub(crate) score: i32,
    pub(crate) max_score: i32,
    pub(crate) started_at: String,
    pub(crate) ended_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseAverageResponse {
    pub(crate) course_id: String,
    pub(crate) kind: AssessmentKind,
    pub(crate) average_percent: f64,
    pub(crate) results_counted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_or_false_item_without_points_is_worth_one() {
        let item: GeneratedItem = serde_json::from_value(serde_json::json!({
            "question": "Is the JVM a virtual machine?",
            "question_type": "true_or_false",
            "is_true_answer": true
        }))
        .expect("item");

        assert_eq!(item.points, None);
        assert_eq!(item.resolved_points(), 1);
        assert_eq!(item.question_type, Some(QuestionType::TrueOrFalse));
        assert!(item.validate().is_ok());
    }

    #[test]
    fn multiple_choice_item_without_points_is_worth_three() {
        let item: GeneratedItem = serde_json::from_value(serde_json::json!({
            "question": "Which are JVM languages?",
            "questionType": "multiple_choice",
            "choices": ["Kotlin", "Go", "Scala"],
            "answerIndices": [0, 2]
        }))
        .expect("item");

        assert_eq!(item.resolved_points(), 3);
    }

    #[test]
    fn explicit_points_override_type_default() {
        let item: GeneratedItem = serde_json::from_value(serde_json::json!({
            "question": "Describe the garbage collector",
            "questionType": "essay",
            "points": 25
        }))
        .expect("item");

        assert_eq!(item.resolved_points(), 25);
    }

    #[test]
    fn untyped_item_without_points_is_worth_nothing() {
        let item: GeneratedItem = serde_json::from_value(serde_json::json!({
            "question": "???"
        }))
        .expect("item");

        assert_eq!(item.resolved_points(), 0);
    }

    #[test]
    fn generated_items_require_at_least_one_item() {
        let payload = GeneratedItemsCreate { items: Vec::new() };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn negative_points_are_rejected() {
        let item: GeneratedItem = serde_json::from_value(serde_json::json!({
            "question": "Pick one",
            "questionType": "multiple_choice",
            "points": -1
        }))
        .expect("item");

        assert!(item.validate().is_err());
    }
}
