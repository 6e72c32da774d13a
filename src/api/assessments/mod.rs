//! Exams and quizzes share one router; the mounted kind arrives as an `Extension`.

mod handlers;

use axum::{routing::get, routing::post, Extension, Router};

use crate::core::state::AppState;
use crate::db::types::AssessmentKind;

pub(crate) fn router(kind: AssessmentKind) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_assessment))
        .route("/course/:course_id", get(handlers::list_course_assessments))
        .route("/course/:course_id/results", get(handlers::list_course_results))
        .route("/course/:course_id/average", get(handlers::course_average))
        .route("/course/:course_id/items/liked", get(handlers::list_liked_items))
        .route(
            "/:assessment_id",
            get(handlers::get_assessment)
                .patch(handlers::update_assessment)
                .delete(handlers::delete_assessment),
        )
        .route("/:assessment_id/items", post(handlers::add_generated_items))
        .route("/:assessment_id/submit", post(handlers::submit_assessment))
        .route("/:assessment_id/result", get(handlers::get_result))
        .route("/:assessment_id/items/:item_id/toggle-like", post(handlers::toggle_item_like))
        .layer(Extension(kind))
}

#[cfg(test)]
mod tests;
