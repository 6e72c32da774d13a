use time::PrimitiveDateTime;

use crate::db::models::ItemResponse;
use crate::db::types::Correctness;

pub(crate) const COLUMNS: &str = "\
    id, assessment_id, item_id, user_id, selected_bool, selected_indices, text_answer, \
    correctness, created_at, updated_at";

pub(crate) struct CreateResponse<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub item_id: &'a str,
    pub user_id: &'a str,
    pub selected_bool: Option<bool>,
    pub selected_indices: &'a [i32],
    pub text_answer: Option<&'a str>,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateResponse<'_>,
) -> Result<ItemResponse, sqlx::Error> {
    sqlx::query_as::<_, ItemResponse>(&format!(
        "INSERT INTO item_responses (
            id, assessment_id, item_id, user_id, selected_bool, selected_indices,
            text_answer, correctness, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.item_id)
    .bind(params.user_id)
    .bind(params.selected_bool)
    .bind(params.selected_indices)
    .bind(params.text_answer)
    .bind(Correctness::Ungraded)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list_by_assessment_user(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
    user_id: &str,
) -> Result<Vec<ItemResponse>, sqlx::Error> {
    sqlx::query_as::<_, ItemResponse>(&format!(
        "SELECT {COLUMNS}
         FROM item_responses
         WHERE assessment_id = $1 AND user_id = $2
         ORDER BY created_at, id"
    ))
    .bind(assessment_id)
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn update_correctness(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    correctness: Correctness,
    now: PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE item_responses SET correctness = $1, updated_at = $2 WHERE id = $3")
        .bind(correctness)
        .bind(now)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}
