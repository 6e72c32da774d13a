use time::PrimitiveDateTime;

use crate::db::models::QuestionReport;

const COLUMNS: &str = "id, assessment_id, item_id, user_id, reason, created_at";

pub(crate) struct CreateReport<'a> {
    pub id: &'a str,
    pub assessment_id: &'a str,
    pub item_id: &'a str,
    pub user_id: &'a str,
    pub reason: &'a str,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateReport<'_>,
) -> Result<QuestionReport, sqlx::Error> {
    sqlx::query_as::<_, QuestionReport>(&format!(
        "INSERT INTO question_reports (id, assessment_id, item_id, user_id, reason, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.assessment_id)
    .bind(params.item_id)
    .bind(params.user_id)
    .bind(params.reason)
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<Option<QuestionReport>, sqlx::Error> {
    sqlx::query_as::<_, QuestionReport>(&format!(
        "SELECT {COLUMNS} FROM question_reports WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn list_by_user(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
) -> Result<Vec<QuestionReport>, sqlx::Error> {
    sqlx::query_as::<_, QuestionReport>(&format!(
        "SELECT {COLUMNS}
         FROM question_reports
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM question_reports WHERE id = $1").bind(id).execute(executor).await?;
    Ok(())
}
