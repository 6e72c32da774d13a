use sqlx::PgPool;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::core::time::primitive_now_utc;
use crate::db::models::Semester;
use crate::db::types::Season;
use crate::repositories::{self, Grades};

#[derive(Debug, Error)]
pub(crate) enum SemesterError {
    #[error("semester not found")]
    NotFound,
    #[error("semester belongs to another user")]
    NotOwner,
    #[error("a {season} {year} semester already exists")]
    Duplicate { year: i32, season: Season },
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: Date, end: Date },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Name, year and season of a semester as submitted by its owner.
pub(crate) struct SemesterDraft<'a> {
    pub(crate) name: Option<&'a str>,
    pub(crate) year: i32,
    pub(crate) season: Season,
}

impl SemesterDraft<'_> {
    /// A blank name falls back to `<year>-<season>`, e.g. `2025-spring`.
    pub(crate) fn resolved_name(&self) -> String {
        match self.name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}-{}", self.year, self.season),
        }
    }
}

pub(crate) fn check_dates(start: Date, end: Date) -> Result<(), SemesterError> {
    if end < start {
        return Err(SemesterError::EndBeforeStart { start, end });
    }
    Ok(())
}

pub(crate) async fn load_owned(
    db: &PgPool,
    owner_id: &str,
    semester_id: &str,
) -> Result<Semester, SemesterError> {
    let semester = repositories::semesters::find_by_id(db, semester_id)
        .await?
        .ok_or(SemesterError::NotFound)?;
    if semester.owner_id != owner_id {
        return Err(SemesterError::NotOwner);
    }
    Ok(semester)
}

pub(crate) async fn find_by_year_season(
    db: &PgPool,
    owner_id: &str,
    year: i32,
    season: Season,
) -> Result<Semester, SemesterError> {
    repositories::semesters::find_by_owner_year_season(db, owner_id, year, season)
        .await?
        .ok_or(SemesterError::NotFound)
}

pub(crate) async fn create_semester(
    db: &PgPool,
    owner_id: &str,
    draft: SemesterDraft<'_>,
) -> Result<Semester, SemesterError> {
    let name = draft.resolved_name();
    let semester = repositories::semesters::insert_if_absent(
        db,
        repositories::semesters::CreateSemester {
            id: &Uuid::new_v4().to_string(),
            owner_id,
            name: &name,
            year: draft.year,
            season: draft.season,
            created_at: primitive_now_utc(),
        },
    )
    .await?
    .ok_or(SemesterError::Duplicate { year: draft.year, season: draft.season })?;

    tracing::info!(
        semester_id = %semester.id,
        owner_id = %owner_id,
        year = semester.year,
        season = semester.season.as_str(),
        "Semester created"
    );

    Ok(semester)
}

pub(crate) async fn update_semester(
    db: &PgPool,
    owner_id: &str,
    semester_id: &str,
    draft: SemesterDraft<'_>,
) -> Result<Semester, SemesterError> {
    let semester = load_owned(db, owner_id, semester_id).await?;
    let name = draft.resolved_name();

    let updated = repositories::semesters::update_details(
        db,
        &semester.id,
        &name,
        draft.year,
        draft.season,
        primitive_now_utc(),
    )
    .await;

    match updated {
        Ok(Some(semester)) => Ok(semester),
        Ok(None) => Err(SemesterError::NotFound),
        Err(err) if is_unique_violation(&err) => {
            Err(SemesterError::Duplicate { year: draft.year, season: draft.season })
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) async fn update_dates(
    db: &PgPool,
    owner_id: &str,
    semester_id: &str,
    start: Date,
    end: Date,
) -> Result<Semester, SemesterError> {
    check_dates(start, end)?;
    let semester = load_owned(db, owner_id, semester_id).await?;

    repositories::semesters::update_dates(db, &semester.id, start, end, primitive_now_utc())
        .await?
        .ok_or(SemesterError::NotFound)
}

pub(crate) async fn update_grades(
    db: &PgPool,
    owner_id: &str,
    semester_id: &str,
    grades: &Grades,
) -> Result<Semester, SemesterError> {
    let semester = load_owned(db, owner_id, semester_id).await?;

    repositories::semesters::update_grades(db, &semester.id, grades, primitive_now_utc())
        .await?
        .ok_or(SemesterError::NotFound)
}

/// Deletes the semester together with its courses and their records.
pub(crate) async fn delete_semester(
    db: &PgPool,
    owner_id: &str,
    semester_id: &str,
) -> Result<(), SemesterError> {
    let semester = load_owned(db, owner_id, semester_id).await?;
    repositories::semesters::delete_by_id(db, &semester.id).await?;

    tracing::info!(semester_id = %semester.id, owner_id = %owner_id, "Semester deleted");
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error().is_some_and(|db_err| db_err.is_unique_violation())
}
