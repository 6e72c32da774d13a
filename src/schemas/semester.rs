use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

use crate::core::time::{format_date, format_primitive, parse_date};
use crate::db::models::Semester;
use crate::db::types::Season;
use crate::repositories::Grades;
use crate::services::semesters::SemesterDraft;

/// Body of both semester creation and full semester updates.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SemesterInput {
    #[serde(default)]
    #[validate(length(max = 100, message = "name must be at most 100 characters"))]
    pub(crate) name: Option<String>,
    #[validate(range(min = 0, message = "year must not be negative"))]
    pub(crate) year: i32,
    pub(crate) season: Season,
}

impl SemesterInput {
    pub(crate) fn draft(&self) -> SemesterDraft<'_> {
        SemesterDraft { name: self.name.as_deref(), year: self.year, season: self.season }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SemesterSearch {
    #[validate(range(min = 0, message = "year must not be negative"))]
    pub(crate) year: i32,
    pub(crate) season: Season,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SemesterDatesUpdate {
    #[serde(alias = "startDate", deserialize_with = "deserialize_date")]
    pub(crate) start_date: Date,
    #[serde(alias = "endDate", deserialize_with = "deserialize_date")]
    pub(crate) end_date: Date,
}

/// Grade bookkeeping for a semester or a course, on a 4.5 scale.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct GradesUpdate {
    #[serde(default, alias = "targetGrade")]
    #[validate(range(min = 0.0, max = 4.5, message = "target grade must be between 0 and 4.5"))]
    pub(crate) target_grade: Option<f64>,
    #[serde(default, alias = "earnedGrade")]
    #[validate(range(min = 0.0, max = 4.5, message = "earned grade must be between 0 and 4.5"))]
    pub(crate) earned_grade: Option<f64>,
    #[serde(default, alias = "completedCredits")]
    #[validate(range(min = 0, message = "completed credits must not be negative"))]
    pub(crate) completed_credits: Option<i32>,
}

impl GradesUpdate {
    pub(crate) fn grades(&self) -> Grades {
        Grades {
            target_grade: self.target_grade,
            earned_grade: self.earned_grade,
            completed_credits: self.completed_credits,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SemesterResponse {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) name: String,
    pub(crate) year: i32,
    pub(crate) season: Season,
    pub(crate) start_date: Option<String>,
    pub(crate) end_date: Option<String>,
    pub(crate) target_grade: Option<f64>,
    pub(crate) earned_grade: Option<f64>,
    pub(crate) completed_credits: Option<i32>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SemesterResponse {
    pub(crate) fn from_db(semester: Semester) -> Self {
        Self {
            id: semester.id,
            owner_id: semester.owner_id,
            name: semester.name,
            year: semester.year,
            season: semester.season,
            start_date: semester.start_date.map(format_date),
            end_date: semester.end_date.map(format_date),
            target_grade: semester.target_grade,
            earned_grade: semester.earned_grade,
            completed_credits: semester.completed_credits,
            created_at: format_primitive(semester.created_at),
            updated_at: format_primitive(semester.updated_at),
        }
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
}
