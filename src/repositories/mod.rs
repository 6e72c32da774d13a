pub(crate) mod assessments;
pub(crate) mod course_assessments;
pub(crate) mod courses;
pub(crate) mod health;
pub(crate) mod items;
pub(crate) mod reports;
pub(crate) mod responses;
pub(crate) mod results;
pub(crate) mod semesters;
pub(crate) mod users;

/// Grade bookkeeping shared by semesters and courses.
pub(crate) struct Grades {
    pub target_grade: Option<f64>,
    pub earned_grade: Option<f64>,
    pub completed_credits: Option<i32>,
}
