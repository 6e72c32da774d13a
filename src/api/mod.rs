pub(crate) mod assessments;
pub(crate) mod course_assessments;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod reports;
pub(crate) mod router;
pub(crate) mod semesters;
pub(crate) mod users;
