pub(crate) mod course_assessments;
pub(crate) mod generation;
pub(crate) mod grading;
pub(crate) mod lifecycle;
pub(crate) mod results;
pub(crate) mod semesters;
pub(crate) mod submission;
