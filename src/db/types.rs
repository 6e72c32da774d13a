use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "assessmentkind", rename_all = "lowercase")]
pub(crate) enum AssessmentKind {
    Exam,
    Quiz,
}

impl AssessmentKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Exam => "exam",
            Self::Quiz => "quiz",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Exam => "Exam",
            Self::Quiz => "Quiz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "assessmentstatus", rename_all = "snake_case")]
pub(crate) enum AssessmentStatus {
    GenerateInProgress,
    NotStarted,
    Submitted,
    PartiallyGraded,
    Graded,
}

impl AssessmentStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::GenerateInProgress => "generate_in_progress",
            Self::NotStarted => "not_started",
            Self::Submitted => "submitted",
            Self::PartiallyGraded => "partially_graded",
            Self::Graded => "graded",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "questiontype", rename_all = "snake_case")]
pub(crate) enum QuestionType {
    TrueOrFalse,
    MultipleChoice,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// Points an item of this type is worth when the generator does not say.
    pub(crate) fn default_points(self) -> i32 {
        match self {
            Self::TrueOrFalse => 1,
            Self::MultipleChoice => 3,
            Self::ShortAnswer => 5,
            Self::Essay => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "correctness", rename_all = "lowercase")]
pub(crate) enum Correctness {
    Ungraded,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "season", rename_all = "lowercase")]
pub(crate) enum Season {
    #[serde(alias = "SPRING", alias = "Spring")]
    Spring,
    #[serde(alias = "SUMMER", alias = "Summer")]
    Summer,
    #[serde(alias = "FALL", alias = "Fall")]
    Fall,
    #[serde(alias = "WINTER", alias = "Winter")]
    Winter,
}

impl Season {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
