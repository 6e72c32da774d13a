use std::fmt;

use thiserror::Error;

use crate::db::types::AssessmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleEvent {
    ItemsGenerated,
    Submitted,
    Graded { essays_pending: bool },
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemsGenerated => f.write_str("items_generated"),
            Self::Submitted => f.write_str("submitted"),
            Self::Graded { essays_pending: false } => f.write_str("graded"),
            Self::Graded { essays_pending: true } => f.write_str("graded_with_essays_pending"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LifecycleError {
    #[error("cannot apply {event} to an assessment in status {from}")]
    InvalidTransition { from: AssessmentStatus, event: LifecycleEvent },
}

impl AssessmentStatus {
    /// The status reached from `self` on `event`. Nothing moves backwards.
    pub(crate) fn next(self, event: LifecycleEvent) -> Result<Self, LifecycleError> {
        match (self, event) {
            (Self::GenerateInProgress, LifecycleEvent::ItemsGenerated) => Ok(Self::NotStarted),
            (Self::NotStarted, LifecycleEvent::Submitted) => Ok(Self::Submitted),
            (Self::Submitted, LifecycleEvent::Graded { essays_pending: false }) => Ok(Self::Graded),
            (Self::Submitted, LifecycleEvent::Graded { essays_pending: true }) => {
                Ok(Self::PartiallyGraded)
            }
            (from, event) => Err(LifecycleError::InvalidTransition { from, event }),
        }
    }

    pub(crate) fn accepts_submission(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub(crate) fn has_result(self) -> bool {
        matches!(self, Self::Graded | Self::PartiallyGraded)
    }
}
