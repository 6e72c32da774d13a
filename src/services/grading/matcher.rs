use std::collections::BTreeSet;

use crate::db::models::{AssessmentItem, ItemResponse};
use crate::db::types::QuestionType;

use super::GradingError;

/// How an item is graded. Essays never reach the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ItemKey<'a> {
    Essay,
    Auto(AnswerKey<'a>),
}

/// Canonical answer of an automatically graded item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AnswerKey<'a> {
    TrueOrFalse { is_true_answer: Option<bool> },
    MultipleChoice { answer_indices: Option<BTreeSet<i32>> },
    ShortAnswer { text_answer: Option<&'a str> },
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SubmittedAnswer<'a> {
    pub(crate) selected_bool: Option<bool>,
    pub(crate) selected_indices: &'a [i32],
    pub(crate) text_answer: Option<&'a str>,
}

impl<'a> ItemKey<'a> {
    pub(crate) fn from_item(item: &'a AssessmentItem) -> Result<Self, GradingError> {
        let question_type = item
            .question_type
            .ok_or_else(|| GradingError::InvalidQuestionType { item_id: item.id.clone() })?;

        let key = match question_type {
            QuestionType::Essay => return Ok(Self::Essay),
            QuestionType::TrueOrFalse => {
                AnswerKey::TrueOrFalse { is_true_answer: item.is_true_answer }
            }
            QuestionType::MultipleChoice => AnswerKey::MultipleChoice {
                answer_indices: (!item.answer_indices.is_empty())
                    .then(|| item.answer_indices.iter().copied().collect()),
            },
            QuestionType::ShortAnswer => {
                AnswerKey::ShortAnswer { text_answer: item.text_answer.as_deref() }
            }
        };

        Ok(Self::Auto(key))
    }
}

impl AnswerKey<'_> {
    /// A key without a canonical answer never matches.
    pub(crate) fn is_correct(&self, answer: &SubmittedAnswer<'_>) -> bool {
        match self {
            Self::TrueOrFalse { is_true_answer } => match (is_true_answer, answer.selected_bool) {
                (Some(expected), Some(selected)) => *expected == selected,
                _ => false,
            },
            Self::MultipleChoice { answer_indices } => {
                let Some(expected) = answer_indices else {
                    return false;
                };
                let selected: BTreeSet<i32> = answer.selected_indices.iter().copied().collect();
                selected == *expected
            }
            // Exact and case-sensitive.
            Self::ShortAnswer { text_answer } => match (text_answer, answer.text_answer) {
                (Some(expected), Some(submitted)) => *expected == submitted,
                _ => false,
            },
        }
    }
}

impl<'a> From<&'a ItemResponse> for SubmittedAnswer<'a> {
    fn from(response: &'a ItemResponse) -> Self {
        Self {
            selected_bool: response.selected_bool,
            selected_indices: &response.selected_indices,
            text_answer: response.text_answer.as_deref(),
        }
    }
}
