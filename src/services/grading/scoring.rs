use std::collections::{HashMap, HashSet};

use crate::db::models::{AssessmentItem, ItemResponse};
use crate::db::types::Correctness;

use super::matcher::{ItemKey, SubmittedAnswer};
use super::GradingError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoredResponse {
    pub(crate) response_id: String,
    pub(crate) item_id: String,
    pub(crate) correctness: Correctness,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradingOutcome {
    pub(crate) scored: Vec<ScoredResponse>,
    pub(crate) score: i32,
    /// Points of every item, essays included.
    pub(crate) max_score: i32,
    pub(crate) essays_pending: bool,
}

/// Grades one user's responses against the items of a single assessment.
///
/// Every item is checked before any response is evaluated, so one untyped item
/// fails the whole pass. Essay responses stay `Ungraded`; every other response
/// ends up `Correct` or `Incorrect`. `scored` follows the order of `responses`.
pub(crate) fn score_responses(
    items: &[AssessmentItem],
    responses: &[ItemResponse],
) -> Result<GradingOutcome, GradingError> {
    let mut keys = HashMap::with_capacity(items.len());
    for item in items {
        keys.insert(item.id.as_str(), (ItemKey::from_item(item)?, item.points));
    }

    let max_score = items.iter().map(|item| item.points).sum();
    let essays_pending = keys.values().any(|(key, _)| matches!(key, ItemKey::Essay));

    let mut score = 0;
    let mut awarded: HashSet<&str> = HashSet::new();
    let mut scored = Vec::with_capacity(responses.len());

    for response in responses {
        let Some((key, points)) = keys.get(response.item_id.as_str()) else {
            return Err(GradingError::ItemNotInAssessment {
                response_id: response.id.clone(),
                item_id: response.item_id.clone(),
            });
        };

        let correctness = match key {
            ItemKey::Essay => Correctness::Ungraded,
            ItemKey::Auto(answer_key) => {
                if answer_key.is_correct(&SubmittedAnswer::from(response)) {
                    Correctness::Correct
                } else {
                    Correctness::Incorrect
                }
            }
        };

        if correctness == Correctness::Correct && awarded.insert(response.item_id.as_str()) {
            score += points;
        }

        scored.push(ScoredResponse {
            response_id: response.id.clone(),
            item_id: response.item_id.clone(),
            correctness,
        });
    }

    Ok(GradingOutcome { scored, score, max_score, essays_pending })
}
