use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SuggestionStatus;

/// Per-status tally of a set of suggestions.
///
/// Every status is always present, zero when absent. Recomputed per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    #[serde(rename = "Open")]
    pub open: i64,
    #[serde(rename = "In Progress")]
    pub in_progress: i64,
    #[serde(rename = "Closed")]
    pub closed: i64,
    pub total: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: SuggestionStatus, count: i64) {
        match status {
            SuggestionStatus::Open => self.open += count,
            SuggestionStatus::InProgress => self.in_progress += count,
            SuggestionStatus::Closed => self.closed += count,
        }
        self.total += count;
    }

    /// Fold `(status, count)` rows from a grouped query
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (SuggestionStatus, i64)>,
    {
        pairs.into_iter().fold(Self::default(), |mut counts, (status, n)| {
            counts.add(status, n);
            counts
        })
    }
}

impl FromIterator<SuggestionStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = SuggestionStatus>>(iter: I) -> Self {
        Self::from_pairs(iter.into_iter().map(|status| (status, 1)))
    }
}
