mod status_counts;
mod suggestion;

pub use status_counts::StatusCounts;
pub use suggestion::{
    NewSuggestion, Suggestion, SuggestionCategory, SuggestionChanges, SuggestionStatus,
};
