mod suggestion_repository;

pub use suggestion_repository::{
    PgSuggestionRepository, SuggestionFilter, SuggestionRepository, SuggestionSort,
    SuggestionSortField,
};
