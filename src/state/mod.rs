// State management module.
// Handles the search query, its results, and the debounced trigger.

pub mod debounce;
pub mod search;

pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use search::{
    PageSize, ResultOrigin, SearchState, SortKey, Trigger, parse_page_size, sort_repositories,
};
