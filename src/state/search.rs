// Search state management.
// Owns the query text, display options, and results; drives cache lookups and fetches.

use std::fmt;

use ratatui::widgets::TableState;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::error::{Result, ScoutError};
use crate::github::{GitHubClient, Repository, repositories_from_payload};

/// Number of rows shown locally. Restricted to the selector's steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageSize(usize);

impl PageSize {
    pub const ALLOWED: [usize; 11] = [5, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

    pub fn new(rows: usize) -> Option<Self> {
        Self::ALLOWED.contains(&rows).then_some(Self(rows))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Next larger size, staying at the largest.
    pub fn next(&self) -> Self {
        let i = self.index();
        Self(Self::ALLOWED[(i + 1).min(Self::ALLOWED.len() - 1)])
    }

    /// Next smaller size, staying at the smallest.
    pub fn prev(&self) -> Self {
        Self(Self::ALLOWED[self.index().saturating_sub(1)])
    }

    fn index(&self) -> usize {
        Self::ALLOWED
            .iter()
            .position(|&n| n == self.0)
            .unwrap_or_default()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(30)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a page size for clap's `value_parser`.
pub fn parse_page_size(s: &str) -> std::result::Result<PageSize, String> {
    let rows: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    PageSize::new(rows).ok_or_else(|| {
        let allowed: Vec<String> = PageSize::ALLOWED.iter().map(|n| n.to_string()).collect();
        format!("page size must be one of {}", allowed.join(", "))
    })
}

/// Column the displayed rows are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Repository name, ascending.
    Name,
    /// Owner login, ascending.
    Owner,
    /// Star count, descending.
    #[default]
    Stars,
    /// Creation timestamp, newest first.
    Created,
}

impl SortKey {
    pub fn title(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Owner => "Owner",
            SortKey::Stars => "Stars",
            SortKey::Created => "Created",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SortKey::Name => SortKey::Owner,
            SortKey::Owner => SortKey::Stars,
            SortKey::Stars => SortKey::Created,
            SortKey::Created => SortKey::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SortKey::Name => SortKey::Created,
            SortKey::Owner => SortKey::Name,
            SortKey::Stars => SortKey::Owner,
            SortKey::Created => SortKey::Stars,
        }
    }
}

/// Stable sort of `repos` by `key`.
pub fn sort_repositories(repos: &mut [&Repository], key: SortKey) {
    match key {
        SortKey::Name => repos.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Owner => repos.sort_by(|a, b| a.owner.login.cmp(&b.owner.login)),
        SortKey::Stars => repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
        SortKey::Created => repos.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Where the current results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    Cache,
    Network,
}

/// What a search trigger did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Nothing to search for, or the URL could not be built.
    Skipped,
    /// Results were adopted from the cache; no request needed.
    CacheHit,
    /// A request to this URL must be made and passed to [`SearchState::complete`].
    Fetch(String),
}

/// Complete state for the search screen.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Text in the search box.
    pub input: String,
    /// Rows shown from the full result list.
    pub page_size: PageSize,
    /// Ordering of the shown rows.
    pub sort_key: SortKey,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message shown in the error region.
    pub error: Option<String>,
    /// Full result list of the last successful search.
    pub results: Vec<Repository>,
    /// Origin of `results`.
    pub origin: Option<ResultOrigin>,
    /// Table selection over the displayed rows.
    pub table_state: TableState,
}

impl SearchState {
    pub fn new(page_size: PageSize, sort_key: SortKey) -> Self {
        Self {
            page_size,
            sort_key,
            ..Self::default()
        }
    }

    /// Append a typed character.
    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Remove the last character. Returns false when the input was empty.
    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// Clear the input. Returns false when it was already empty.
    pub fn clear_input(&mut self) -> bool {
        let changed = !self.input.is_empty();
        self.input.clear();
        changed
    }

    /// The text a trigger would search for.
    pub fn query(&self) -> &str {
        self.input.trim()
    }

    /// Start a search for the current input.
    ///
    /// Consults the cache first. On a miss, marks the state as loading and
    /// returns the URL the caller must fetch.
    pub fn trigger(&mut self, client: &GitHubClient, cache: &ResponseCache) -> Trigger {
        let query = self.query();
        if query.is_empty() {
            return Trigger::Skipped;
        }

        let url = match client.search_url(query) {
            Ok(url) => url,
            Err(e) => {
                self.error = Some(e.to_string());
                return Trigger::Skipped;
            }
        };

        if let Some(payload) = cache.get(&url) {
            match repositories_from_payload(payload) {
                Ok(items) => {
                    debug!(url = %url, count = items.len(), "search cache hit");
                    self.error = None;
                    self.set_results(items, ResultOrigin::Cache);
                    return Trigger::CacheHit;
                }
                Err(e) => warn!(url = %url, error = %e, "ignoring malformed cached search"),
            }
        }

        debug!(url = %url, "search cache miss");
        self.error = None;
        self.loading = true;
        Trigger::Fetch(url)
    }

    /// Apply the outcome of fetching `url`.
    ///
    /// Outcomes are applied in arrival order, so when fetches overlap the
    /// last one to resolve wins. Failures leave the previous results intact.
    pub fn complete(&mut self, url: &str, outcome: Result<Value>, cache: &mut ResponseCache) {
        let parsed = match outcome {
            Ok(payload) => match repositories_from_payload(&payload) {
                Ok(items) => Ok((items, payload)),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        match parsed {
            Ok((items, payload)) => {
                info!(url, count = items.len(), "search completed");
                cache.insert(url, payload);
                self.set_results(items, ResultOrigin::Network);
            }
            Err(ScoutError::Search { message }) => {
                warn!(url, message = %message, "search rejected by provider");
                self.error = Some(message);
            }
            Err(e) => {
                warn!(url, error = %e, "search failed");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Trigger, fetch, and complete in one pass.
    pub async fn search(&mut self, client: &GitHubClient, cache: &mut ResponseCache) -> Trigger {
        let trigger = self.trigger(client, cache);
        if let Trigger::Fetch(url) = &trigger {
            let outcome = client.fetch_json(url).await;
            self.complete(url, outcome, cache);
        }
        trigger
    }

    fn set_results(&mut self, items: Vec<Repository>, origin: ResultOrigin) {
        self.results = items;
        self.origin = Some(origin);
        self.reset_selection();
    }

    /// First `page_size` results, ordered by `sort_key`.
    pub fn displayed(&self) -> Vec<&Repository> {
        let mut rows: Vec<&Repository> = self.results.iter().take(self.page_size.get()).collect();
        sort_repositories(&mut rows, self.sort_key);
        rows
    }

    /// Whether the result table should be drawn.
    pub fn shows_table(&self) -> bool {
        self.error.is_none() && !self.results.is_empty()
    }

    pub fn next_page_size(&mut self) {
        self.page_size = self.page_size.next();
        self.clamp_selection();
    }

    pub fn prev_page_size(&mut self) {
        self.page_size = self.page_size.prev();
        self.clamp_selection();
    }

    pub fn next_sort_key(&mut self) {
        self.sort_key = self.sort_key.next();
    }

    pub fn prev_sort_key(&mut self) {
        self.sort_key = self.sort_key.prev();
    }

    fn displayed_len(&self) -> usize {
        self.results.len().min(self.page_size.get())
    }

    /// Select the next displayed row.
    pub fn select_next(&mut self) {
        let len = self.displayed_len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Select the previous displayed row.
    pub fn select_prev(&mut self) {
        if self.displayed_len() == 0 {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|i| i.saturating_sub(1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    /// The repository under the table cursor.
    pub fn selected_repository(&self) -> Option<&Repository> {
        let index = self.table_state.selected()?;
        self.displayed().get(index).copied()
    }

    fn reset_selection(&mut self) {
        let selected = (self.displayed_len() > 0).then_some(0);
        self.table_state.select(selected);
    }

    fn clamp_selection(&mut self) {
        let len = self.displayed_len();
        if let Some(i) = self.table_state.selected() {
            if i >= len {
                self.table_state.select(len.checked_sub(1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::github::Owner;
    use serde_json::json;

    fn repo(name: &str, owner: &str, stars: u64, created_at: &str) -> Repository {
        Repository {
            name: name.to_string(),
            full_name: format!("{}/{}", owner, name),
            owner: Owner {
                login: owner.to_string(),
            },
            stargazers_count: stars,
            created_at: created_at.to_string(),
            description: None,
            html_url: None,
        }
    }

    fn sample() -> Vec<Repository> {
        vec![
            repo("react", "facebook", 230_000, "2013-05-24T16:15:54Z"),
            repo("vue", "vuejs", 207_000, "2013-07-29T03:24:51Z"),
            repo("angular", "angular", 96_000, "2014-09-18T16:12:01Z"),
            repo("svelte", "sveltejs", 80_000, "2016-11-20T18:13:05Z"),
            repo("preact", "preactjs", 37_000, "2015-09-11T02:40:18Z"),
            repo("solid", "solidjs", 33_000, "2018-04-24T21:02:34Z"),
        ]
    }

    fn client() -> GitHubClient {
        GitHubClient::new("https://api.github.com", None).unwrap()
    }

    fn memory_cache() -> ResponseCache {
        ResponseCache::in_memory(CachePolicy::default())
    }

    #[test]
    fn test_page_size_steps() {
        assert_eq!(PageSize::default().get(), 30);
        assert!(PageSize::new(15).is_none());

        let smallest = PageSize::new(5).unwrap();
        assert_eq!(smallest.prev(), smallest);
        assert_eq!(smallest.next().get(), 10);

        let largest = PageSize::new(100).unwrap();
        assert_eq!(largest.next(), largest);
        assert_eq!(largest.prev().get(), 90);
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("50").unwrap().get(), 50);
        assert!(parse_page_size("7").is_err());
        assert!(parse_page_size("ten").is_err());
    }

    #[test]
    fn test_sort_key_cycle() {
        let mut key = SortKey::Name;
        for _ in 0..4 {
            key = key.next();
        }
        assert_eq!(key, SortKey::Name);
        assert_eq!(SortKey::Name.prev(), SortKey::Created);
    }

    #[test]
    fn test_displayed_row_count_is_min_of_page_size_and_results() {
        let mut state = SearchState::default();
        state.results = sample();

        for rows in PageSize::ALLOWED {
            state.page_size = PageSize::new(rows).unwrap();
            assert_eq!(state.displayed().len(), rows.min(state.results.len()));
        }
    }

    #[test]
    fn test_displayed_slices_before_sorting() {
        let mut state = SearchState::new(PageSize::new(5).unwrap(), SortKey::Name);
        state.results = sample();

        let names: Vec<&str> = state.displayed().iter().map(|r| r.name.as_str()).collect();
        // "solid" is the sixth result and must not appear
        assert_eq!(names, vec!["angular", "preact", "react", "svelte", "vue"]);
    }

    #[test]
    fn test_sort_comparators() {
        let mut state = SearchState::new(PageSize::new(10).unwrap(), SortKey::Stars);
        state.results = sample();
        state.results.reverse();

        let rows = state.displayed();
        assert!(rows.windows(2).all(|w| w[0].stargazers_count >= w[1].stargazers_count));

        state.sort_key = SortKey::Owner;
        let rows = state.displayed();
        assert!(rows.windows(2).all(|w| w[0].owner.login <= w[1].owner.login));

        state.sort_key = SortKey::Created;
        let rows = state.displayed();
        assert!(rows.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(rows[0].name, "solid");
    }

    #[test]
    fn test_empty_query_is_noop() {
        let mut state = SearchState::default();
        state.input = "   ".to_string();

        assert_eq!(state.trigger(&client(), &memory_cache()), Trigger::Skipped);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_trigger_miss_sets_loading_and_clears_error() {
        let mut state = SearchState::default();
        state.input = "react".to_string();
        state.error = Some("old failure".to_string());

        let trigger = state.trigger(&client(), &memory_cache());
        assert_eq!(
            trigger,
            Trigger::Fetch(client().search_url("react").unwrap())
        );
        assert!(state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_trigger_hit_adopts_cached_items() {
        let client = client();
        let mut cache = memory_cache();
        let url = client.search_url("react").unwrap();
        cache.insert(&url, json!({ "total_count": 6, "items": sample() }));

        let mut state = SearchState::default();
        state.input = "react".to_string();

        assert_eq!(state.trigger(&client, &cache), Trigger::CacheHit);
        assert!(!state.loading);
        assert_eq!(state.results, sample());
        assert_eq!(state.origin, Some(ResultOrigin::Cache));
        assert_eq!(state.table_state.selected(), Some(0));
    }

    #[test]
    fn test_complete_success_caches_payload() {
        let mut cache = memory_cache();
        let mut state = SearchState::default();
        state.loading = true;

        let payload = json!({ "total_count": 6, "items": sample() });
        state.complete("url", Ok(payload.clone()), &mut cache);

        assert!(!state.loading);
        assert_eq!(state.results.len(), 6);
        assert_eq!(state.origin, Some(ResultOrigin::Network));
        assert_eq!(cache.get("url"), Some(&payload));
        assert!(state.shows_table());
    }

    #[test]
    fn test_complete_without_items_keeps_results_and_hides_table() {
        let mut cache = memory_cache();
        let mut state = SearchState::default();
        state.results = sample();
        state.loading = true;

        let payload = json!({ "message": "API rate limit exceeded" });
        state.complete("url", Ok(payload), &mut cache);

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("API rate limit exceeded"));
        assert_eq!(state.results, sample());
        assert!(!state.shows_table());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_complete_transport_failure_records_error() {
        let mut cache = memory_cache();
        let mut state = SearchState::default();
        state.loading = true;

        state.complete(
            "url",
            Err(ScoutError::Other("connection reset".to_string())),
            &mut cache,
        );

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("connection reset"));
    }

    #[test]
    fn test_selection_clamped_when_page_shrinks() {
        let mut state = SearchState::new(PageSize::new(10).unwrap(), SortKey::Stars);
        state.results = sample();
        state.reset_selection();
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.table_state.selected(), Some(5));

        state.prev_page_size();
        assert_eq!(state.page_size.get(), 5);
        assert_eq!(state.table_state.selected(), Some(4));
        assert_eq!(state.selected_repository().unwrap().name, "preact");
    }
}
