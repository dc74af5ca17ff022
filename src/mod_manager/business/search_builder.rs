use crate::mod_manager::business::view_cache::{ViewStateCache, keys};
use crate::mod_manager::domain::{
    CategorySelection, ModType, SearchFilters, SearchRequest, SearchResultPage, SearchTicket,
    SortOrder, TypeSelection, TypeToggle,
};
use std::sync::Arc;

/// Builds search requests from the cached filter state and folds responses back.
///
/// Filter inputs are written to the cache when a request is prepared; responses
/// only ever replace the result page, the page number and the scroll offset.
/// Every request gets a ticket and only the newest ticket's response is applied.
pub struct SearchBuilder {
    cache: ViewStateCache,
    default_sort: SortOrder,
    last_ticket: u64,
    latest: Option<SearchTicket>,
    loading: bool,
}

impl SearchBuilder {
    pub fn new(cache: ViewStateCache, default_sort: SortOrder) -> Self {
        Self {
            cache,
            default_sort,
            last_ticket: 0,
            latest: None,
            loading: false,
        }
    }

    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.cache.get(keys::SEARCH_QUERY, String::new()),
            page: self.cache.get(keys::SEARCH_PAGE, 0usize),
            sort_order: self.cache.get(keys::SEARCH_SORT_ORDER, self.default_sort),
            categories: self
                .cache
                .get(keys::SEARCH_CATEGORIES, CategorySelection::new()),
            types: self.cache.get(keys::SEARCH_TYPES, TypeSelection::default()),
        }
    }

    pub fn results(&self) -> Arc<SearchResultPage> {
        self.cache.get(keys::SEARCH_DATA, Arc::default())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn latest_ticket(&self) -> Option<SearchTicket> {
        self.latest
    }

    /// Nothing cached yet and nothing typed.
    pub fn needs_initial_search(&self) -> bool {
        self.results().is_empty() && self.filters().query.is_empty()
    }

    pub fn prepare(
        &mut self,
        query: &str,
        page: usize,
        sort: SortOrder,
        show_loading: bool,
    ) -> (SearchTicket, SearchRequest) {
        self.cache.set(keys::SEARCH_QUERY, query.to_string());
        self.cache.set(keys::SEARCH_SORT_ORDER, sort);
        self.loading = show_loading;

        self.last_ticket += 1;
        let ticket = SearchTicket(self.last_ticket);
        self.latest = Some(ticket);

        let mut filters = self.filters();
        filters.page = page;
        (ticket, filters.to_request())
    }

    /// Returns whether the response was current and got applied.
    pub fn apply_results(
        &mut self,
        ticket: SearchTicket,
        page: usize,
        results: SearchResultPage,
    ) -> bool {
        if self.latest != Some(ticket) {
            log::debug!("Discarding stale search response {ticket:?}");
            return false;
        }
        self.cache.set(keys::SEARCH_DATA, Arc::new(results));
        self.cache.set(keys::SEARCH_PAGE, page);
        self.cache.set(keys::SEARCH_SCROLL_POSITION, 0.0f32);
        self.loading = false;
        true
    }

    pub fn apply_failure(&mut self, ticket: SearchTicket, error: &str) {
        log::warn!("Search {ticket:?} failed: {error}");
        if self.latest == Some(ticket) {
            self.loading = false;
        }
    }

    pub fn toggle_type(&mut self, mod_type: ModType) -> TypeToggle {
        self.cache
            .update(keys::SEARCH_TYPES, TypeSelection::default(), |types| {
                types.cycle(mod_type)
            })
    }

    pub fn set_category(&mut self, category: &str, selected: bool) {
        self.cache
            .update(keys::SEARCH_CATEGORIES, CategorySelection::new(), |c| {
                c.insert(category.to_string(), selected);
            });
    }

    pub fn clear_filters(&mut self) {
        self.cache
            .set(keys::SEARCH_TYPES, TypeSelection::default());
        self.cache
            .update(keys::SEARCH_CATEGORIES, CategorySelection::new(), |c| {
                c.values_mut().for_each(|selected| *selected = false);
            });
    }
}
