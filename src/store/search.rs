use crate::domain::types::{City, SearchMode};

use super::network::RoadNetworkStore;

/// What a search found. `Index` holds at most one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult<'a> {
    Index(Option<&'a City>),
    Name(Vec<&'a City>),
}

impl SearchResult<'_> {
    pub fn cities(&self) -> Vec<&City> {
        match self {
            SearchResult::Index(found) => found.iter().copied().collect(),
            SearchResult::Name(found) => found.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SearchResult::Index(found) => found.is_none(),
            SearchResult::Name(found) => found.is_empty(),
        }
    }
}

impl RoadNetworkStore {
    pub fn search_by_index(&self, index: usize) -> Option<&City> {
        self.city(index)
    }

    /// Case-sensitive substring match, in stored order.
    pub fn search_by_name(&self, needle: &str) -> Vec<&City> {
        self.cities()
            .iter()
            .filter(|city| city.name.contains(needle))
            .collect()
    }

    /// Searches by index or name depending on `mode`. An index key that is
    /// not a number matches nothing.
    pub fn search_city(&self, mode: SearchMode, key: &str) -> SearchResult<'_> {
        match mode {
            SearchMode::Index => SearchResult::Index(
                key.trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.search_by_index(index)),
            ),
            SearchMode::Name => SearchResult::Name(self.search_by_name(key)),
        }
    }
}
