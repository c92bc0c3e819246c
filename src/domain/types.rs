use super::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub index: usize,
    pub name: String,
}

/// Rejects names that would corrupt a tab-separated line or read back as
/// nothing: empty, or containing a tab or line break.
pub fn validate_city_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.contains(&['\t', '\n', '\r'][..]) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A road as listed in views and the roads file. `id` is assigned by scan
/// order every time the list is produced and is not stable across saves.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    pub id: usize,
    pub from: usize,
    pub to: usize,
    pub name: String,
    pub budget: f64,
}

/// Result of one name in an `add_cities` batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityOutcome {
    Added(City),
    Duplicate(String),
    Invalid(String),
}

impl CityOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, CityOutcome::Added(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Index,
    Name,
}

impl SearchMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "i" => Some(SearchMode::Index),
            "n" => Some(SearchMode::Name),
            _ => None,
        }
    }
}

/// Counts reported by `RoadNetworkStore::load`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub cities: usize,
    pub roads: usize,
    pub skipped_cities: usize,
    pub skipped_roads: usize,
}
