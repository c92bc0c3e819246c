use std::collections::HashMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{debug, info, span, warn, Level};

use crate::config::constant::ROAD_NAME_SEPARATOR;
use crate::config::StoreConfig;
use crate::domain::types::{validate_city_name, City, CityOutcome, LoadSummary, Road};
use crate::domain::{StoreError, SymmetricMatrix};
use crate::storage::files::{read_cities, read_roads, road_name, write_cities, write_roads};

/// Cities plus the road and budget matrices, kept in sync with two files.
///
/// Position `p` in both matrices is the city whose index is `p + 1`. Every
/// successful mutation rewrites both files before returning.
#[derive(Debug, Clone)]
pub struct RoadNetworkStore {
    cities_path: PathBuf,
    roads_path: PathBuf,
    cities: Vec<City>,
    positions: HashMap<String, usize>,
    roads: SymmetricMatrix<bool>,
    budgets: SymmetricMatrix<f64>,
}

impl RoadNetworkStore {
    /// An empty store bound to the given files. Nothing is read or written.
    pub fn new(cities_path: impl Into<PathBuf>, roads_path: impl Into<PathBuf>) -> Self {
        Self {
            cities_path: cities_path.into(),
            roads_path: roads_path.into(),
            cities: Vec::new(),
            positions: HashMap::new(),
            roads: SymmetricMatrix::new(0),
            budgets: SymmetricMatrix::new(0),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.cities_path, &config.roads_path)
    }

    /// Replaces the in-memory dataset with the contents of both files.
    ///
    /// Malformed lines, duplicate city names and roads naming unknown cities
    /// are dropped; they only show up in `debug!` logs and the summary.
    pub fn load(&mut self) -> Result<LoadSummary, StoreError> {
        let load_span = span!(Level::INFO, "load");
        let _guard = load_span.enter();

        let city_lines = read_cities(&self.cities_path)?;
        let road_lines = read_roads(&self.roads_path)?;

        let mut summary = LoadSummary {
            skipped_cities: city_lines.skipped,
            skipped_roads: road_lines.skipped,
            ..LoadSummary::default()
        };

        let mut cities: Vec<City> = Vec::with_capacity(city_lines.records.len());
        let mut positions = HashMap::new();
        for record in city_lines.records {
            if positions.contains_key(&record.name) {
                debug!("Dropping duplicate city {:?}", record.name);
                summary.skipped_cities += 1;
                continue;
            }
            let index = cities.len() + 1;
            if record.index != index {
                debug!(
                    "City {:?} stored as index {}, renumbered to {}",
                    record.name, record.index, index
                );
            }
            positions.insert(record.name.clone(), cities.len());
            cities.push(City {
                index,
                name: record.name,
            });
        }

        let n = cities.len();
        let mut roads = SymmetricMatrix::new(n);
        let mut budgets = SymmetricMatrix::new(n);
        for record in road_lines.records {
            match (positions.get(&record.first), positions.get(&record.second)) {
                (Some(&i), Some(&j)) if i != j => {
                    roads.set(i, j, true);
                    budgets.set(i, j, record.budget);
                    summary.roads += 1;
                }
                _ => {
                    debug!(
                        "Dropping road {}{}{}: unknown endpoint",
                        record.first, ROAD_NAME_SEPARATOR, record.second
                    );
                    summary.skipped_roads += 1;
                }
            }
        }

        summary.cities = n;
        self.cities = cities;
        self.positions = positions;
        self.roads = roads;
        self.budgets = budgets;

        info!(
            "Loaded {} cities and {} road lines ({} city lines, {} road lines skipped)",
            summary.cities, summary.roads, summary.skipped_cities, summary.skipped_roads
        );
        Ok(summary)
    }

    /// Overwrites both files with the current dataset.
    pub fn save(&self) -> Result<(), StoreError> {
        let save_span = span!(Level::INFO, "save");
        let _guard = save_span.enter();

        let roads = self.roads();
        write_cities(&self.cities_path, &self.cities)?;
        write_roads(&self.roads_path, &roads)?;
        info!("Saved {} cities and {} roads", self.cities.len(), roads.len());
        Ok(())
    }

    /// Appends every new name, skipping names already present (including
    /// ones added earlier in the same batch), then saves once.
    pub fn add_cities<I, S>(&mut self, names: I) -> Result<Vec<CityOutcome>, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut outcomes = Vec::new();
        self.add_cities_with(names, |outcome| outcomes.push(outcome.clone()))?;
        Ok(outcomes)
    }

    /// Like [`add_cities`](Self::add_cities) but hands each outcome to
    /// `on_outcome` before pulling the next name from `names`.
    pub fn add_cities_with<I, S, F>(&mut self, names: I, mut on_outcome: F) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnMut(&CityOutcome),
    {
        for name in names {
            let outcome = self.push_city(name.into());
            on_outcome(&outcome);
        }
        self.save()
    }

    fn push_city(&mut self, name: String) -> CityOutcome {
        if let Err(e) = validate_city_name(&name) {
            debug!("Rejected city name {:?}: {}", name, e);
            return CityOutcome::Invalid(name);
        }
        if self.positions.contains_key(&name) {
            debug!("Rejected duplicate city name {:?}", name);
            return CityOutcome::Duplicate(name);
        }
        if name.contains(ROAD_NAME_SEPARATOR) {
            warn!(
                "City name {:?} contains '{}'; its roads will not survive a reload",
                name, ROAD_NAME_SEPARATOR
            );
        }

        let city = City {
            index: self.cities.len() + 1,
            name,
        };
        self.positions.insert(city.name.clone(), self.cities.len());
        self.cities.push(city.clone());
        self.roads.grow();
        self.budgets.grow();
        debug!("Added city {} {:?}", city.index, city.name);
        CityOutcome::Added(city)
    }

    /// Checks that `first`/`second` name two distinct cities with no road yet.
    pub fn check_new_road(&self, first: usize, second: usize) -> Result<(), StoreError> {
        let (i, j) = self.pair_positions(first, second)?;
        if self.roads.get(i, j) {
            return Err(StoreError::RoadExists { first, second });
        }
        Ok(())
    }

    /// Checks that `first`/`second` name two distinct connected cities.
    pub fn check_existing_road(&self, first: usize, second: usize) -> Result<(), StoreError> {
        let (i, j) = self.pair_positions(first, second)?;
        if !self.roads.get(i, j) {
            return Err(StoreError::NoRoad { first, second });
        }
        Ok(())
    }

    pub fn add_road(&mut self, first: usize, second: usize, budget: f64) -> Result<(), StoreError> {
        self.check_new_road(first, second)?;
        validate_budget(budget)?;
        let (i, j) = (first - 1, second - 1);
        self.roads.set(i, j, true);
        self.budgets.set(i, j, budget);
        debug!("Added road {}-{} with budget {}", first, second, budget);
        self.save()
    }

    pub fn update_budget(
        &mut self,
        first: usize,
        second: usize,
        budget: f64,
    ) -> Result<(), StoreError> {
        self.check_existing_road(first, second)?;
        validate_budget(budget)?;
        let (i, j) = (first - 1, second - 1);
        self.budgets.set(i, j, budget);
        debug!("Updated road {}-{} budget to {}", first, second, budget);
        self.save()
    }

    pub fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < 1 || index > self.cities.len() {
            return Err(StoreError::InvalidIndex(index));
        }
        Ok(())
    }

    /// Renames city `index`. Any existing name is refused, the city's own
    /// current name included.
    pub fn edit_city(&mut self, index: usize, new_name: impl Into<String>) -> Result<(), StoreError> {
        let new_name = new_name.into();
        self.check_index(index)?;
        validate_city_name(&new_name)?;
        if self.positions.contains_key(&new_name) {
            return Err(StoreError::DuplicateName(new_name));
        }

        let position = index - 1;
        let old_name = std::mem::replace(&mut self.cities[position].name, new_name.clone());
        self.positions.remove(&old_name);
        self.positions.insert(new_name.clone(), position);
        debug!("Renamed city {} from {:?} to {:?}", index, old_name, new_name);
        self.save()
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn city(&self, index: usize) -> Option<&City> {
        index.checked_sub(1).and_then(|p| self.cities.get(p))
    }

    pub fn city_by_name(&self, name: &str) -> Option<&City> {
        self.positions.get(name).map(|&p| &self.cities[p])
    }

    /// Whether a road joins the cities at 1-based `first` and `second`.
    /// Out-of-range indices report no road.
    pub fn road_exists(&self, first: usize, second: usize) -> bool {
        self.positions_in_range(first, second)
            .map(|(i, j)| self.roads.get(i, j))
            .unwrap_or(false)
    }

    /// Budget between `first` and `second`; 0.0 when never connected.
    pub fn budget(&self, first: usize, second: usize) -> Option<f64> {
        self.positions_in_range(first, second)
            .map(|(i, j)| self.budgets.get(i, j))
    }

    pub fn road_matrix(&self) -> &SymmetricMatrix<bool> {
        &self.roads
    }

    pub fn budget_matrix(&self) -> &SymmetricMatrix<f64> {
        &self.budgets
    }

    /// Every road with `i < j` in ascending position order, numbered from 1.
    pub fn roads(&self) -> Vec<Road> {
        (0..self.cities.len())
            .tuple_combinations()
            .filter(|&(i, j)| self.roads.get(i, j))
            .enumerate()
            .map(|(k, (i, j))| Road {
                id: k + 1,
                from: self.cities[i].index,
                to: self.cities[j].index,
                name: road_name(&self.cities[i].name, &self.cities[j].name),
                budget: self.budgets.get(i, j),
            })
            .collect()
    }

    pub fn cities_path(&self) -> &Path {
        &self.cities_path
    }

    pub fn roads_path(&self) -> &Path {
        &self.roads_path
    }

    fn pair_positions(&self, first: usize, second: usize) -> Result<(usize, usize), StoreError> {
        match self.positions_in_range(first, second) {
            Some((i, j)) if i != j => Ok((i, j)),
            _ => Err(StoreError::InvalidIndices { first, second }),
        }
    }

    fn positions_in_range(&self, first: usize, second: usize) -> Option<(usize, usize)> {
        let n = self.cities.len();
        if (1..=n).contains(&first) && (1..=n).contains(&second) {
            Some((first - 1, second - 1))
        } else {
            None
        }
    }
}

fn validate_budget(budget: f64) -> Result<(), StoreError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(StoreError::InvalidBudget(budget));
    }
    Ok(())
}
