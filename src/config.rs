use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use tracing::{info, warn};

pub mod constant {
    pub const CITIES_PATH: &str = "cities.txt";
    pub const ROADS_PATH: &str = "roads.txt";
    pub const CITIES_HEADER: [&str; 2] = ["Index", "City_Name"];
    pub const ROADS_HEADER: [&str; 3] = ["#", "Road", "Budget"];
    pub const DELIMITER: u8 = b'\t';
    pub const ROAD_NAME_SEPARATOR: char = '-';
    pub const BUDGET_PRECISION: usize = 3;
    pub const ROAD_CELL_WIDTH: usize = 3;
    pub const BUDGET_CELL_WIDTH: usize = 10;
    pub const SEED: u64 = 64;
    pub const DEMO_ROAD_PROBABILITY: f64 = 0.35;
    pub const DEFAULT_LOG_FILTER: &str = "warn";
}

/// Where the two data files live and whether to seed a demo dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub cities_path: PathBuf,
    pub roads_path: PathBuf,
    pub demo_cities: Option<usize>,
    pub demo_seed: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cities_path: PathBuf::from(constant::CITIES_PATH),
            roads_path: PathBuf::from(constant::ROADS_PATH),
            demo_cities: None,
            demo_seed: constant::SEED,
        }
    }
}

impl StoreConfig {
    /// Reads `ROADNET_*` variables, loading `.env` first.
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        let cities_path = env::var("ROADNET_CITIES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cities_path);
        let roads_path = env::var("ROADNET_ROADS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.roads_path);
        let demo_cities = parse_var::<usize>("ROADNET_DEMO_CITIES");
        let demo_seed = parse_var::<u64>("ROADNET_DEMO_SEED").unwrap_or(defaults.demo_seed);

        info!(
            "Using cities file {} and roads file {}",
            cities_path.display(),
            roads_path.display()
        );

        Self {
            cities_path,
            roads_path,
            demo_cities,
            demo_seed,
        }
    }

    pub fn with_paths(cities_path: impl Into<PathBuf>, roads_path: impl Into<PathBuf>) -> Self {
        Self {
            cities_path: cities_path.into(),
            roads_path: roads_path.into(),
            ..Self::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} has unparseable value {:?}, ignoring", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_match_original_file_names() {
        let config = StoreConfig::default();
        assert_eq!(config.cities_path, PathBuf::from("cities.txt"));
        assert_eq!(config.roads_path, PathBuf::from("roads.txt"));
        assert_eq!(config.demo_cities, None);
        assert_eq!(config.demo_seed, constant::SEED);
    }

    #[test]
    fn with_paths_keeps_other_defaults() {
        let config = StoreConfig::with_paths("/tmp/a.txt", "/tmp/b.txt");
        assert_eq!(config.cities_path, PathBuf::from("/tmp/a.txt"));
        assert_eq!(config.roads_path, PathBuf::from("/tmp/b.txt"));
        assert_eq!(config.demo_cities, None);
    }
}
