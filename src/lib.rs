pub mod cli;
pub mod config;
pub mod domain;
pub mod fixtures;
pub mod storage;
pub mod store;
pub mod utils;
pub mod view;

pub use config::StoreConfig;
pub use domain::{City, CityOutcome, LoadSummary, Road, SearchMode, StoreError};
pub use store::{RoadNetworkStore, SearchResult};
