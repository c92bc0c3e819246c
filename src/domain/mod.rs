pub mod error;
pub mod matrix;
pub mod types;

pub use error::StoreError;
pub use matrix::SymmetricMatrix;
pub use types::{City, CityOutcome, LoadSummary, Road, SearchMode};
