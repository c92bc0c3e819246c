use std::fmt;

/// Every way a store operation can be rejected or fail.
///
/// The first group are validation errors: the store is left untouched when
/// one of them is returned. `Io` and `Csv` come from persisting.
#[derive(Debug)]
pub enum StoreError {
    /// Road endpoints out of `1..=N` or equal.
    InvalidIndices { first: usize, second: usize },
    /// Single city index out of `1..=N`.
    InvalidIndex(usize),
    RoadExists { first: usize, second: usize },
    NoRoad { first: usize, second: usize },
    DuplicateName(String),
    /// Empty, or contains a tab or line break.
    InvalidName(String),
    /// Negative, NaN or infinite.
    InvalidBudget(f64),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidIndices { .. } => {
                write!(f, "Invalid city indices. Indices must exist and be different.")
            }
            StoreError::InvalidIndex(_) => write!(f, "Invalid city index."),
            StoreError::RoadExists { .. } => write!(f, "A road already exists between these cities."),
            StoreError::NoRoad { .. } => write!(
                f,
                "No road exists between these cities. Budget cannot be added."
            ),
            StoreError::DuplicateName(_) => write!(
                f,
                "City name already exists. Each city must have a unique name."
            ),
            StoreError::InvalidName(name) => write!(f, "Invalid city name {name:?}."),
            StoreError::InvalidBudget(_) => {
                write!(f, "Invalid budget. Please enter a valid number.")
            }
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Csv(e) => write!(f, "CSV error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        StoreError::Csv(e)
    }
}

impl StoreError {
    /// True for rejections that leave the dataset unchanged.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StoreError::Io(_) | StoreError::Csv(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_console_wording() {
        let err = StoreError::InvalidIndices { first: 1, second: 1 };
        assert!(format!("{err}").contains("Indices must exist and be different"));

        let err = StoreError::RoadExists { first: 1, second: 2 };
        assert!(format!("{err}").contains("already exists"));

        let err = StoreError::NoRoad { first: 1, second: 2 };
        assert!(format!("{err}").contains("No road exists"));

        let err = StoreError::DuplicateName("X".to_string());
        assert!(format!("{err}").contains("unique name"));
    }

    #[test]
    fn io_error_has_source() {
        let err: StoreError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_errors_have_no_source() {
        let err = StoreError::InvalidBudget(-1.0);
        assert!(std::error::Error::source(&err).is_none());
        assert!(err.is_validation());
    }
}
