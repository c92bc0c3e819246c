pub mod network;
pub mod search;

pub use network::RoadNetworkStore;
pub use search::SearchResult;
