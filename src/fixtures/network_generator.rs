use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::domain::StoreError;
use crate::store::RoadNetworkStore;

const MIN_BUDGET: f64 = 1_000.0;
const MAX_BUDGET: f64 = 50_000.0;

/// Cities `City1..CityN` and roads between them, addressed by 1-based
/// position in `names`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNetwork {
    pub names: Vec<String>,
    pub roads: Vec<(usize, usize, f64)>,
}

/// Builds a deterministic network: every pair is connected with probability
/// `road_probability`, budgets are uniform in [1000, 50000) rounded to
/// three decimals.
pub fn generate_random_network(
    city_count: usize,
    road_probability: f64,
    seed: u64,
) -> GeneratedNetwork {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let probability = if road_probability.is_nan() {
        0.0
    } else {
        road_probability.clamp(0.0, 1.0)
    };

    let names: Vec<String> = (1..=city_count).map(|k| format!("City{k}")).collect();
    let mut roads = Vec::new();
    for (i, j) in (1..=city_count).tuple_combinations() {
        if rng.gen_bool(probability) {
            let budget = rng.gen_range(MIN_BUDGET..MAX_BUDGET);
            roads.push((i, j, (budget * 1000.0).round() / 1000.0));
        }
    }

    info!(
        "Generated network with {} cities and {} roads (seed {})",
        names.len(),
        roads.len(),
        seed
    );
    GeneratedNetwork { names, roads }
}

/// Inserts a generated network through the store's public operations.
/// Names already present are reused as road endpoints.
pub fn seed_store(store: &mut RoadNetworkStore, network: &GeneratedNetwork) -> Result<(), StoreError> {
    store.add_cities(network.names.iter().cloned())?;

    for &(a, b, budget) in &network.roads {
        let first = store.city_by_name(&network.names[a - 1]).map(|c| c.index);
        let second = store.city_by_name(&network.names[b - 1]).map(|c| c.index);
        let (Some(first), Some(second)) = (first, second) else {
            continue;
        };
        match store.add_road(first, second, budget) {
            Ok(()) => {}
            Err(StoreError::RoadExists { .. }) => {
                debug!("Road {}-{} already present, skipping", first, second)
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
