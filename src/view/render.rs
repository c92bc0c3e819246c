use std::fmt::Write;

use crate::config::constant::{BUDGET_CELL_WIDTH, BUDGET_PRECISION, ROAD_CELL_WIDTH};
use crate::domain::types::City;
use crate::storage::files::format_budget;
use crate::store::RoadNetworkStore;

pub fn render_cities(store: &RoadNetworkStore) -> String {
    let cities = store.cities();
    if cities.is_empty() {
        return "No cities recorded.\n".to_string();
    }
    let mut out = String::from("Cities:\n");
    for city in cities {
        let _ = writeln!(out, "{}\t{}", city.index, city.name);
    }
    out
}

/// Road list followed by the road adjacency matrix.
pub fn render_roads(store: &RoadNetworkStore) -> String {
    let mut out = String::from("Roads (List):\n");
    let roads = store.roads();
    if roads.is_empty() {
        out.push_str("No roads recorded.\n");
    }
    for road in &roads {
        let _ = writeln!(out, "{}\t{}\t{}", road.id, road.name, format_budget(road.budget));
    }
    out.push_str(&render_road_matrix(store));
    out
}

pub fn render_road_matrix(store: &RoadNetworkStore) -> String {
    let cities = store.cities();
    if cities.is_empty() {
        return "No road matrix to display (no cities).\n".to_string();
    }
    let mut out = String::from("\nRoad Adjacency Matrix:\n");
    header_row(&mut out, cities, ROAD_CELL_WIDTH);
    for (city, row) in cities.iter().zip(store.road_matrix().rows()) {
        let _ = write!(out, "{:>w$}", city.index, w = ROAD_CELL_WIDTH);
        for &connected in row {
            let _ = write!(out, "{:>w$}", u8::from(connected), w = ROAD_CELL_WIDTH);
        }
        out.push('\n');
    }
    out
}

pub fn render_budget_matrix(store: &RoadNetworkStore) -> String {
    let cities = store.cities();
    if cities.is_empty() {
        return "No budget matrix to display (no cities).\n".to_string();
    }
    let mut out = String::from("\nBudget Adjacency Matrix:\n");
    header_row(&mut out, cities, BUDGET_CELL_WIDTH);
    for (city, row) in cities.iter().zip(store.budget_matrix().rows()) {
        let _ = write!(out, "{:>w$}", city.index, w = ROAD_CELL_WIDTH);
        for &budget in row {
            let _ = write!(
                out,
                "{:>w$.p$}",
                budget,
                w = BUDGET_CELL_WIDTH,
                p = BUDGET_PRECISION
            );
        }
        out.push('\n');
    }
    out
}

/// Cities, road matrix and budget matrix together.
pub fn render_recorded_data(store: &RoadNetworkStore) -> String {
    let mut out = render_cities(store);
    out.push_str(&render_road_matrix(store));
    out.push_str(&render_budget_matrix(store));
    out
}

/// Single search hit, `City <index>: <name>`.
pub fn render_city_hit(city: &City) -> String {
    format!("City {}: {}\n", city.index, city.name)
}

fn header_row(out: &mut String, cities: &[City], width: usize) {
    out.push_str(&" ".repeat(ROAD_CELL_WIDTH));
    for city in cities {
        let _ = write!(out, "{:>w$}", city.index, w = width);
    }
    out.push('\n');
}
