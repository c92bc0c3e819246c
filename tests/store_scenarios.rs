use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use roadnet::cli::menu::run_session;
use roadnet::{CityOutcome, RoadNetworkStore, SearchMode, StoreError};

/// Helper to create a unique scratch directory for each test.
fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roadnet_scenario_{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn open(dir: &PathBuf) -> RoadNetworkStore {
    let mut store = RoadNetworkStore::new(dir.join("cities.txt"), dir.join("roads.txt"));
    store.load().unwrap();
    store
}

#[test]
fn two_cities_one_road_survives_reload() {
    let dir = test_dir("two_cities");
    let mut store = open(&dir);
    assert_eq!(store.city_count(), 0);

    store.add_cities(["A", "B"]).unwrap();
    store.add_road(1, 2, 50.0).unwrap();
    store.save().unwrap();

    let reloaded = open(&dir);
    assert_eq!(reloaded.city_count(), 2);
    let roads = reloaded.roads();
    assert_eq!(roads.len(), 1);
    assert_eq!(roads[0].name, "A-B");
    assert_eq!(roads[0].budget, 50.0);

    let text = fs::read_to_string(dir.join("roads.txt")).unwrap();
    assert!(text.contains("A-B\t50.000"), "got: {text}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn same_name_twice_in_one_batch() {
    let dir = test_dir("batch_twice");
    let mut store = open(&dir);

    let outcomes = store.add_cities(["X", "X"]).unwrap();
    assert!(outcomes[0].is_added());
    assert_eq!(outcomes[1], CityOutcome::Duplicate("X".to_string()));
    assert_eq!(store.city_count(), 1);
    assert_eq!(open(&dir).city_count(), 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn substring_search_over_mixed_names() {
    let dir = test_dir("substring");
    let mut store = open(&dir);
    store.add_cities(["City1", "City2", "Town"]).unwrap();

    let hits: Vec<String> = store
        .search_city(SearchMode::Name, "it")
        .cities()
        .into_iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(hits, vec!["City1", "City2"]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn road_ids_are_renumbered_on_reload() {
    let dir = test_dir("renumber");
    fs::write(dir.join("cities.txt"), "Index\tCity_Name\n1\tA\n2\tB\n3\tC\n").unwrap();
    fs::write(
        dir.join("roads.txt"),
        "#\tRoad\tBudget\n17\tB-C\t2.000\n4\tA-C\t1.000\n9\tA-Q\t5.000\n",
    )
    .unwrap();

    let store = open(&dir);
    let listed: Vec<(usize, String)> = store.roads().into_iter().map(|r| (r.id, r.name)).collect();
    assert_eq!(
        listed,
        vec![(1, "A-C".to_string()), (2, "B-C".to_string())]
    );

    store.save().unwrap();
    assert_eq!(
        fs::read_to_string(dir.join("roads.txt")).unwrap(),
        "#\tRoad\tBudget\n1\tA-C\t1.000\n2\tB-C\t2.000\n"
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_operations_leave_files_untouched() {
    let dir = test_dir("untouched");
    let mut store = open(&dir);
    store.add_cities(["A", "B"]).unwrap();
    store.add_road(1, 2, 5.0).unwrap();
    let cities_before = fs::read_to_string(dir.join("cities.txt")).unwrap();
    let roads_before = fs::read_to_string(dir.join("roads.txt")).unwrap();

    assert!(matches!(store.add_road(1, 2, 9.0), Err(StoreError::RoadExists { .. })));
    assert!(matches!(store.edit_city(2, "A"), Err(StoreError::DuplicateName(_))));
    assert!(matches!(store.update_budget(1, 3, 9.0), Err(StoreError::InvalidIndices { .. })));

    assert_eq!(fs::read_to_string(dir.join("cities.txt")).unwrap(), cities_before);
    assert_eq!(fs::read_to_string(dir.join("roads.txt")).unwrap(), roads_before);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn blank_name_and_dangling_road_are_not_loaded() {
    let dir = test_dir("blank_name");
    fs::write(dir.join("cities.txt"), "Index\tCity_Name\n1\tA\n2\t\n").unwrap();
    fs::write(dir.join("roads.txt"), "#\tRoad\tBudget\n1\tA-\t7.000\n").unwrap();

    let mut store = RoadNetworkStore::new(dir.join("cities.txt"), dir.join("roads.txt"));
    let summary = store.load().unwrap();
    assert_eq!(store.city_count(), 1);
    assert!(store.roads().is_empty());
    assert_eq!(summary.skipped_cities, 1);
    assert_eq!(summary.skipped_roads, 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn hyphenated_name_loses_its_roads_on_reload() {
    let dir = test_dir("hyphen");
    let mut store = open(&dir);
    store.add_cities(["Stoke-on-Trent", "York"]).unwrap();
    store.add_road(1, 2, 3.0).unwrap();

    let reloaded = open(&dir);
    assert_eq!(reloaded.city_count(), 2);
    assert!(reloaded.roads().is_empty());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn console_session_persists_every_mutation() {
    let dir = test_dir("console");
    let mut store = open(&dir);

    let input = "1\n3\nAlpha Beta\nGamma\n2\n1\n3\n120.5\n4\n2\nBravo\n8\n9\n";
    let out = run_session(&mut store, Cursor::new(input.as_bytes().to_vec()), Vec::new()).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Budget Adjacency Matrix:"));
    assert!(out.contains("Exiting..."));

    assert_eq!(
        fs::read_to_string(dir.join("cities.txt")).unwrap(),
        "Index\tCity_Name\n1\tAlpha\n2\tBravo\n3\tGamma\n"
    );
    assert_eq!(
        fs::read_to_string(dir.join("roads.txt")).unwrap(),
        "#\tRoad\tBudget\n1\tAlpha-Gamma\t120.500\n"
    );
    let _ = fs::remove_dir_all(&dir);
}
