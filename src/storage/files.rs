use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::constant::{
    BUDGET_PRECISION, CITIES_HEADER, DELIMITER, ROADS_HEADER, ROAD_NAME_SEPARATOR,
};
use crate::domain::types::{validate_city_name, City, Road};
use crate::domain::StoreError;

#[derive(Debug, Deserialize)]
struct CityRow {
    index: usize,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RoadRow {
    _id: String,
    road: String,
    budget: f64,
}

/// A city line as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityRecord {
    pub index: usize,
    pub name: String,
}

/// A road line with its endpoint names split apart.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRecord {
    pub first: String,
    pub second: String,
    pub budget: f64,
}

/// Well-formed records plus the number of lines that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Reads the cities file. A missing file reads as empty.
pub fn read_cities(path: &Path) -> Result<Parsed<CityRecord>, StoreError> {
    let (rows, unreadable) = match read_rows(path)? {
        Some(rows) => rows,
        None => return Ok(Parsed::default()),
    };

    let mut parsed = Parsed {
        records: Vec::new(),
        skipped: unreadable,
    };
    for (line, record) in rows {
        match parse_city(&record) {
            Some(city) => parsed.records.push(city),
            None => {
                debug!("Dropping malformed city line {}: {:?}", line, record);
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

/// Reads the roads file. A missing file reads as empty.
pub fn read_roads(path: &Path) -> Result<Parsed<RoadRecord>, StoreError> {
    let (rows, unreadable) = match read_rows(path)? {
        Some(rows) => rows,
        None => return Ok(Parsed::default()),
    };

    let mut parsed = Parsed {
        records: Vec::new(),
        skipped: unreadable,
    };
    for (line, record) in rows {
        match parse_road(&record) {
            Some(road) => parsed.records.push(road),
            None => {
                debug!("Dropping malformed road line {}: {:?}", line, record);
                parsed.skipped += 1;
            }
        }
    }
    Ok(parsed)
}

fn parse_city(record: &StringRecord) -> Option<CityRecord> {
    if record.len() != CITIES_HEADER.len() {
        return None;
    }
    let row: CityRow = record.deserialize(None).ok()?;
    if row.index == 0 || validate_city_name(&row.name).is_err() {
        return None;
    }
    Some(CityRecord {
        index: row.index,
        name: row.name,
    })
}

fn parse_road(record: &StringRecord) -> Option<RoadRecord> {
    if record.len() != ROADS_HEADER.len() {
        return None;
    }
    let row: RoadRow = record.deserialize(None).ok()?;
    if !row.budget.is_finite() || row.budget < 0.0 {
        return None;
    }
    let (first, second) = split_road_name(&row.road)?;
    Some(RoadRecord {
        first: first.to_string(),
        second: second.to_string(),
        budget: row.budget,
    })
}

/// Splits `A-B` into its endpoints. Anything other than exactly two non-empty
/// parts is rejected, which is what makes hyphenated city names unreadable.
pub fn split_road_name(road: &str) -> Option<(&str, &str)> {
    let mut parts = road.split(ROAD_NAME_SEPARATOR);
    let first = parts.next()?;
    let second = parts.next()?;
    if parts.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first, second))
}

pub fn road_name(first: &str, second: &str) -> String {
    format!("{first}{ROAD_NAME_SEPARATOR}{second}")
}

pub fn format_budget(budget: f64) -> String {
    format!("{:.*}", BUDGET_PRECISION, budget)
}

/// Returns the data lines (1-based line numbers, header excluded) and the
/// number of lines that could not be decoded, or `None` when the file does
/// not exist.
fn read_rows(path: &Path) -> Result<Option<(Vec<(u64, StringRecord)>, usize)>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, starting empty", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut rows = Vec::new();
    let mut unreadable = 0;
    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                rows.push((line, record));
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Dropping unreadable line in {}: {}", path.display(), e);
                unreadable += 1;
            }
        }
    }
    Ok(Some((rows, unreadable)))
}

pub fn write_cities(path: &Path, cities: &[City]) -> Result<(), StoreError> {
    let mut wtr = tsv_writer();
    wtr.write_record(CITIES_HEADER)?;
    for city in cities {
        wtr.write_record([city.index.to_string().as_str(), city.name.as_str()])?;
    }
    let data = wtr.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;
    atomic_write(path, &data)?;
    debug!("Wrote {} cities to {}", cities.len(), path.display());
    Ok(())
}

pub fn write_roads(path: &Path, roads: &[Road]) -> Result<(), StoreError> {
    let mut wtr = tsv_writer();
    wtr.write_record(ROADS_HEADER)?;
    for road in roads {
        wtr.write_record([
            road.id.to_string(),
            road.name.clone(),
            format_budget(road.budget),
        ])?;
    }
    let data = wtr.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;
    atomic_write(path, &data)?;
    debug!("Wrote {} roads to {}", roads.len(), path.display());
    Ok(())
}

fn tsv_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

/// Replaces `path` with `data` via `<path>.tmp` + rename, so a crash mid-write
/// leaves the previous file intact.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("roadnet_files_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_files_read_as_empty() {
        let dir = test_dir("missing");
        let cities = read_cities(&dir.join("cities.txt")).unwrap();
        let roads = read_roads(&dir.join("roads.txt")).unwrap();
        assert!(cities.records.is_empty());
        assert!(roads.records.is_empty());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn city_lines_with_wrong_field_count_are_skipped() {
        let dir = test_dir("city_fields");
        let path = dir.join("cities.txt");
        fs::write(
            &path,
            "Index\tCity_Name\n1\tAlpha\n2\n3\tGamma\textra\nx\tDelta\n4\tEpsilon\n",
        )
        .unwrap();

        let parsed = read_cities(&path).unwrap();
        let names: Vec<&str> = parsed.records.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Epsilon"]);
        assert_eq!(parsed.skipped, 3);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn road_lines_are_split_on_hyphen() {
        let dir = test_dir("road_split");
        let path = dir.join("roads.txt");
        fs::write(
            &path,
            "#\tRoad\tBudget\n1\tA-B\t12.500\n2\tA-B-C\t1.000\n3\tAB\t1.000\n4\tA-C\tcheap\n5\tB-C\t-3.000\n",
        )
        .unwrap();

        let parsed = read_roads(&path).unwrap();
        assert_eq!(
            parsed.records,
            vec![RoadRecord {
                first: "A".to_string(),
                second: "B".to_string(),
                budget: 12.5,
            }]
        );
        assert_eq!(parsed.skipped, 4);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_names_and_endpoints_are_skipped() {
        let dir = test_dir("empty_names");
        let cities_path = dir.join("cities.txt");
        let roads_path = dir.join("roads.txt");
        fs::write(&cities_path, "Index\tCity_Name\n1\tA\n2\t\n").unwrap();
        fs::write(&roads_path, "#\tRoad\tBudget\n1\tA-\t7.000\n2\t-A\t1.000\n").unwrap();

        let cities = read_cities(&cities_path).unwrap();
        assert_eq!(
            cities.records,
            vec![CityRecord {
                index: 1,
                name: "A".to_string(),
            }]
        );
        assert_eq!(cities.skipped, 1);

        let roads = read_roads(&roads_path).unwrap();
        assert!(roads.records.is_empty());
        assert_eq!(roads.skipped, 2);
        assert_eq!(split_road_name("A-"), None);
        assert_eq!(split_road_name("A-B"), Some(("A", "B")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn undecodable_lines_count_as_skipped() {
        let dir = test_dir("bad_utf8");
        let path = dir.join("cities.txt");
        let mut data = b"Index\tCity_Name\n1\tA\n2\t".to_vec();
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        fs::write(&path, data).unwrap();

        let parsed = read_cities(&path).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn written_files_use_tabs_and_three_decimals() {
        let dir = test_dir("write_format");
        let cities_path = dir.join("cities.txt");
        let roads_path = dir.join("roads.txt");
        let cities = vec![
            City {
                index: 1,
                name: "A".to_string(),
            },
            City {
                index: 2,
                name: "B".to_string(),
            },
        ];
        let roads = vec![Road {
            id: 1,
            from: 1,
            to: 2,
            name: road_name("A", "B"),
            budget: 50.0,
        }];

        write_cities(&cities_path, &cities).unwrap();
        write_roads(&roads_path, &roads).unwrap();

        assert_eq!(
            fs::read_to_string(&cities_path).unwrap(),
            "Index\tCity_Name\n1\tA\n2\tB\n"
        );
        assert_eq!(
            fs::read_to_string(&roads_path).unwrap(),
            "#\tRoad\tBudget\n1\tA-B\t50.000\n"
        );
        let mut tmp = roads_path.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!PathBuf::from(tmp).exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn format_budget_rounds_to_three_places() {
        assert_eq!(format_budget(0.0), "0.000");
        assert_eq!(format_budget(1234.56789), "1234.568");
    }
}
