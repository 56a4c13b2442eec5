use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::Cursor;
use std::path::Path;

use bincode::ErrorKind;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{Building, Campus, ClassMeeting};
use crate::Coordinate;

/// Compression level used when encoding campus bundles.
const CAMPUS_COMPRESSION_LEVEL: i32 = 19;

pub const USABLE_BUILDINGS_FILE: &str = "usable_buildings.json";
pub const BUILDING_CLASSES_FILE: &str = "building_classes.json";
pub const BUILDING_COORDS_FILE: &str = "building_coords.json";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<ErrorKind>),
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
}

/// Entry of `building_classes.json`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildingSchedule {
    #[serde(default)]
    pub rooms: Vec<String>,
    #[serde(default)]
    pub classes: Vec<ClassMeeting>,
}

/// `usable_buildings.json` is either a bare list or `{ "buildings": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BuildingList {
    Bare(Vec<String>),
    Wrapped { buildings: Vec<String> },
}

impl From<BuildingList> for Vec<String> {
    fn from(list: BuildingList) -> Self {
        match list {
            BuildingList::Bare(names) | BuildingList::Wrapped { buildings: names } => names,
        }
    }
}

/// Assembles a campus from the three fixture tables. Buildings keep the
/// order of `usable`; buildings that only appear in the schedule table follow
/// in name order.
pub fn campus_from_parts(
    usable: Vec<String>,
    mut schedules: BTreeMap<String, BuildingSchedule>,
    coords: &BTreeMap<String, Coordinate>,
) -> Campus {
    let mut seen = HashSet::new();
    let mut buildings = Vec::with_capacity(usable.len().max(schedules.len()));

    let listed: Vec<String> = usable.into_iter().filter(|n| seen.insert(n.clone())).collect();
    let extra: Vec<String> = schedules
        .keys()
        .filter(|n| !seen.contains(*n))
        .cloned()
        .collect();

    for name in listed.into_iter().chain(extra) {
        let schedule = schedules.remove(&name).unwrap_or_else(|| {
            warn!("no class schedule for building {name:?}");
            BuildingSchedule::default()
        });
        let coordinate = coords.get(&name).copied();
        if coordinate.is_none() {
            warn!("no coordinate for building {name:?}; it will not be ranked");
        }
        buildings.push(Building {
            name,
            coordinate,
            rooms: schedule.rooms,
            classes: schedule.classes,
        });
    }

    Campus::new(buildings)
}

fn read_json<T: for<'de> Deserialize<'de>>(dir: &Path, file: &str) -> Result<T, DataError> {
    let bytes = fs::read(dir.join(file))?;
    serde_json::from_slice(&bytes).map_err(|source| DataError::Json {
        file: file.to_string(),
        source,
    })
}

/// Loads the JSON fixtures found in `dir`.
pub fn load_campus_from_dir<P: AsRef<Path>>(dir: P) -> Result<Campus, DataError> {
    let dir = dir.as_ref();
    let usable: BuildingList = read_json(dir, USABLE_BUILDINGS_FILE)?;
    let schedules: BTreeMap<String, BuildingSchedule> = read_json(dir, BUILDING_CLASSES_FILE)?;
    let coords: BTreeMap<String, Coordinate> = read_json(dir, BUILDING_COORDS_FILE)?;

    let campus = campus_from_parts(usable.into(), schedules, &coords);
    info!(
        "loaded {} buildings from {}",
        campus.len(),
        dir.display()
    );
    Ok(campus)
}

pub fn serialize_campus(campus: &Campus) -> Result<Vec<u8>, DataError> {
    let encoded = bincode::serialize(campus)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, CAMPUS_COMPRESSION_LEVEL).map_err(DataError::Compression)
}

pub fn deserialize_campus(bytes: &[u8]) -> Result<Campus, DataError> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(DataError::Compression)?;
    let mut campus: Campus = bincode::deserialize(&decoded)?;
    campus.rebuild_indices();
    Ok(campus)
}

pub fn write_campus_to_file<P: AsRef<Path>>(campus: &Campus, path: P) -> Result<(), DataError> {
    let bytes = serialize_campus(campus)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_campus_from_file<P: AsRef<Path>>(path: P) -> Result<Campus, DataError> {
    let bytes = fs::read(path)?;
    deserialize_campus(&bytes)
}
