use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use campus_rooms::data::{
    load_campus_from_dir, write_campus_to_file, BuildingSchedule, BUILDING_CLASSES_FILE,
    USABLE_BUILDINGS_FILE,
};
use campus_rooms::schedule::{ClassMeeting, DaySet};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

const DEFAULT_CATALOG_API: &str = "https://content.osu.edu/v2/classes/search";
const DEFAULT_TERM: &str = "1258";
const PAGE_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: SearchData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchData {
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    next_page_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Course {
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    meetings: Vec<Meeting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meeting {
    facility_description: Option<String>,
    room: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    monday: Option<bool>,
    tuesday: Option<bool>,
    wednesday: Option<bool>,
    thursday: Option<bool>,
    friday: Option<bool>,
    saturday: Option<bool>,
    sunday: Option<bool>,
}

impl Meeting {
    fn held_in(&self, building: &str) -> bool {
        self.facility_description
            .as_deref()
            .is_some_and(|f| f.to_lowercase().contains(&building.to_lowercase()))
    }

    fn into_class_meeting(self) -> ClassMeeting {
        ClassMeeting {
            room: self.room,
            start_time: self.start_time,
            end_time: self.end_time,
            days: DaySet {
                mon: self.monday,
                tue: self.tuesday,
                wed: self.wednesday,
                thu: self.thursday,
                fri: self.friday,
                sat: self.saturday,
                sun: self.sunday,
            },
        }
    }
}

struct Catalog {
    client: Client,
    api: String,
    term: String,
}

impl Catalog {
    fn fetch_building(&self, building: &str) -> Result<BuildingSchedule> {
        let mut classes = Vec::new();
        let mut rooms = BTreeSet::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let response: SearchResponse = self
                .client
                .get(&self.api)
                .query(&[("q", building), ("term", self.term.as_str()), ("p", page_param.as_str())])
                .send()
                .with_context(|| format!("failed to query catalog for {building}"))?
                .error_for_status()
                .with_context(|| format!("catalog returned an error status for {building}"))?
                .json()
                .with_context(|| format!("failed to parse catalog page {page} for {building}"))?;

            for meeting in response
                .data
                .courses
                .into_iter()
                .flat_map(|c| c.sections)
                .flat_map(|s| s.meetings)
                .filter(|m| m.held_in(building))
            {
                if let Some(room) = &meeting.room {
                    rooms.insert(room.clone());
                }
                classes.push(meeting.into_class_meeting());
            }

            if response.data.next_page_link.is_none() {
                break;
            }
            page += 1;
            thread::sleep(PAGE_DELAY);
        }

        Ok(BuildingSchedule {
            rooms: rooms.into_iter().collect(),
            classes,
        })
    }
}

fn read_usable_buildings(dir: &Path) -> Result<Vec<String>> {
    let path = dir.join(USABLE_BUILDINGS_FILE);
    let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let list = value.get("buildings").cloned().unwrap_or(value);
    serde_json::from_value(list).with_context(|| format!("{} is not a list of names", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let data_dir = PathBuf::from(env::var("CAMPUS_DATA_DIR").unwrap_or_else(|_| "buildings".into()));
    let catalog = Catalog {
        client: Client::builder()
            .user_agent("campus-rooms-dataset-builder/0.1")
            .timeout(Duration::from_secs(10))
            .build()?,
        api: env::var("CATALOG_API").unwrap_or_else(|_| DEFAULT_CATALOG_API.into()),
        term: env::var("CATALOG_TERM").unwrap_or_else(|_| DEFAULT_TERM.into()),
    };

    let buildings = read_usable_buildings(&data_dir)?;
    let mut schedules = BTreeMap::new();
    for building in &buildings {
        info!("Fetching classes for {building} (term {})", catalog.term);
        match catalog.fetch_building(building) {
            Ok(schedule) => {
                info!(
                    "{building}: {} classes, {} rooms",
                    schedule.classes.len(),
                    schedule.rooms.len()
                );
                schedules.insert(building.clone(), schedule);
            }
            Err(err) => warn!("skipping {building}: {err:#}"),
        }
    }

    let classes_path = data_dir.join(BUILDING_CLASSES_FILE);
    fs::write(&classes_path, serde_json::to_vec_pretty(&schedules)?)
        .with_context(|| format!("failed to write {}", classes_path.display()))?;

    let campus = load_campus_from_dir(&data_dir)
        .with_context(|| format!("failed to reload fixtures from {}", data_dir.display()))?;
    let bundle_path = data_dir.join("campus.bin");
    write_campus_to_file(&campus, &bundle_path)
        .with_context(|| format!("failed to write bundle to {}", bundle_path.display()))?;

    info!(
        "Wrote {} and {} ({} buildings)",
        classes_path.display(),
        bundle_path.display(),
        campus.len()
    );
    Ok(())
}
