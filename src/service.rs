//! Request dispatch for the room finder.
//!
//! Requests and responses are tagged JSON objects (`"kind": "..."`). Failures
//! come back as an `error` response carrying an HTTP-style status so the
//! calling layer can forward it unchanged.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geo::average;
use crate::group::{create_group, join_group, Group, GroupStore, StoreError};
use crate::schedule::{Campus, ClassMeeting, DayKey, RoomAvailability, TimeWindow};
use crate::select::{find_rooms, select_candidates, CandidateRooms, RoomQuery};
use crate::Coordinate;

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineRequest {
    Buildings,
    Building {
        name: String,
    },
    /// Meet around a set of buildings (manual mode).
    MeetingSpot {
        buildings: Vec<String>,
        start: String,
        end: String,
        #[serde(default)]
        day: Option<String>,
    },
    FreeRooms {
        building: String,
        #[serde(default)]
        day: Option<String>,
        #[serde(default)]
        when: Option<String>,
        #[serde(default)]
        start: Option<String>,
        #[serde(default)]
        end: Option<String>,
    },
    CreateGroup {
        group: String,
        user: String,
    },
    JoinGroup {
        group: String,
        user: String,
    },
    UpdateLocation {
        group: String,
        user: String,
        lat: f64,
        lon: f64,
        start: String,
        end: String,
        #[serde(default)]
        day: Option<String>,
    },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineResponse {
    Buildings {
        buildings: Vec<String>,
    },
    Building {
        name: String,
        rooms: Vec<String>,
        classes: Vec<ClassMeeting>,
    },
    MeetingSpot {
        closest_building: Option<String>,
        average_location: Coordinate,
        free_rooms: Vec<String>,
        occupied_rooms: Vec<String>,
    },
    FreeRooms {
        building: String,
        day: DayKey,
        window: TimeWindow,
        #[serde(flatten)]
        availability: RoomAvailability,
    },
    Group {
        group: String,
        members: Vec<String>,
    },
    TopBuildings {
        group: String,
        average_location: Coordinate,
        top_buildings: Vec<CandidateRooms>,
    },
    Error {
        status: u16,
        message: String,
    },
}

impl EngineResponse {
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        EngineResponse::Error {
            status,
            message: message.into(),
        }
    }
}

impl From<EngineError> for EngineResponse {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::InvalidInput(_) | EngineError::UnparseableTime { .. } => 400,
            EngineError::UnknownBuilding(_) => 404,
        };
        EngineResponse::error(status, err.to_string())
    }
}

impl From<StoreError> for EngineResponse {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::UnknownGroup(_) => 404,
            StoreError::GroupExists(_) => 409,
            StoreError::Io(_) | StoreError::Json(_) => 500,
        };
        if status == 500 {
            warn!("group store failure: {err}");
        }
        EngineResponse::error(status, err.to_string())
    }
}

/// Campus data, group storage and limits needed to answer requests.
pub struct RoomFinder<S> {
    campus: Campus,
    store: S,
    group_limit: usize,
    meeting_spot_limit: usize,
}

fn parse_day(day: Option<&str>) -> Result<DayKey, EngineError> {
    day.map_or(Ok(DayKey::default()), |d| d.parse())
}

impl<S: GroupStore> RoomFinder<S> {
    pub fn new(campus: Campus, store: S, config: &EngineConfig) -> Self {
        RoomFinder {
            campus,
            store,
            group_limit: config.group_limit,
            meeting_spot_limit: config.meeting_spot_limit,
        }
    }

    pub fn campus(&self) -> &Campus {
        &self.campus
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn handle(&self, request: EngineRequest) -> EngineResponse {
        let result = match request {
            EngineRequest::Buildings => Ok(EngineResponse::Buildings {
                buildings: self.campus.names().map(str::to_string).collect(),
            }),
            EngineRequest::Building { name } => self.building(&name),
            EngineRequest::MeetingSpot {
                buildings,
                start,
                end,
                day,
            } => self.meeting_spot(&buildings, &start, &end, day.as_deref()),
            EngineRequest::FreeRooms {
                building,
                day,
                when,
                start,
                end,
            } => self.free_rooms(
                &building,
                day.as_deref(),
                when.as_deref(),
                start.as_deref(),
                end.as_deref(),
            ),
            EngineRequest::CreateGroup { group, user } => Ok(create_group(&self.store, &group, &user)
                .map(|g| group_response(group, &g))
                .unwrap_or_else(EngineResponse::from)),
            EngineRequest::JoinGroup { group, user } => Ok(join_group(&self.store, &group, &user)
                .map(|g| group_response(group, &g))
                .unwrap_or_else(EngineResponse::from)),
            EngineRequest::UpdateLocation {
                group,
                user,
                lat,
                lon,
                start,
                end,
                day,
            } => self.update_location(
                group,
                &user,
                Coordinate::new(lat, lon),
                &start,
                &end,
                day.as_deref(),
            ),
        };
        result.unwrap_or_else(EngineResponse::from)
    }

    fn building(&self, name: &str) -> Result<EngineResponse, EngineError> {
        let building = self
            .campus
            .get(name)
            .ok_or_else(|| EngineError::UnknownBuilding(name.to_string()))?;
        Ok(EngineResponse::Building {
            name: building.name.clone(),
            rooms: building.rooms.clone(),
            classes: building.classes.clone(),
        })
    }

    fn meeting_spot(
        &self,
        buildings: &[String],
        start: &str,
        end: &str,
        day: Option<&str>,
    ) -> Result<EngineResponse, EngineError> {
        if buildings.is_empty() {
            return Err(EngineError::InvalidInput("no buildings provided".into()));
        }
        let coords: Vec<Coordinate> = buildings
            .iter()
            .filter_map(|name| self.campus.get(name).and_then(|b| b.coordinate))
            .collect();
        if coords.is_empty() {
            return Err(EngineError::InvalidInput(
                "no valid buildings with coordinates".into(),
            ));
        }

        let query = RoomQuery {
            day: parse_day(day)?,
            window: TimeWindow::from_query(None, Some(start), Some(end))?,
        };
        let meeting_point = average(&coords)?;
        let best = select_candidates(&self.campus, meeting_point, &query, self.meeting_spot_limit)
            .into_iter()
            .next();

        Ok(match best {
            Some(found) => EngineResponse::MeetingSpot {
                closest_building: Some(found.building),
                average_location: meeting_point,
                free_rooms: found.free_rooms,
                occupied_rooms: found.occupied_rooms,
            },
            None => EngineResponse::MeetingSpot {
                closest_building: None,
                average_location: meeting_point,
                free_rooms: Vec::new(),
                occupied_rooms: Vec::new(),
            },
        })
    }

    fn free_rooms(
        &self,
        building: &str,
        day: Option<&str>,
        when: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<EngineResponse, EngineError> {
        let day = parse_day(day)?;
        let window = TimeWindow::from_query(when, start, end)?;
        let found = self
            .campus
            .get(building)
            .ok_or_else(|| EngineError::UnknownBuilding(building.to_string()))?;
        Ok(EngineResponse::FreeRooms {
            building: found.name.clone(),
            day,
            window,
            availability: found.availability(day, &window),
        })
    }

    fn update_location(
        &self,
        group: String,
        user: &str,
        coord: Coordinate,
        start: &str,
        end: &str,
        day: Option<&str>,
    ) -> Result<EngineResponse, EngineError> {
        // Validate the query before touching the store.
        let query = RoomQuery {
            day: parse_day(day)?,
            window: TimeWindow::from_query(None, Some(start), Some(end))?,
        };
        let updated = match self.store.update_member_location(&group, user, coord) {
            Ok(updated) => updated,
            Err(err) => return Ok(err.into()),
        };
        info!("{user:?} reported a location in group {group:?}");

        let search = find_rooms(&self.campus, &updated.coordinates(), &query, self.group_limit)?;
        Ok(EngineResponse::TopBuildings {
            group,
            average_location: search.meeting_point,
            top_buildings: search.candidates,
        })
    }
}

fn group_response(group: String, value: &Group) -> EngineResponse {
    EngineResponse::Group {
        group,
        members: value.members.keys().cloned().collect(),
    }
}
