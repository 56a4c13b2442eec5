use log::info;
use serde::Serialize;

use crate::error::EngineError;
use crate::geo::{average, rank};
use crate::schedule::{Campus, DayKey, SkippedMeeting, TimeWindow};
use crate::Coordinate;

/// Returns only the nearest building with free rooms.
pub const FIRST_MATCH: usize = 1;
/// Number of buildings reported to a group.
pub const DEFAULT_GROUP_LIMIT: usize = 3;

/// What to look for: a day and a time window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomQuery {
    pub day: DayKey,
    pub window: TimeWindow,
}

/// A building that has at least one free room for the query.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CandidateRooms {
    pub building: String,
    pub distance_km: f64,
    pub free_rooms: Vec<String>,
    pub occupied_rooms: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedMeeting>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RoomSearch {
    pub meeting_point: Coordinate,
    pub candidates: Vec<CandidateRooms>,
}

/// Walks buildings nearest-first from `origin` and collects up to `limit`
/// of them with at least one free room. Scanning stops once the limit is
/// reached; an empty result means nothing is available.
pub fn select_candidates(
    campus: &Campus,
    origin: Coordinate,
    query: &RoomQuery,
    limit: usize,
) -> Vec<CandidateRooms> {
    let mut selected = Vec::new();
    if limit == 0 {
        return selected;
    }

    for ranked in rank(origin, campus.positioned()) {
        let Some(building) = campus.get(&ranked.name) else {
            continue;
        };
        let availability = building.availability(query.day, &query.window);
        if availability.free.is_empty() {
            continue;
        }
        selected.push(CandidateRooms {
            building: ranked.name,
            distance_km: ranked.distance_km,
            free_rooms: availability.free,
            occupied_rooms: availability.occupied,
            skipped: availability.skipped,
        });
        if selected.len() >= limit {
            break;
        }
    }

    selected
}

/// Averages `coords` into a meeting point and selects the nearest buildings
/// with free rooms around it.
pub fn find_rooms(
    campus: &Campus,
    coords: &[Coordinate],
    query: &RoomQuery,
    limit: usize,
) -> Result<RoomSearch, EngineError> {
    let meeting_point = average(coords)?;
    let candidates = select_candidates(campus, meeting_point, query, limit);
    info!(
        "meeting point ({:.5}, {:.5}) from {} locations: {} building(s) with free rooms on {}",
        meeting_point.lat,
        meeting_point.lon,
        coords.len(),
        candidates.len(),
        query.day
    );
    Ok(RoomSearch {
        meeting_point,
        candidates,
    })
}
