use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::schedule::building::{Building, Campus, ClassMeeting};
use crate::schedule::time::{parse_meeting_time, DayKey, TimeWindow};

/// Why a class meeting was left out of the occupancy check.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingTime,
    MissingRoom,
    UnparseableTime { value: String },
}

/// A meeting that could not be evaluated, kept for diagnostics.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SkippedMeeting {
    /// Position of the meeting in the building's class list.
    pub index: usize,
    pub room: Option<String>,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Free/occupied partition of a building's rooms for one day and window.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct RoomAvailability {
    pub free: Vec<String>,
    pub occupied: Vec<String>,
    pub skipped: Vec<SkippedMeeting>,
}

enum MeetingCheck<'a> {
    Occupies(&'a str),
    Clear,
    Skipped(SkipReason),
}

fn check_meeting<'a>(meeting: &'a ClassMeeting, day: DayKey, window: &TimeWindow) -> MeetingCheck<'a> {
    let present = |value: &'a Option<String>| value.as_deref().filter(|v| !v.trim().is_empty());
    let (Some(start), Some(end)) = (present(&meeting.start_time), present(&meeting.end_time)) else {
        return MeetingCheck::Skipped(SkipReason::MissingTime);
    };
    if !meeting.days.contains(day) {
        return MeetingCheck::Clear;
    }
    let Some(room) = meeting.room.as_deref() else {
        return MeetingCheck::Skipped(SkipReason::MissingRoom);
    };
    let unparseable = |value: &str| {
        MeetingCheck::Skipped(SkipReason::UnparseableTime {
            value: value.to_string(),
        })
    };
    let Ok(meeting_start) = parse_meeting_time(start) else {
        return unparseable(start);
    };
    let Ok(meeting_end) = parse_meeting_time(end) else {
        return unparseable(end);
    };
    if window.is_occupied_by(meeting_start, meeting_end) {
        MeetingCheck::Occupies(room)
    } else {
        MeetingCheck::Clear
    }
}

impl Building {
    /// Partitions the rooms into free and occupied for `day` and `window`.
    ///
    /// Meetings that cannot be evaluated are ignored for occupancy and
    /// reported in `skipped`.
    pub fn availability(&self, day: DayKey, window: &TimeWindow) -> RoomAvailability {
        let mut occupied: BTreeSet<&str> = BTreeSet::new();
        let mut skipped = Vec::new();

        for (index, meeting) in self.classes.iter().enumerate() {
            match check_meeting(meeting, day, window) {
                MeetingCheck::Occupies(room) => {
                    occupied.insert(room);
                }
                MeetingCheck::Clear => {}
                MeetingCheck::Skipped(reason) => {
                    debug!(
                        "{}: skipping meeting #{} in room {:?}: {:?}",
                        self.name, index, meeting.room, reason
                    );
                    skipped.push(SkippedMeeting {
                        index,
                        room: meeting.room.clone(),
                        reason,
                    });
                }
            }
        }

        let (occupied_listed, free): (Vec<String>, Vec<String>) = self
            .rooms
            .iter()
            .cloned()
            .partition(|room| occupied.contains(room.as_str()));

        // Rooms that only appear in the class list still count as occupied.
        let mut occupied_rooms = occupied_listed;
        occupied_rooms.extend(
            occupied
                .into_iter()
                .filter(|room| !self.rooms.iter().any(|r| r.as_str() == *room))
                .map(str::to_string),
        );

        RoomAvailability {
            free,
            occupied: occupied_rooms,
            skipped,
        }
    }

    pub fn free_rooms(&self, day: DayKey, window: &TimeWindow) -> Vec<String> {
        self.availability(day, window).free
    }
}

impl Campus {
    /// Availability of a named building; an unknown building yields an empty
    /// result.
    pub fn availability(&self, building: &str, day: DayKey, window: &TimeWindow) -> RoomAvailability {
        self.get(building)
            .map(|b| b.availability(day, window))
            .unwrap_or_default()
    }

    pub fn free_rooms(&self, building: &str, day: DayKey, window: &TimeWindow) -> Vec<String> {
        self.availability(building, day, window).free
    }
}
