use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::schedule::time::DayKey;
use crate::Coordinate;

/// Weekly applicability of a class meeting. The catalog reports `null` for
/// days it has no opinion on, which counts as "does not meet".
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DaySet {
    #[serde(default)]
    pub mon: Option<bool>,
    #[serde(default)]
    pub tue: Option<bool>,
    #[serde(default)]
    pub wed: Option<bool>,
    #[serde(default)]
    pub thu: Option<bool>,
    #[serde(default)]
    pub fri: Option<bool>,
    #[serde(default)]
    pub sat: Option<bool>,
    #[serde(default)]
    pub sun: Option<bool>,
}

impl DaySet {
    pub fn only(days: &[DayKey]) -> Self {
        let mut set = DaySet::default();
        for &day in days {
            *set.slot_mut(day) = Some(true);
        }
        set
    }

    pub fn contains(&self, day: DayKey) -> bool {
        let slot = match day {
            DayKey::Mon => self.mon,
            DayKey::Tue => self.tue,
            DayKey::Wed => self.wed,
            DayKey::Thu => self.thu,
            DayKey::Fri => self.fri,
            DayKey::Sat => self.sat,
            DayKey::Sun => self.sun,
        };
        slot == Some(true)
    }

    fn slot_mut(&mut self, day: DayKey) -> &mut Option<bool> {
        match day {
            DayKey::Mon => &mut self.mon,
            DayKey::Tue => &mut self.tue,
            DayKey::Wed => &mut self.wed,
            DayKey::Thu => &mut self.thu,
            DayKey::Fri => &mut self.fri,
            DayKey::Sat => &mut self.sat,
            DayKey::Sun => &mut self.sun,
        }
    }
}

/// One weekly occurrence of a class in a room. Times stay as the raw catalog
/// strings and are parsed when a window is checked.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassMeeting {
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub days: DaySet,
}

impl ClassMeeting {
    pub fn new(room: &str, start: &str, end: &str, days: &[DayKey]) -> Self {
        ClassMeeting {
            room: Some(room.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            days: DaySet::only(days),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Building {
    pub name: String,
    /// Buildings without a known position are never ranked.
    pub coordinate: Option<Coordinate>,
    /// Canonical room order.
    pub rooms: Vec<String>,
    pub classes: Vec<ClassMeeting>,
}

/// Every building of the campus, loaded once and read-only afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Campus {
    pub buildings: Vec<Building>,
    #[serde(skip)]
    name_index: HashMap<String, usize>,
}

impl Campus {
    pub fn new(buildings: Vec<Building>) -> Self {
        let mut campus = Campus {
            buildings,
            name_index: HashMap::new(),
        };
        campus.rebuild_indices();
        campus
    }

    pub fn len(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Building> {
        self.name_index.get(name).map(|&idx| &self.buildings[idx])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buildings.iter().map(|b| b.name.as_str())
    }

    /// Buildings with a known position, as ranking candidates.
    pub fn positioned(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.buildings
            .iter()
            .filter_map(|b| b.coordinate.map(|c| (b.name.as_str(), c)))
    }

    pub fn rebuild_indices(&mut self) {
        self.name_index = self
            .buildings
            .iter()
            .enumerate()
            .map(|(idx, building)| (building.name.clone(), idx))
            .collect();
    }
}
