use assert_approx_eq::assert_approx_eq;
use campus_rooms::config::EngineConfig;
use campus_rooms::geo::{average, rank};
use campus_rooms::group::{create_group, join_group, GroupStore, JsonFileGroupStore};
use campus_rooms::schedule::{Building, Campus, ClassMeeting, DayKey, TimeWindow};
use campus_rooms::select::{find_rooms, RoomQuery, DEFAULT_GROUP_LIMIT};
use campus_rooms::service::{EngineRequest, EngineResponse, RoomFinder};
use campus_rooms::Coordinate;
use chrono::NaiveTime;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn small_campus() -> Campus {
    Campus::new(vec![
        Building {
            name: "A".into(),
            coordinate: Some(Coordinate::new(0.0, 0.0)),
            rooms: vec!["101".into(), "102".into()],
            classes: vec![ClassMeeting::new("101", "9:00 AM", "10:00 AM", &[DayKey::Mon])],
        },
        Building {
            name: "B".into(),
            coordinate: Some(Coordinate::new(0.0, 1.0)),
            rooms: vec!["201".into()],
            classes: Vec::new(),
        },
    ])
}

#[test]
fn integration_end_to_end_small_campus() {
    let campus = small_campus();
    let group = [Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)];

    // Meeting point
    let point = average(&group).expect("average");
    assert_approx_eq!(point.lat, 0.0, 1e-9);
    assert_approx_eq!(point.lon, 1.0, 1e-9);

    // Ranking: B sits on the meeting point, A is one degree away
    let ranked = rank(point, campus.positioned());
    let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
    assert!(ranked[0].distance_km < 1e-6);
    assert_approx_eq!(ranked[1].distance_km, 111.195, 1e-3);

    // Availability
    let query = RoomQuery {
        day: DayKey::Mon,
        window: TimeWindow::range(t(9, 0), t(9, 30)).unwrap(),
    };
    let search = find_rooms(&campus, &group, &query, DEFAULT_GROUP_LIMIT).expect("search");
    assert_eq!(search.candidates.len(), 2);
    assert_eq!(search.candidates[0].building, "B");
    assert_eq!(search.candidates[0].free_rooms, vec!["201"]);
    assert_eq!(search.candidates[1].building, "A");
    assert_eq!(search.candidates[1].free_rooms, vec!["102"]);
    assert_eq!(search.candidates[1].occupied_rooms, vec!["101"]);
}

#[test]
fn integration_no_availability_is_empty() {
    let mut campus = small_campus();
    for building in &mut campus.buildings {
        let rooms = building.rooms.clone();
        building.classes = rooms
            .iter()
            .map(|room| ClassMeeting::new(room, "8:00 AM", "6:00 PM", &[DayKey::Mon]))
            .collect();
    }
    let query = RoomQuery {
        day: DayKey::Mon,
        window: TimeWindow::range(t(9, 0), t(9, 30)).unwrap(),
    };
    let search = find_rooms(&campus, &[Coordinate::new(0.0, 0.5)], &query, 3).expect("search");
    assert!(search.candidates.is_empty());
}

#[test]
fn integration_group_updates_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileGroupStore::new(dir.path().join("groups.json"));
    create_group(&store, "study", "ana").unwrap();
    join_group(&store, "study", "ben").unwrap();
    store
        .update_member_location("study", "ana", Coordinate::new(0.0, 0.0))
        .unwrap();

    let finder = RoomFinder::new(small_campus(), store, &EngineConfig::default());
    let request: EngineRequest = serde_json::from_value(serde_json::json!({
        "kind": "update_location",
        "group": "study",
        "user": "ben",
        "lat": 0.0,
        "lon": 2.0,
        "start": "09:00",
        "end": "09:30",
        "day": "mon"
    }))
    .unwrap();

    match finder.handle(request) {
        EngineResponse::TopBuildings {
            average_location,
            top_buildings,
            ..
        } => {
            assert_approx_eq!(average_location.lon, 1.0, 1e-9);
            let names: Vec<&str> = top_buildings.iter().map(|c| c.building.as_str()).collect();
            assert_eq!(names, vec!["B", "A"]);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let stored = finder.store().get("study").unwrap().expect("group");
    assert_eq!(stored.coordinates().len(), 2);
}

#[test]
fn integration_sample_fixtures_load() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("buildings");
    let campus = campus_rooms::data::load_campus_from_dir(dir).expect("fixtures");
    assert_eq!(campus.len(), 4);

    let dreese = campus.get("Dreese Laboratories").expect("Dreese");
    let monday_nine_thirty = TimeWindow::instant(t(9, 30));
    let availability = dreese.availability(DayKey::Mon, &monday_nine_thirty);
    assert_eq!(availability.free, vec!["0266", "0305", "0369"]);
    assert_eq!(availability.occupied, vec!["0264"]);
    assert_eq!(availability.skipped.len(), 1);
}
