pub mod selection;

pub use selection::{
    find_rooms, select_candidates, CandidateRooms, RoomQuery, RoomSearch, DEFAULT_GROUP_LIMIT,
    FIRST_MATCH,
};
