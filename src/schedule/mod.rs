pub mod availability;
pub mod building;
pub mod time;

pub use availability::{RoomAvailability, SkipReason, SkippedMeeting};
pub use building::{Building, Campus, ClassMeeting, DaySet};
pub use time::{DayKey, OverlapPolicy, TimeWindow};
