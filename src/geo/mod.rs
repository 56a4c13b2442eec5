pub mod average;
pub mod rank;

pub use average::average;
pub use rank::{rank, RankedBuilding};
