use serde::Serialize;

use crate::Coordinate;

/// A candidate building with its great-circle distance from the origin.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RankedBuilding {
    pub name: String,
    pub distance_km: f64,
}

/// Orders candidates by haversine distance from `origin`, nearest first.
/// Equal distances fall back to name order.
pub fn rank<'a, I>(origin: Coordinate, candidates: I) -> Vec<RankedBuilding>
where
    I: IntoIterator<Item = (&'a str, Coordinate)>,
{
    let mut ranked: Vec<RankedBuilding> = candidates
        .into_iter()
        .map(|(name, coord)| RankedBuilding {
            name: name.to_string(),
            distance_km: origin.distance_km(&coord),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}
