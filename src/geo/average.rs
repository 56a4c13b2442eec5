use crate::error::EngineError;
use crate::Coordinate;

/// Below this horizontal magnitude the mean vector points at a pole (or is
/// zero) and the longitude carries no information.
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Spherical mean of a set of coordinates.
///
/// Each point is mapped to a unit vector, the vectors are averaged and the
/// mean is projected back to latitude/longitude. Unlike a plain lat/lon mean
/// this behaves across the antimeridian and near the poles. When the mean
/// vector has no horizontal component (antipodal inputs, or a pole) the
/// longitude is reported as `0.0`.
pub fn average(coords: &[Coordinate]) -> Result<Coordinate, EngineError> {
    if coords.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one coordinate is required".into(),
        ));
    }

    let (mut x, mut y, mut z) = (0.0_f64, 0.0_f64, 0.0_f64);
    for c in coords {
        let lat = c.lat.to_radians();
        let lon = c.lon.to_radians();
        x += lat.cos() * lon.cos();
        y += lat.cos() * lon.sin();
        z += lat.sin();
    }

    let n = coords.len() as f64;
    let (x, y, z) = (x / n, y / n, z / n);

    let hyp = x.hypot(y);
    let lat = z.atan2(hyp);
    let lon = if hyp < DEGENERATE_EPSILON { 0.0 } else { y.atan2(x) };

    Ok(Coordinate::new(lat.to_degrees(), lon.to_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(average(&[]), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn single_point_is_identity() {
        let p = Coordinate::new(40.0076, -83.03);
        let avg = average(&[p]).expect("average");
        assert_approx_eq!(avg.lat, p.lat, 1e-9);
        assert_approx_eq!(avg.lon, p.lon, 1e-9);
    }

    #[test]
    fn midpoint_on_equator() {
        let avg = average(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 2.0)]).unwrap();
        assert_approx_eq!(avg.lat, 0.0, 1e-9);
        assert_approx_eq!(avg.lon, 1.0, 1e-9);
    }

    #[test]
    fn crossing_the_antimeridian() {
        let avg = average(&[Coordinate::new(10.0, 179.0), Coordinate::new(10.0, -179.0)]).unwrap();
        assert_approx_eq!(avg.lon.abs(), 180.0, 1e-9);
        assert!(avg.lat > 10.0 - 1e-6);
    }

    #[test]
    fn order_does_not_matter() {
        let pts = [
            Coordinate::new(40.0, -83.0),
            Coordinate::new(41.0, -82.0),
            Coordinate::new(39.5, -84.0),
        ];
        let a = average(&pts).unwrap();
        let b = average(&[pts[2], pts[0], pts[1]]).unwrap();
        assert_approx_eq!(a.lat, b.lat, 1e-9);
        assert_approx_eq!(a.lon, b.lon, 1e-9);
        assert!((-90.0..=90.0).contains(&a.lat));
        assert!((-180.0..=180.0).contains(&a.lon));
    }

    #[test]
    fn antipodal_points_fall_back_to_zero_longitude() {
        let avg = average(&[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0)]).unwrap();
        assert_eq!(avg.lon, 0.0);
        assert!(avg.lat.is_finite());
    }

    #[test]
    fn pole_has_zero_longitude() {
        let avg = average(&[Coordinate::new(90.0, 45.0)]).unwrap();
        assert_approx_eq!(avg.lat, 90.0, 1e-9);
        assert_eq!(avg.lon, 0.0);
    }
}
