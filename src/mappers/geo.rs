use super::Mapper;
use crate::row::Row;
use anyhow::Result;

const EARTH_RADIUS_KM: f64 = 6373.0;

/// Great-circle distance in kilometres via the haversine formula. `a` and
/// `b` are `(longitude, latitude)` columns in degrees.
pub struct CalculateDistance {
    pub a: String,
    pub b: String,
    pub out: String,
}

impl CalculateDistance {
    pub fn new(a: impl Into<String>, b: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            out: out.into(),
        }
    }
}

impl Mapper for CalculateDistance {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let (lon_a, lat_a) = row.require(&self.a)?.as_geo()?;
        let (lon_b, lat_b) = row.require(&self.b)?.as_geo()?;

        let lat_a = lat_a.to_radians();
        let lat_b = lat_b.to_radians();
        let dlat = lat_b - lat_a;
        let dlon = (lon_b - lon_a).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (dlon / 2.0).sin().powi(2);
        let distance = 2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt());

        row.set(self.out.clone(), distance);
        Ok(vec![row])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn same_point_has_zero_distance() {
        let row = Row::from_pairs([
            ("a", Value::Geo(37.6, 55.7)),
            ("b", Value::Geo(37.6, 55.7)),
        ]);
        let out = CalculateDistance::new("a", "b", "dist").apply(row).unwrap();
        assert!(out[0].get("dist").unwrap().as_f64().unwrap() < 1e-9);
    }

    #[test]
    fn known_points_match_expected_km_within_tolerance() {
        // Moscow to Saint Petersburg, roughly 635 km apart.
        let row = Row::from_pairs([
            ("a", Value::Geo(37.6173, 55.7558)),
            ("b", Value::Geo(30.3141, 59.9386)),
        ]);
        let out = CalculateDistance::new("a", "b", "dist").apply(row).unwrap();
        let dist = out[0].get("dist").unwrap().as_f64().unwrap();
        assert!((dist - 635.0).abs() < 15.0, "distance was {dist}");
    }
}
