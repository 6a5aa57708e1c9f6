use std::cmp::Ordering;

use crate::models::{Coordinates, Field};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance in miles (haversine)
pub fn distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Orders fields by distance from `origin`, nearest first.
///
/// Fields without coordinates keep their input order and come after every
/// located field with a `None` distance.
pub fn rank_by_distance(origin: Coordinates, fields: Vec<Field>) -> Vec<(Field, Option<f64>)> {
    let (located, unlocated): (Vec<_>, Vec<_>) = fields
        .into_iter()
        .map(|field| {
            let distance = field.coordinates().map(|c| distance_miles(origin, c));
            (field, distance)
        })
        .partition(|(_, distance)| distance.is_some());

    let mut located = located;
    located.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    located.extend(unlocated);
    located
}
