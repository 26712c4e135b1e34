//! Great-circle distance between two coordinates.
//!
//! Uses the spherical law of cosines with the statute-mile constant
//! (60 nautical miles per degree × 1.1515 statute miles per nautical mile)
//! and converts to kilometres. No ellipsoidal correction: the error is
//! negligible at city scale.

use std::f64::consts::PI;

use dimo_core::Coordinate;

const MILES_PER_ARC_MINUTE: f64 = 1.1515;
const KM_PER_MILE: f64 = 1.609_344;

/// Distance in kilometres between `a` and `b`.
///
/// Always `>= 0` for finite input, exactly `0.0` for identical coordinates,
/// and symmetric in its arguments. Non-finite input yields NaN.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let rad_lat1 = PI * a.latitude / 180.0;
    let rad_lat2 = PI * b.latitude / 180.0;

    // cos is even, so taking the magnitude keeps the result bit-for-bit symmetric.
    let theta = (a.longitude - b.longitude).abs();
    let rad_theta = PI * theta / 180.0;

    let cosine = rad_lat1.sin() * rad_lat2.sin()
        + rad_lat1.cos() * rad_lat2.cos() * rad_theta.cos();

    // Rounding can push the cosine just past ±1, where acos is NaN.
    let angle = cosine.clamp(-1.0, 1.0).acos();

    angle.to_degrees() * 60.0 * MILES_PER_ARC_MINUTE * KM_PER_MILE
}
