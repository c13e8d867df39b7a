use crate::vehicle::G0;

pub const EARTH_RADIUS: f64 = 6_371_000.0; // m

/// Inverse-square gravity magnitude (m/s^2) at a geometric altitude.
pub fn gravity_accel(altitude: f64) -> f64 {
    let alt = altitude.max(0.0);
    G0 * (EARTH_RADIUS / (EARTH_RADIUS + alt)).powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_gravity_at_sea_level() {
        assert_eq!(gravity_accel(0.0), G0);
        assert_eq!(gravity_accel(-50.0), G0);
    }

    #[test]
    fn weaker_at_reentry_altitude() {
        let g = gravity_accel(60_000.0);
        assert!(g < G0 && g > 0.98 * G0, "g = {g}");
    }
}
