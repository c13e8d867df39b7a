use nalgebra::Vector3;

// Vectors here are in the local horizon frame: +y up, +z forward along
// the ground track. Angles are in degrees.

/// Below this airspeed the flow direction is taken as level, m/s.
const MIN_FLOW_SPEED: f64 = 1.0;

/// Flight path angle (deg), positive climbing.
pub fn flight_path_angle(vertical_speed: f64, ground_speed: f64) -> f64 {
    if vertical_speed.hypot(ground_speed) < MIN_FLOW_SPEED {
        return 0.0;
    }
    vertical_speed.atan2(ground_speed).to_degrees()
}

/// Angle of attack (deg). Banking moves the wing out of the vertical
/// plane, so only the `cos(bank)` share of the pitch offset reaches it.
pub fn angle_of_attack(pitch: f64, flight_path: f64, bank: f64) -> f64 {
    (pitch - flight_path) * bank.to_radians().cos()
}

/// Unit vector along the flight path.
fn flow_direction(flight_path: f64) -> Vector3<f64> {
    let g = flight_path.to_radians();
    Vector3::new(0.0, g.sin(), g.cos())
}

/// Lift (N) perpendicular to the flight path, tilted by the bank.
/// `lift_area` is CL_alpha * S per radian; the `sin(2a)/2` curve falls
/// off past 45 deg instead of growing without bound.
pub fn lift_force(q: f64, lift_area: f64, aoa: f64, bank: f64, flight_path: f64) -> Vector3<f64> {
    let a = aoa.to_radians();
    let magnitude = q * lift_area * 0.5 * (2.0 * a).sin();
    let g = flight_path.to_radians();
    let normal = Vector3::new(0.0, g.cos(), -g.sin());
    normal * magnitude * bank.to_radians().cos()
}

/// Drag (N) opposing the flight path, growing with AOA.
pub fn drag_force(q: f64, drag_area: f64, aoa: f64, flight_path: f64) -> Vector3<f64> {
    let s = aoa.to_radians().sin();
    let magnitude = q * drag_area * (1.0 + 4.0 * s * s);
    -flow_direction(flight_path) * magnitude
}

/// Angular damping (deg/s^2) from the airflow, per axis.
pub fn damping_moment(omega: &Vector3<f64>, q: f64, damping_per_kpa: f64) -> Vector3<f64> {
    -omega * (damping_per_kpa * q / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_flight_has_zero_path_angle() {
        assert_eq!(flight_path_angle(0.0, 200.0), 0.0);
        assert!((flight_path_angle(-10.0, 10.0) + 45.0).abs() < 1e-12);
        assert_eq!(flight_path_angle(-0.5, 0.0), 0.0, "hovering counts as level");
    }

    #[test]
    fn aoa_follows_bank() {
        assert!((angle_of_attack(10.0, -5.0, 0.0) - 15.0).abs() < 1e-12);
        assert!(angle_of_attack(10.0, 0.0, 90.0).abs() < 1e-12);
    }

    #[test]
    fn drag_opposes_motion() {
        let d = drag_force(1_000.0, 8.0, 0.0, 0.0);
        assert!(d.z < 0.0);
        assert!(d.y.abs() < 1e-9);
        assert!((d.z + 8_000.0).abs() < 1e-9);
    }

    #[test]
    fn lift_points_up_in_level_flight() {
        let l = lift_force(1_000.0, 60.0, 10.0, 0.0, 0.0);
        assert!(l.y > 0.0);
        assert!(l.z.abs() < 1e-9);
        let inverted = lift_force(1_000.0, 60.0, 10.0, 180.0, 0.0);
        assert!(inverted.y < 0.0);
    }

    #[test]
    fn damping_opposes_rotation() {
        let m = damping_moment(&Vector3::new(2.0, -1.0, 0.0), 10_000.0, 0.05);
        assert!(m.x < 0.0 && m.y > 0.0);
    }
}
