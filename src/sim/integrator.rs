use super::dynamics::derivatives;
use super::state::PlantState;
use crate::vehicle::VehicleModel;

// ---------------------------------------------------------------------------
// RK4 integrator with thruster levels held constant over the step
// ---------------------------------------------------------------------------

/// Single RK4 step. The ship systems (thruster levels, COL, trim) are
/// frozen for the step; only the continuous state is integrated.
pub fn rk4_step(state: &PlantState, model: &VehicleModel, dt: f64) -> PlantState {
    let k1 = derivatives(state, model);
    let k2 = derivatives(&state.apply(&k1, dt * 0.5), model);
    let k3 = derivatives(&state.apply(&k2, dt * 0.5), model);
    let k4 = derivatives(&state.apply(&k3, dt), model);

    let avg = |a: f64, b: f64, c: f64, d: f64| (a + 2.0 * b + 2.0 * c + d) / 6.0;
    PlantState {
        time: state.time + dt,
        altitude: state.altitude
            + avg(k1.daltitude, k2.daltitude, k3.daltitude, k4.daltitude) * dt,
        vertical_speed: state.vertical_speed
            + avg(k1.dvertical_speed, k2.dvertical_speed, k3.dvertical_speed, k4.dvertical_speed) * dt,
        ground_speed: state.ground_speed
            + avg(k1.dground_speed, k2.dground_speed, k3.dground_speed, k4.dground_speed) * dt,
        pitch: state.pitch + avg(k1.dpitch, k2.dpitch, k3.dpitch, k4.dpitch) * dt,
        bank: state.bank + avg(k1.dbank, k2.dbank, k3.dbank, k4.dbank) * dt,
        omega: state.omega + (k1.domega + 2.0 * k2.domega + 2.0 * k3.domega + k4.domega) * (dt / 6.0),
        systems: state.systems.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColLimits;
    use crate::vehicle::{presets, ThrusterGroup};

    #[test]
    fn free_fall_matches_closed_form() {
        let model = presets::delta_glider();
        let s = PlantState::at_rest(&model, ColLimits::default(), 100_000.0);
        let next = rk4_step(&s, &model, 1.0);
        // thin air, near-constant gravity
        assert!(next.vertical_speed < 0.0);
        assert!((next.altitude - (100_000.0 + 0.5 * next.vertical_speed)).abs() < 1e-3);
    }

    #[test]
    fn constant_jet_spins_up_linearly() {
        let model = presets::delta_glider();
        let mut s = PlantState::at_rest(&model, ColLimits::default(), 200_000.0);
        s.systems.levels.set(ThrusterGroup::PitchUp, 0.5);
        let next = rk4_step(&s, &model, 0.1);
        assert!((next.omega.x - 0.4).abs() < 1e-9);
        assert!((next.pitch - 0.02).abs() < 1e-9);
    }
}
