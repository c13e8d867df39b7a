use super::pilot::{PilotAction, PilotEvent};
use super::runner::{simulate_with, SimConfig};
use super::state::PlantState;
use crate::config::AutopilotConfig;
use crate::control::AutopilotSuite;
use crate::vehicle::{self, AutopilotCommand, VehicleModel};

/// A named flight: airframe, starting state and the pilot's script.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub model: VehicleModel,
    pub sim: SimConfig,
    pub initial: PlantState,
    pub pilot: Vec<PilotEvent>,
}

impl Scenario {
    pub fn run(&self, suite: &mut AutopilotSuite) -> (Vec<PlantState>, Vec<AutopilotCommand>) {
        simulate_with(&self.model, &self.sim, self.initial.clone(), suite, &self.pilot)
    }
}

// ---------------------------------------------------------------------------
// Preset scenarios
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const NAMES: [&str; 3] = ["autoland", "reentry", "cruise"];

    pub fn by_name(name: &str, config: &AutopilotConfig) -> Option<Scenario> {
        match name {
            "autoland" => Some(autoland(config)),
            "reentry" => Some(reentry(config)),
            "cruise" => Some(cruise(config)),
            _ => None,
        }
    }

    /// Sinking hover at 400 m, auto-land engaged from the start.
    pub fn autoland(config: &AutopilotConfig) -> Scenario {
        let model = vehicle::presets::delta_glider();
        let mut initial = PlantState::at_rest(&model, config.col, 400.0);
        initial.vertical_speed = -5.0;
        Scenario {
            name: "autoland",
            description: "Vertical auto-land from a 400 m hover",
            sim: SimConfig { max_time: 300.0, stop_after_touchdown: Some(2.0), ..Default::default() },
            initial,
            pilot: vec![PilotEvent::new(0.0, PilotAction::AutoLand)],
            model,
        }
    }

    /// Hypersonic entry at 45 km holding 30 deg AOA, rolling to 45 deg
    /// bank after a minute.
    pub fn reentry(config: &AutopilotConfig) -> Scenario {
        let model = vehicle::presets::delta_glider();
        let mut initial = PlantState::at_rest(&model, config.col, 45_000.0);
        initial.ground_speed = 1_800.0;
        initial.vertical_speed = -60.0;
        initial.pitch = 20.0;
        Scenario {
            name: "reentry",
            description: "Atmospheric entry under AOA hold",
            sim: SimConfig { max_time: 120.0, ..Default::default() },
            initial,
            pilot: vec![
                PilotEvent::new(0.0, PilotAction::SetAttitude { pitch_or_aoa: 30.0, bank: 0.0, hold_aoa: true }),
                PilotEvent::new(0.0, PilotAction::EngageAttitudeHold),
                PilotEvent::new(60.0, PilotAction::SetAttitude { pitch_or_aoa: 30.0, bank: 45.0, hold_aoa: true }),
            ],
            model,
        }
    }

    /// Subsonic cruise at 3 km under pitch and airspeed hold, with a turn
    /// and a stretch at 10x time acceleration.
    pub fn cruise(config: &AutopilotConfig) -> Scenario {
        let model = vehicle::presets::delta_glider();
        let mut initial = PlantState::at_rest(&model, config.col, 3_000.0);
        initial.ground_speed = 150.0;
        initial.pitch = 15.0;
        Scenario {
            name: "cruise",
            description: "Level cruise under attitude and airspeed hold",
            sim: SimConfig { max_time: 240.0, ..Default::default() },
            initial,
            pilot: vec![
                PilotEvent::new(0.0, PilotAction::SetAttitude { pitch_or_aoa: 20.0, bank: 0.0, hold_aoa: false }),
                PilotEvent::new(0.0, PilotAction::EngageAttitudeHold),
                PilotEvent::new(0.0, PilotAction::AirspeedHold(Some(150.0))),
                PilotEvent::new(60.0, PilotAction::AdjustBank { incrementing: true }),
                PilotEvent::new(90.0, PilotAction::TimeAcceleration(10.0)),
            ],
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        let config = AutopilotConfig::default();
        for name in presets::NAMES {
            let s = presets::by_name(name, &config).unwrap();
            assert_eq!(s.name, name);
        }
        assert!(presets::by_name("orbit", &config).is_none());
    }

    #[test]
    fn scenarios_start_airborne() {
        let config = AutopilotConfig::default();
        for name in presets::NAMES {
            let s = presets::by_name(name, &config).unwrap();
            assert!(s.initial.altitude > 0.0);
            assert!(!s.pilot.is_empty());
        }
    }
}
