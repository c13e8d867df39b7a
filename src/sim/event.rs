use std::fmt;

use crate::control::AutopilotMode;
use super::state::PlantState;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Gear contact; the sink rate is the last one flown before contact.
    Touchdown { vertical_speed: f64 },
    Crash,
    ModeChanged { from: AutopilotMode, to: AutopilotMode },
    AirspeedHold { engaged: bool },
    BankCaptured { bank: f64 },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Touchdown { vertical_speed } => write!(f, "touchdown at {vertical_speed:.2} m/s"),
            EventKind::Crash => write!(f, "crash"),
            EventKind::ModeChanged { from, to } => write!(f, "{from} -> {to}"),
            EventKind::AirspeedHold { engaged } => {
                write!(f, "airspeed hold {}", if *engaged { "engaged" } else { "disengaged" })
            }
            EventKind::BankCaptured { bank } => write!(f, "bank captured at {bank:+.1}°"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub state: PlantState,
}

/// Passive detectors that inspect consecutive plant states.
pub trait EventDetector {
    fn check(&mut self, prev: &PlantState, current: &PlantState) -> Option<EventKind>;
}

pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &PlantState, current: &PlantState) -> Option<EventKind> {
        if current.systems.crashed && !prev.systems.crashed {
            return Some(EventKind::Crash);
        }
        if !prev.systems.ground_contact && current.systems.ground_contact {
            Some(EventKind::Touchdown { vertical_speed: prev.vertical_speed })
        } else {
            None
        }
    }
}

/// Reports every custom-mode and airspeed-hold change.
pub struct ModeChangeDetector;

impl EventDetector for ModeChangeDetector {
    fn check(&mut self, prev: &PlantState, current: &PlantState) -> Option<EventKind> {
        let (from, to) = (prev.systems.mode, current.systems.mode);
        if from != to {
            return Some(EventKind::ModeChanged { from, to });
        }
        if prev.systems.airspeed_hold != current.systems.airspeed_hold {
            return Some(EventKind::AirspeedHold { engaged: current.systems.airspeed_hold });
        }
        None
    }
}

/// Fires once, the first time the bank settles within `tolerance` of
/// `target` with the roll rate nearly stopped.
pub struct BankCaptureDetector {
    pub target: f64,
    pub tolerance: f64,
    fired: bool,
}

impl BankCaptureDetector {
    const MAX_ROLL_RATE: f64 = 0.5; // deg/s

    pub fn new(target: f64, tolerance: f64) -> Self {
        Self { target, tolerance, fired: false }
    }
}

impl EventDetector for BankCaptureDetector {
    fn check(&mut self, _prev: &PlantState, current: &PlantState) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let error = (current.bank - self.target + 180.0).rem_euclid(360.0) - 180.0;
        if error.abs() <= self.tolerance && current.omega.z.abs() <= Self::MAX_ROLL_RATE {
            self.fired = true;
            Some(EventKind::BankCaptured { bank: current.bank })
        } else {
            None
        }
    }
}

/// Run `detectors` over a recorded trajectory.
pub fn detect(trajectory: &[PlantState], detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in trajectory.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].time, kind, state: pair[1].clone() });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColLimits;
    use crate::vehicle::presets;

    fn make_state(alt: f64, vs: f64, grounded: bool) -> PlantState {
        let mut s = PlantState::at_rest(&presets::delta_glider(), ColLimits::default(), alt);
        s.vertical_speed = vs;
        s.systems.ground_contact = grounded;
        s
    }

    #[test]
    fn touchdown_detected() {
        let mut det = TouchdownDetector;
        let prev = make_state(0.02, -0.1, false);
        let curr = make_state(0.0, 0.0, true);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Touchdown { vertical_speed: -0.1 }));
        assert_eq!(det.check(&curr, &curr), None);
    }

    #[test]
    fn mode_change_detected() {
        let mut det = ModeChangeDetector;
        let prev = make_state(100.0, 0.0, false);
        let mut curr = prev.clone();
        curr.systems.mode = AutopilotMode::DescentHold;
        assert_eq!(
            det.check(&prev, &curr),
            Some(EventKind::ModeChanged { from: AutopilotMode::Off, to: AutopilotMode::DescentHold })
        );
    }

    #[test]
    fn bank_capture_fires_once_across_180() {
        let mut det = BankCaptureDetector::new(180.0, 2.0);
        let mut s = make_state(100.0, 0.0, false);
        s.bank = -179.0;
        assert!(det.check(&s, &s).is_some());
        assert!(det.check(&s, &s).is_none());
    }

    #[test]
    fn detect_scans_whole_trajectory() {
        let traj = vec![make_state(1.0, -0.5, false), make_state(0.0, 0.0, true), make_state(0.0, 0.0, true)];
        let mut dets: Vec<Box<dyn EventDetector>> = vec![Box::new(TouchdownDetector)];
        let events = detect(&traj, &mut dets);
        assert_eq!(events.len(), 1);
    }
}
