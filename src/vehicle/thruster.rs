use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

// ---------------------------------------------------------------------------
// Thruster groups
// ---------------------------------------------------------------------------

/// Logical thruster groups the autopilots can command.
///
/// The first twelve are the RCS attitude/translation groups; the last three
/// are the hover, main and retro engine pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum ThrusterGroup {
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    BankLeft,
    BankRight,
    Right,
    Left,
    Up,
    Down,
    Forward,
    Back,
    Hover,
    Main,
    Retro,
}

impl ThrusterGroup {
    pub fn index(self) -> usize {
        self as usize
    }

    /// RCS groups, zeroed together when an attitude autopilot lets go.
    pub fn is_attitude(self) -> bool {
        !matches!(self, Self::Hover | Self::Main | Self::Retro)
    }
}

fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Current levels (what the vehicle reports)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrusterLevels([f64; ThrusterGroup::COUNT]);

impl ThrusterLevels {
    pub fn get(&self, group: ThrusterGroup) -> f64 {
        self.0[group.index()]
    }

    pub fn set(&mut self, group: ThrusterGroup, level: f64) {
        self.0[group.index()] = clamp_level(level);
    }

    pub fn iter(&self) -> impl Iterator<Item = (ThrusterGroup, f64)> + '_ {
        ThrusterGroup::iter().map(move |g| (g, self.get(g)))
    }

    /// True when every RCS group is exactly zero.
    pub fn attitude_idle(&self) -> bool {
        self.iter().filter(|(g, _)| g.is_attitude()).all(|(_, l)| l == 0.0)
    }
}

// ---------------------------------------------------------------------------
// Commanded writes (what an autopilot wants changed this step)
// ---------------------------------------------------------------------------

/// Per-group throttle writes for one step. `None` leaves the group as it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThrusterCommands([Option<f64>; ThrusterGroup::COUNT]);

impl ThrusterCommands {
    pub fn get(&self, group: ThrusterGroup) -> Option<f64> {
        self.0[group.index()]
    }

    /// Level in [0, 1] is enforced here, so callers may pass raw values.
    pub fn set(&mut self, group: ThrusterGroup, level: f64) {
        self.0[group.index()] = Some(clamp_level(level));
    }

    /// Fire `active` at `level` and write zero to the opposing group.
    pub fn set_pair(&mut self, active: ThrusterGroup, level: f64, idle: ThrusterGroup) {
        self.set(active, level);
        self.set(idle, 0.0);
    }

    pub fn zero_pair(&mut self, a: ThrusterGroup, b: ThrusterGroup) {
        self.set(a, 0.0);
        self.set(b, 0.0);
    }

    pub fn kill_attitude(&mut self) {
        for group in ThrusterGroup::iter().filter(|g| g.is_attitude()) {
            self.set(group, 0.0);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn written(&self) -> impl Iterator<Item = (ThrusterGroup, f64)> + '_ {
        ThrusterGroup::iter().filter_map(move |g| self.get(g).map(|l| (g, l)))
    }

    /// Overlay `other` on top of `self`; its writes win.
    pub fn merge(&mut self, other: &ThrusterCommands) {
        for (group, level) in other.written() {
            self.set(group, level);
        }
    }

    pub fn apply_to(&self, levels: &mut ThrusterLevels) {
        for (group, level) in self.written() {
            levels.set(group, level);
        }
    }
}
