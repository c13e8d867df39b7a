use nalgebra::Vector3;

use super::snapshot::EngineCapacity;

// ---------------------------------------------------------------------------
// Airframe model used by the closed-loop simulator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VehicleModel {
    pub name: String,
    pub mass: f64,                     // kg
    pub engines: EngineCapacity,       // N, sea-level rating
    pub rcs_authority: Vector3<f64>,   // deg/s^2 at full level: x pitch, y yaw, z roll
    pub drag_area: f64,                // Cd*A, m^2
    pub lift_area: f64,                // CL_alpha*S, m^2 per rad
    pub aero_pitch_moment: f64,        // deg/s^2 nose-down per kPa
    pub col_pitch_authority: f64,      // deg/s^2 per m of COL offset per kPa
    pub trim_pitch_authority: f64,     // deg/s^2 per unit trim per kPa
    pub aero_damping: f64,             // 1/s per kPa
    pub apu_fuel: f64,                 // kg
    pub apu_start_time: f64,           // s
}

impl VehicleModel {
    pub fn max_hover_acc(&self, gravity: f64) -> f64 {
        self.engines.hover / self.mass - gravity
    }
}

// ---------------------------------------------------------------------------
// Model builder
// ---------------------------------------------------------------------------

pub struct VehicleModelBuilder {
    model: VehicleModel,
}

impl VehicleModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: VehicleModel {
                name: name.into(),
                mass: 20_000.0,
                engines: EngineCapacity { hover: 300_000.0, main: 400_000.0, retro: 70_000.0 },
                rcs_authority: Vector3::new(8.0, 6.0, 12.0),
                drag_area: 8.0,
                lift_area: 60.0,
                aero_pitch_moment: 0.15,
                col_pitch_authority: 0.08,
                trim_pitch_authority: 0.10,
                aero_damping: 0.05,
                apu_fuel: 80.0,
                apu_start_time: 3.0,
            },
        }
    }

    pub fn mass(mut self, v: f64) -> Self { self.model.mass = v; self }
    pub fn engines(mut self, v: EngineCapacity) -> Self { self.model.engines = v; self }
    pub fn rcs_authority(mut self, v: Vector3<f64>) -> Self { self.model.rcs_authority = v; self }
    pub fn drag_area(mut self, v: f64) -> Self { self.model.drag_area = v; self }
    pub fn lift_area(mut self, v: f64) -> Self { self.model.lift_area = v; self }
    pub fn aero_pitch_moment(mut self, v: f64) -> Self { self.model.aero_pitch_moment = v; self }
    pub fn col_pitch_authority(mut self, v: f64) -> Self { self.model.col_pitch_authority = v; self }
    pub fn trim_pitch_authority(mut self, v: f64) -> Self { self.model.trim_pitch_authority = v; self }
    pub fn aero_damping(mut self, v: f64) -> Self { self.model.aero_damping = v; self }
    pub fn apu_fuel(mut self, v: f64) -> Self { self.model.apu_fuel = v; self }
    pub fn apu_start_time(mut self, v: f64) -> Self { self.model.apu_start_time = v; self }

    pub fn build(self) -> VehicleModel {
        self.model
    }
}

// ---------------------------------------------------------------------------
// Preset airframes
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Delta-wing spaceplane, fully fuelled.
    pub fn delta_glider() -> VehicleModel {
        VehicleModelBuilder::new("Delta glider").build()
    }

    /// Same airframe, heavy enough that the hover engines cannot hold it up.
    pub fn overloaded_glider() -> VehicleModel {
        VehicleModelBuilder::new("Overloaded glider").mass(34_000.0).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::snapshot::G0;

    #[test]
    fn preset_can_hover() {
        let m = presets::delta_glider();
        assert!(m.max_hover_acc(G0) > 1.0, "hover margin {}", m.max_hover_acc(G0));
    }

    #[test]
    fn overloaded_preset_cannot_hover() {
        assert!(presets::overloaded_glider().max_hover_acc(G0) < 0.0);
    }
}
