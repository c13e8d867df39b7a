use crate::vehicle::G0;

// ---------------------------------------------------------------------------
// Standard atmosphere, table driven
// ---------------------------------------------------------------------------

const R_AIR: f64 = 287.052_87; // J/(kg·K)

/// Below this static pressure the ship counts as outside the atmosphere, Pa.
pub const ATMOSPHERE_EDGE_PRESSURE: f64 = 1.0;

/// Air properties the autopilot host reads at one altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atmo {
    pub density: f64,     // kg/m^3
    pub pressure: f64,    // Pa
    pub temperature: f64, // K
}

struct Layer {
    base: f64,        // m
    temperature: f64, // K at base
    lapse: f64,       // K/m
    pressure: f64,    // Pa at base
}

const LAYERS: [Layer; 7] = [
    Layer { base: 0.0, temperature: 288.15, lapse: -0.0065, pressure: 101_325.0 },
    Layer { base: 11_000.0, temperature: 216.65, lapse: 0.0, pressure: 22_632.1 },
    Layer { base: 20_000.0, temperature: 216.65, lapse: 0.001, pressure: 5_474.89 },
    Layer { base: 32_000.0, temperature: 228.65, lapse: 0.0028, pressure: 868.019 },
    Layer { base: 47_000.0, temperature: 270.65, lapse: 0.0, pressure: 110.906 },
    Layer { base: 51_000.0, temperature: 270.65, lapse: -0.0028, pressure: 66.9389 },
    Layer { base: 71_000.0, temperature: 214.65, lapse: -0.002, pressure: 3.956_42 },
];

const TOP_OF_TABLE: f64 = 86_000.0;   // m
const THERMOSPHERE_TEMPERATURE: f64 = 186.87;
const THERMOSPHERE_PRESSURE: f64 = 0.3734; // Pa at the top of the table
const THERMOSPHERE_DECAY: f64 = 1.5e-4;    // 1/m

impl Layer {
    fn at(&self, h: f64) -> (f64, f64) {
        let dh = h - self.base;
        if self.lapse == 0.0 {
            let p = self.pressure * (-G0 * dh / (R_AIR * self.temperature)).exp();
            (self.temperature, p)
        } else {
            let t = self.temperature + self.lapse * dh;
            let p = self.pressure * (t / self.temperature).powf(-G0 / (self.lapse * R_AIR));
            (t, p)
        }
    }
}

/// Standard atmosphere at a geometric altitude in metres.
///
/// Negative altitudes read as sea level. Above 86 km pressure decays
/// exponentially at a fixed temperature.
pub fn isa(altitude: f64) -> Atmo {
    let h = altitude.max(0.0);
    let (temperature, pressure) = if h >= TOP_OF_TABLE {
        let p = THERMOSPHERE_PRESSURE * (-THERMOSPHERE_DECAY * (h - TOP_OF_TABLE)).exp();
        (THERMOSPHERE_TEMPERATURE, p)
    } else {
        LAYERS
            .iter()
            .rev()
            .find(|l| h >= l.base)
            .unwrap_or(&LAYERS[0])
            .at(h)
    };

    Atmo { density: pressure / (R_AIR * temperature), pressure, temperature }
}

impl Atmo {
    pub fn in_atmosphere(&self) -> bool {
        self.pressure > ATMOSPHERE_EDGE_PRESSURE
    }

    /// Dynamic pressure (Pa) at `speed` m/s.
    pub fn dynamic_pressure(&self, speed: f64) -> f64 {
        0.5 * self.density * speed * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level() {
        let a = isa(0.0);
        assert!((a.pressure - 101_325.0).abs() < 1.0);
        assert!((a.density - 1.225).abs() < 0.001);
        assert_eq!(isa(-300.0), a);
    }

    #[test]
    fn layers_join_up() {
        for l in &LAYERS[1..] {
            let below = isa(l.base - 1e-6);
            assert!((below.pressure - l.pressure).abs() / l.pressure < 2e-3, "at {} m", l.base);
            assert!((below.temperature - l.temperature).abs() < 0.01);
        }
    }

    #[test]
    fn thinning_with_height() {
        let heights = [0.0, 5_000.0, 15_000.0, 40_000.0, 60_000.0, 80_000.0, 120_000.0];
        for pair in heights.windows(2) {
            assert!(isa(pair[0]).density > isa(pair[1]).density);
        }
    }

    #[test]
    fn atmosphere_edge() {
        assert!(isa(45_000.0).in_atmosphere());
        assert!(!isa(100_000.0).in_atmosphere());
        assert!(!isa(150_000.0).in_atmosphere());
    }

    #[test]
    fn dynamic_pressure_at_sea_level() {
        let q = isa(0.0).dynamic_pressure(100.0);
        assert!((q - 6_125.0).abs() < 5.0, "q = {q}");
    }
}
