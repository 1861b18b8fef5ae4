//! # Unit Systems
//!
//! A weight problem carries one unit system, which is pushed into every
//! component when it is registered. Components are expected to interpret
//! their user-supplied inputs in that system. Conversion tables are not part
//! of this crate.
//!
//! ## Example
//!
//! ```rust
//! use wb_core::units::UnitSystem;
//!
//! let units: UnitSystem = "Metric".parse().unwrap();
//! assert_eq!(units, UnitSystem::Metric);
//! assert_eq!(units.mass_unit(), "kg");
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Standard gravity (m/s^2)
pub const STANDARD_GRAVITY_MPS2: f64 = 9.80665;

/// Unit system shared by a weight problem and its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Pounds-mass, pounds-force, feet
    #[default]
    English,
    /// Kilograms, newtons, metres
    Metric,
}

impl UnitSystem {
    /// Lowercase name, as written in definition files
    pub fn code(&self) -> &'static str {
        match self {
            UnitSystem::English => "english",
            UnitSystem::Metric => "metric",
        }
    }

    /// Mass unit label
    pub fn mass_unit(&self) -> &'static str {
        match self {
            UnitSystem::English => "lbm",
            UnitSystem::Metric => "kg",
        }
    }

    /// Weight (force) unit label
    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::English => "lbf",
            UnitSystem::Metric => "N",
        }
    }

    /// Convert a mass in this system to a weight in this system.
    ///
    /// Under standard gravity one pound-mass weighs one pound-force.
    pub fn weight_of(&self, mass: f64) -> f64 {
        match self {
            UnitSystem::English => mass,
            UnitSystem::Metric => mass * STANDARD_GRAVITY_MPS2,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "imperial" => Ok(UnitSystem::English),
            "metric" | "si" => Ok(UnitSystem::Metric),
            other => Err(CalcError::invalid_input(
                "units",
                other,
                "Unit system must be 'english' or 'metric'",
            )),
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
