//! # Problem Definitions
//!
//! A `ProblemDefinition` is the JSON form of a weight problem: its name, unit
//! system, evaluation functions, components and fuel cases, with the design
//! variables each of them exposes. Definitions are what the CLI reads and
//! what [`file_io`](crate::file_io) saves and loads.
//!
//! ## JSON Format
//!
//! `components` and `fuel_cases` each take either one object or an array of
//! objects.
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "name": "wb",
//!   "units": "english",
//!   "eval_funcs": ["mass", "cg"],
//!   "components": [
//!     { "name": "wing", "comp_type": "wing", "mass": 1200.0, "cg": [10.0, 0.0, 1.5],
//!       "dvs": [ { "key": "mass", "lower": 800.0, "upper": 1600.0 } ] }
//!   ],
//!   "fuel_cases": { "name": "full", "fuel_fraction": 0.9, "reserve_fraction": 0.1,
//!                   "dvs": [ { "key": "reserveFraction", "lower": 0.0, "upper": 1.0 } ] }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wb_core::definition::ProblemDefinition;
//!
//! let json = r#"{
//!     "name": "wb",
//!     "units": "Metric",
//!     "fuel_cases": { "name": "full", "dvs": [ { "key": "fuelFraction" } ] }
//! }"#;
//!
//! let problem = ProblemDefinition::from_json(json).unwrap().build().unwrap();
//! assert_eq!(problem.var_names(), vec!["wb_full_fuelFraction".to_string()]);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::MassComponent;
use crate::design_var::DvSpec;
use crate::errors::{CalcError, CalcResult};
use crate::fuel_case::{FuelCase, DEFAULT_FUEL_FRACTION, DEFAULT_RESERVE_FRACTION};
use crate::problem::WeightProblem;
use crate::units::UnitSystem;

/// Current schema version for definition files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Design variable entry: the parameter key plus registration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DvEntry {
    pub key: String,
    #[serde(flatten)]
    pub spec: DvSpec,
}

/// Point-mass component entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,
    pub comp_type: String,
    pub mass: f64,
    pub cg: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cg_fwd: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cg_aft: Option<[f64; 3]>,
    #[serde(default)]
    pub dvs: Vec<DvEntry>,
}

impl ComponentDef {
    pub fn build(&self) -> CalcResult<MassComponent> {
        let mut component = MassComponent::new(&self.name, &self.comp_type, self.mass, self.cg);
        component.cg_fwd = self.cg_fwd;
        component.cg_aft = self.cg_aft;
        for dv in &self.dvs {
            component.add_dv(&dv.key, dv.spec.clone())?;
        }
        Ok(component)
    }
}

/// Fuel case entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCaseDef {
    pub name: String,
    #[serde(default = "default_fuel_fraction")]
    pub fuel_fraction: f64,
    #[serde(default = "default_reserve_fraction")]
    pub reserve_fraction: f64,
    #[serde(default)]
    pub dvs: Vec<DvEntry>,
}

fn default_fuel_fraction() -> f64 {
    DEFAULT_FUEL_FRACTION
}

fn default_reserve_fraction() -> f64 {
    DEFAULT_RESERVE_FRACTION
}

impl FuelCaseDef {
    pub fn build(&self) -> CalcResult<FuelCase> {
        let mut case = FuelCase::new(&self.name, self.fuel_fraction, self.reserve_fraction);
        for dv in &self.dvs {
            case.add_dv(&dv.key, dv.spec.clone())?;
        }
        Ok(case)
    }
}

/// Serialized weight problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Schema version (for migration compatibility)
    #[serde(default = "schema_version")]
    pub version: String,

    pub name: String,

    /// Unit system name, matched case-insensitively
    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default)]
    pub eval_funcs: Vec<String>,

    #[serde(default)]
    pub components: Vec<ComponentDef>,

    #[serde(default)]
    pub fuel_cases: Vec<FuelCaseDef>,

    /// When the definition was last saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

fn schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_units() -> String {
    UnitSystem::default().code().to_string()
}

impl ProblemDefinition {
    pub fn new(name: impl Into<String>, units: UnitSystem) -> Self {
        ProblemDefinition {
            version: schema_version(),
            name: name.into(),
            units: units.code().to_string(),
            eval_funcs: Vec::new(),
            components: Vec::new(),
            fuel_cases: Vec::new(),
            modified: None,
        }
    }

    /// Parse a definition from JSON text.
    ///
    /// Fails with [`CalcError::InvalidArgument`] when `components` or
    /// `fuel_cases` is neither an object nor an array of objects.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| CalcError::serialization(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse a definition from an already-decoded JSON value
    pub fn from_value(mut value: Value) -> CalcResult<Self> {
        if let Value::Object(map) = &mut value {
            for (field, operation) in [("components", "add_components"), ("fuel_cases", "add_fuel_cases")] {
                if let Some(entry) = map.get_mut(field) {
                    *entry = normalize_entities(entry.take(), operation)?;
                }
            }
        }
        serde_json::from_value(value).map_err(|e| CalcError::serialization(e.to_string()))
    }

    /// Build a weight problem, registering components then fuel cases.
    pub fn build(&self) -> CalcResult<WeightProblem> {
        let units: UnitSystem = self.units.parse()?;
        let mut problem = WeightProblem::new(&self.name, units).with_eval_funcs(self.eval_funcs.iter().cloned());

        for def in &self.components {
            problem.add_component(Box::new(def.build()?));
        }
        for def in &self.fuel_cases {
            problem.add_fuel_case(def.build()?);
        }
        Ok(problem)
    }
}

// Accept one entity or a list of entities; anything else is a shape error.
fn normalize_entities(value: Value, operation: &str) -> CalcResult<Value> {
    match value {
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::Object(_) => Ok(Value::Array(vec![value])),
        Value::Array(items) => {
            if let Some(bad) = items.iter().find(|item| !item.is_object()) {
                return Err(CalcError::invalid_argument(
                    operation,
                    format!("expected a list of objects, found element {}", bad),
                ));
            }
            Ok(Value::Array(items))
        }
        other => Err(CalcError::invalid_argument(
            operation,
            format!("takes either a list of or a single entity, found {}", other),
        )),
    }
}
