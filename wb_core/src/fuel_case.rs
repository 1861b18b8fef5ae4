//! # Fuel Cases
//!
//! A fuel case is a named loading scenario: the fraction of fuel-tank volume
//! holding mission fuel and the fraction holding reserve fuel. Either fraction
//! can be exposed as a design variable.
//!
//! ## Example
//!
//! ```rust
//! use wb_core::fuel_case::{FuelCase, FuelParam};
//! use wb_core::design_var::DvSpec;
//!
//! let mut case = FuelCase::new("cruise", 0.9, 0.1);
//! case.add_dv("reserveFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
//!
//! assert_eq!(case.dv_name(FuelParam::ReserveFraction), Some("cruise_reserveFraction"));
//! assert!(case.add_dv("thrust", DvSpec::new()).is_err());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::component::DvOwner;
use crate::design_var::{DesignVariable, DvSpec};
use crate::errors::{CalcError, CalcResult};

/// Default mission-fuel fraction for a new case
pub const DEFAULT_FUEL_FRACTION: f64 = 0.9;

/// Default reserve-fuel fraction for a new case
pub const DEFAULT_RESERVE_FRACTION: f64 = 0.1;

/// Tunable parameter of a [`FuelCase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FuelParam {
    #[serde(rename = "fuelFraction")]
    FuelFraction,
    #[serde(rename = "reserveFraction")]
    ReserveFraction,
}

impl FuelParam {
    /// Parameter keys accepted by [`FuelCase::add_dv`]
    pub const POSSIBLE_DVS: [&'static str; 2] = ["fuelFraction", "reserveFraction"];

    pub fn key(&self) -> &'static str {
        match self {
            FuelParam::FuelFraction => "fuelFraction",
            FuelParam::ReserveFraction => "reserveFraction",
        }
    }
}

impl FromStr for FuelParam {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuelFraction" => Ok(FuelParam::FuelFraction),
            "reserveFraction" => Ok(FuelParam::ReserveFraction),
            other => Err(CalcError::invalid_parameter(other, &Self::POSSIBLE_DVS)),
        }
    }
}

impl std::fmt::Display for FuelParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Named fuel-loading scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelCase {
    pub name: String,
    /// Fraction of fuel volume holding mission fuel, nominally in [0, 1]
    pub fuel_fraction: f64,
    /// Fraction of fuel volume holding reserve fuel, nominally in [0, 1]
    pub reserve_fraction: f64,
    dvs: BTreeMap<String, DesignVariable>,
    dv_names: BTreeMap<FuelParam, String>,
}

impl FuelCase {
    pub fn new(name: impl Into<String>, fuel_fraction: f64, reserve_fraction: f64) -> Self {
        FuelCase {
            name: name.into(),
            fuel_fraction,
            reserve_fraction,
            dvs: BTreeMap::new(),
            dv_names: BTreeMap::new(),
        }
    }

    pub fn parameter(&self, param: FuelParam) -> f64 {
        match param {
            FuelParam::FuelFraction => self.fuel_fraction,
            FuelParam::ReserveFraction => self.reserve_fraction,
        }
    }

    pub fn set_parameter(&mut self, param: FuelParam, value: f64) {
        match param {
            FuelParam::FuelFraction => self.fuel_fraction = value,
            FuelParam::ReserveFraction => self.reserve_fraction = value,
        }
    }

    /// Register `fuelFraction` or `reserveFraction` as a design variable.
    ///
    /// Any other key fails with [`CalcError::InvalidParameter`] and leaves the
    /// case untouched. Registering the same key again replaces the earlier
    /// variable, including its local name. Returns the local DV name.
    pub fn add_dv(&mut self, key: &str, spec: DvSpec) -> CalcResult<String> {
        let param: FuelParam = key.parse()?;
        let local_name = spec.local_name(&self.name, key);
        let value = spec.value.unwrap_or_else(|| self.parameter(param));

        if let Some(previous) = self.dv_names.insert(param, local_name.clone()) {
            // The other fraction may still be registered under the old name
            if !self.dv_names.values().any(|name| *name == previous) {
                self.dvs.remove(&previous);
            }
        }
        self.dvs
            .insert(local_name.clone(), DesignVariable::from_spec(key, value, &spec));
        Ok(local_name)
    }

    /// Local DV name registered for a parameter
    pub fn dv_name(&self, param: FuelParam) -> Option<&str> {
        self.dv_names.get(&param).map(String::as_str)
    }

    /// Design variable registered for a parameter
    pub fn dv(&self, param: FuelParam) -> Option<&DesignVariable> {
        self.dv_names.get(&param).and_then(|name| self.dvs.get(name))
    }

    /// Whether a parameter is registered as a design variable
    pub fn is_design_var(&self, param: FuelParam) -> bool {
        self.dv_names.contains_key(&param)
    }

    /// Parameter-to-local-name map, for reverse lookup
    pub fn dv_names(&self) -> &BTreeMap<FuelParam, String> {
        &self.dv_names
    }
}

impl Default for FuelCase {
    fn default() -> Self {
        FuelCase::new("", DEFAULT_FUEL_FRACTION, DEFAULT_RESERVE_FRACTION)
    }
}

impl DvOwner for FuelCase {
    fn name(&self) -> &str {
        &self.name
    }

    fn design_vars(&self) -> &BTreeMap<String, DesignVariable> {
        &self.dvs
    }

    fn set_design_vars(&mut self, x: &HashMap<String, f64>) {
        let mut updates = Vec::new();
        for (param, local_name) in &self.dv_names {
            if let (Some(&value), Some(dv)) = (x.get(local_name), self.dvs.get_mut(local_name)) {
                dv.value = value;
                updates.push((*param, dv.attribute_value()));
            }
        }
        for (param, target) in updates {
            self.set_parameter(param, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dv_uses_current_attribute() {
        let mut case = FuelCase::new("full", 0.8, 0.2);
        let name = case.add_dv("fuelFraction", DvSpec::new()).unwrap();
        assert_eq!(name, "full_fuelFraction");
        assert_eq!(case.dv(FuelParam::FuelFraction).unwrap().value, 0.8);
        assert!(case.is_design_var(FuelParam::FuelFraction));
        assert!(!case.is_design_var(FuelParam::ReserveFraction));
    }

    #[test]
    fn test_whitelist_rejection_leaves_case_unchanged() {
        let mut case = FuelCase::new("full", 0.8, 0.2);
        case.add_dv("fuelFraction", DvSpec::new()).unwrap();
        let before = case.clone();

        let err = case.add_dv("thrust", DvSpec::new().value(1.0)).unwrap_err();
        match &err {
            CalcError::InvalidParameter { key, allowed } => {
                assert_eq!(key, "thrust");
                assert_eq!(allowed, &vec!["fuelFraction".to_string(), "reserveFraction".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(case, before);
    }

    #[test]
    fn test_whitelist_is_case_sensitive() {
        let mut case = FuelCase::default();
        assert!(case.add_dv("FuelFraction", DvSpec::new()).is_err());
    }

    #[test]
    fn test_set_design_vars_writes_value_plus_offset() {
        let mut case = FuelCase::new("full", 0.9, 0.1);
        case.add_dv("reserveFraction", DvSpec::new().offset(0.02)).unwrap();

        let mut x = HashMap::new();
        x.insert("full_reserveFraction".to_string(), 0.05);
        x.insert("full_fuelFraction".to_string(), 0.3);
        case.set_design_vars(&x);

        assert!((case.reserve_fraction - 0.07).abs() < 1e-12);
        assert_eq!(case.dv(FuelParam::ReserveFraction).unwrap().value, 0.05);
        // fuelFraction is not a DV, so it is left alone
        assert_eq!(case.fuel_fraction, 0.9);
    }

    #[test]
    fn test_reregistration_replaces_orphaned_name() {
        let mut case = FuelCase::new("full", 0.9, 0.1);
        case.add_dv("fuelFraction", DvSpec::new()).unwrap();
        case.add_dv("fuelFraction", DvSpec::new().name("shared_fuel")).unwrap();

        assert_eq!(case.design_vars().len(), 1);
        assert_eq!(case.dv_name(FuelParam::FuelFraction), Some("shared_fuel"));
    }

    #[test]
    fn test_reregistration_keeps_name_shared_with_other_fraction() {
        let mut case = FuelCase::new("c", 0.9, 0.1);
        case.add_dv("fuelFraction", DvSpec::new().name("x")).unwrap();
        case.add_dv("reserveFraction", DvSpec::new().name("x")).unwrap();
        case.add_dv("fuelFraction", DvSpec::new()).unwrap();

        assert_eq!(case.dv_name(FuelParam::FuelFraction), Some("c_fuelFraction"));
        assert_eq!(case.dv_name(FuelParam::ReserveFraction), Some("x"));
        assert!(case.dv(FuelParam::ReserveFraction).is_some());
        assert!(case.dv(FuelParam::FuelFraction).is_some());
        assert_eq!(case.design_vars().len(), 2);
    }

    #[test]
    fn test_serialization() {
        let mut case = FuelCase::new("full", 0.9, 0.1);
        case.add_dv("fuelFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
        let json = serde_json::to_string(&case).unwrap();
        assert!(json.contains("\"fuelFraction\""));
        let roundtrip: FuelCase = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, case);
    }
}
