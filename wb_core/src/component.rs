//! # Components
//!
//! Mass contributors registered into a weight problem. The assembler only
//! sees components through the [`Component`] trait: a name, a type tag, the
//! design variables they own, and their mass/CG outputs. The physics behind
//! those outputs belongs to the component.
//!
//! [`MassComponent`] is the point-mass implementation shipped with the crate
//! and used by definition files.
//!
//! ## Example
//!
//! ```rust
//! use wb_core::component::{CgLocation, Component, DvOwner, MassComponent};
//! use wb_core::design_var::DvSpec;
//!
//! let mut wing = MassComponent::new("wing", "wing", 1200.0, [10.0, 0.0, 1.5]);
//! wing.add_dv("mass", DvSpec::new().bounds(800.0, 1600.0)).unwrap();
//! wing.add_dv("cg", DvSpec::new().axis("x")).unwrap();
//!
//! assert!(wing.design_vars().contains_key("wing_mass"));
//! assert!(wing.design_vars().contains_key("wing_cg_x"));
//! assert_eq!(wing.cg(CgLocation::Current), [10.0, 0.0, 1.5]);
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::design_var::{Axis, DesignVariable, DvSpec};
use crate::errors::{CalcError, CalcResult};
use crate::units::UnitSystem;

/// Loading condition at which a CG is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CgLocation {
    Current,
    Fwd,
    Aft,
}

impl CgLocation {
    /// All locations, in report order
    pub const ALL: [CgLocation; 3] = [CgLocation::Current, CgLocation::Fwd, CgLocation::Aft];

    pub fn code(&self) -> &'static str {
        match self {
            CgLocation::Current => "current",
            CgLocation::Fwd => "fwd",
            CgLocation::Aft => "aft",
        }
    }
}

impl std::fmt::Display for CgLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Anything that owns design variables.
///
/// Design variables are keyed by their local name (the fully-qualified name
/// minus the problem prefix).
pub trait DvOwner {
    fn name(&self) -> &str;

    fn design_vars(&self) -> &BTreeMap<String, DesignVariable>;

    /// Apply values keyed by local DV name. Names this owner does not know
    /// are ignored.
    fn set_design_vars(&mut self, x: &HashMap<String, f64>);
}

/// Opaque mass/CG contributor.
pub trait Component: DvOwner + std::fmt::Debug {
    /// Free-form type tag used for filtered selection (e.g. `"wing"`)
    fn comp_type(&self) -> &str;

    fn set_unit_system(&mut self, units: UnitSystem);

    fn cg(&self, location: CgLocation) -> [f64; 3];

    fn mass(&self) -> f64;

    fn weight(&self) -> f64;

    /// One-line description used by the problem's `Display`
    fn summary(&self) -> String {
        let cg = self.cg(CgLocation::Current);
        format!(
            "{} ({}): mass {:.4}, weight {:.4}, CG ({:.4}, {:.4}, {:.4})",
            self.name(),
            self.comp_type(),
            self.mass(),
            self.weight(),
            cg[0],
            cg[1],
            cg[2]
        )
    }
}

/// Tunable parameter of a [`MassComponent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassParam {
    Mass,
    /// One axis of the current CG
    Cg(Axis),
}

impl MassParam {
    /// Parameter keys accepted by [`MassComponent::add_dv`]
    pub const POSSIBLE_DVS: [&'static str; 2] = ["mass", "cg"];

    /// Resolve a key plus optional axis into a parameter
    pub fn resolve(key: &str, axis: Option<&str>) -> CalcResult<Self> {
        match key {
            "mass" => match axis {
                None => Ok(MassParam::Mass),
                Some(axis) => Err(CalcError::invalid_input("axis", axis, "'mass' is a scalar parameter")),
            },
            "cg" => match axis {
                Some(axis) => Ok(MassParam::Cg(axis.parse()?)),
                None => Err(CalcError::invalid_input(
                    "axis",
                    "none",
                    "'cg' must be registered one axis at a time",
                )),
            },
            other => Err(CalcError::invalid_parameter(other, &Self::POSSIBLE_DVS)),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MassParam::Mass => "mass",
            MassParam::Cg(_) => "cg",
        }
    }
}

/// Point-mass component with a CG per loading location.
///
/// A `cg` design variable moves the current CG only; the forward and aft
/// positions are fixed inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassComponent {
    pub name: String,
    pub comp_type: String,
    pub mass: f64,
    /// Current CG `[x, y, z]`
    pub cg: [f64; 3],
    /// Forward-limit CG, defaults to the current CG
    pub cg_fwd: Option<[f64; 3]>,
    /// Aft-limit CG, defaults to the current CG
    pub cg_aft: Option<[f64; 3]>,
    units: UnitSystem,
    dvs: BTreeMap<String, DesignVariable>,
    dv_params: BTreeMap<String, MassParam>,
}

impl MassComponent {
    pub fn new(name: impl Into<String>, comp_type: impl Into<String>, mass: f64, cg: [f64; 3]) -> Self {
        MassComponent {
            name: name.into(),
            comp_type: comp_type.into(),
            mass,
            cg,
            cg_fwd: None,
            cg_aft: None,
            units: UnitSystem::default(),
            dvs: BTreeMap::new(),
            dv_params: BTreeMap::new(),
        }
    }

    /// Set the forward and aft CG limits
    pub fn with_cg_limits(mut self, fwd: [f64; 3], aft: [f64; 3]) -> Self {
        self.cg_fwd = Some(fwd);
        self.cg_aft = Some(aft);
        self
    }

    pub fn parameter(&self, param: MassParam) -> f64 {
        match param {
            MassParam::Mass => self.mass,
            MassParam::Cg(axis) => self.cg[axis.index()],
        }
    }

    pub fn set_parameter(&mut self, param: MassParam, value: f64) {
        match param {
            MassParam::Mass => self.mass = value,
            MassParam::Cg(axis) => self.cg[axis.index()] = value,
        }
    }

    /// Register `mass` or one axis of `cg` as a design variable.
    ///
    /// Returns the local DV name. Registering the same parameter again
    /// replaces the earlier variable.
    pub fn add_dv(&mut self, key: &str, spec: DvSpec) -> CalcResult<String> {
        let param = MassParam::resolve(key, spec.axis.as_deref())?;
        let local_name = spec.local_name(&self.name, key);
        let value = spec.value.unwrap_or_else(|| self.parameter(param));

        self.dv_params.retain(|name, existing| *existing != param || *name == local_name);
        self.dvs.retain(|name, _| name == &local_name || self.dv_params.contains_key(name));

        self.dvs
            .insert(local_name.clone(), DesignVariable::from_spec(key, value, &spec));
        self.dv_params.insert(local_name.clone(), param);
        Ok(local_name)
    }
}

impl DvOwner for MassComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn design_vars(&self) -> &BTreeMap<String, DesignVariable> {
        &self.dvs
    }

    fn set_design_vars(&mut self, x: &HashMap<String, f64>) {
        let mut updates = Vec::new();
        for (local_name, param) in &self.dv_params {
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

impl Component for MassComponent {
    fn comp_type(&self) -> &str {
        &self.comp_type
    }

    fn set_unit_system(&mut self, units: UnitSystem) {
        self.units = units;
    }

    fn cg(&self, location: CgLocation) -> [f64; 3] {
        match location {
            CgLocation::Current => self.cg,
            CgLocation::Fwd => self.cg_fwd.unwrap_or(self.cg),
            CgLocation::Aft => self.cg_aft.unwrap_or(self.cg),
        }
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn weight(&self) -> f64 {
        self.units.weight_of(self.mass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wing() -> MassComponent {
        MassComponent::new("wing", "wing", 1200.0, [10.0, 0.0, 1.5])
    }

    #[test]
    fn test_add_dv_defaults_value_from_attribute() {
        let mut comp = wing();
        let name = comp.add_dv("mass", DvSpec::new()).unwrap();
        assert_eq!(name, "wing_mass");
        assert_eq!(comp.design_vars()["wing_mass"].value, 1200.0);

        let name = comp.add_dv("cg", DvSpec::new().axis("z")).unwrap();
        assert_eq!(name, "wing_cg_z");
        assert_eq!(comp.design_vars()["wing_cg_z"].value, 1.5);
    }

    #[test]
    fn test_add_dv_rejects_unknown_key() {
        let mut comp = wing();
        let err = comp.add_dv("span", DvSpec::new()).unwrap_err();
        assert_eq!(
            err,
            CalcError::InvalidParameter {
                key: "span".to_string(),
                allowed: vec!["mass".to_string(), "cg".to_string()],
            }
        );
        assert!(comp.design_vars().is_empty());
    }

    #[test]
    fn test_cg_requires_axis() {
        let mut comp = wing();
        assert_eq!(comp.add_dv("cg", DvSpec::new()).unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(
            comp.add_dv("mass", DvSpec::new().axis("x")).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
        assert!(comp.design_vars().is_empty());
    }

    #[test]
    fn test_set_design_vars_applies_offset() {
        let mut comp = wing();
        comp.add_dv("mass", DvSpec::new().offset(50.0)).unwrap();
        comp.add_dv("cg", DvSpec::new().axis("x")).unwrap();

        let mut x = HashMap::new();
        x.insert("wing_mass".to_string(), 1000.0);
        x.insert("wing_cg_x".to_string(), 11.0);
        x.insert("tail_mass".to_string(), 5.0);
        comp.set_design_vars(&x);

        assert_eq!(comp.mass, 1050.0);
        assert_eq!(comp.design_vars()["wing_mass"].value, 1000.0);
        assert_eq!(comp.cg, [11.0, 0.0, 1.5]);
    }

    #[test]
    fn test_reregistering_parameter_replaces_variable() {
        let mut comp = wing();
        comp.add_dv("mass", DvSpec::new()).unwrap();
        comp.add_dv("mass", DvSpec::new().name("airframe_mass")).unwrap();
        let names: Vec<_> = comp.design_vars().keys().cloned().collect();
        assert_eq!(names, vec!["airframe_mass".to_string()]);
    }

    #[test]
    fn test_cg_locations_and_weight() {
        let mut comp = wing().with_cg_limits([9.5, 0.0, 1.5], [10.5, 0.0, 1.5]);
        assert_eq!(comp.cg(CgLocation::Fwd)[0], 9.5);
        assert_eq!(comp.cg(CgLocation::Aft)[0], 10.5);
        assert_eq!(comp.weight(), 1200.0);
        comp.set_unit_system(UnitSystem::Metric);
        assert!((comp.weight() - 1200.0 * 9.80665).abs() < 1e-9);
    }
}
