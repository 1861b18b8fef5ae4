//! # Design Variables
//!
//! A [`DesignVariable`] describes one tunable scalar owned by a component or
//! fuel case: its current value, optimization bounds, scaling, the constant
//! offset applied when the value is written back to the owner, and whether the
//! owning problem exports it to the optimizer.
//!
//! Registration options are collected in a [`DvSpec`], built fluently:
//!
//! ```rust
//! use wb_core::design_var::DvSpec;
//!
//! let spec = DvSpec::new()
//!     .value(0.5)
//!     .bounds(0.0, 1.0)
//!     .scale(0.1);
//!
//! assert_eq!(spec.lower, Some(0.0));
//! assert!(spec.add_to_optimizer);
//! ```
//!
//! Bounds are not enforced against the value. Keeping `lower <= value <= upper`
//! is the caller's responsibility.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// One tunable scalar and its optimizer metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignVariable {
    /// Semantic parameter name on the owner (e.g. `fuelFraction`)
    pub key: String,
    /// Current value as seen by the optimizer (offset not applied)
    pub value: f64,
    /// Lower bound, `None` when unbounded
    pub lower: Option<f64>,
    /// Upper bound, `None` when unbounded
    pub upper: Option<f64>,
    /// Optimizer scaling factor
    pub scale: f64,
    /// Constant added to `value` when written to the owner's attribute
    pub offset: f64,
    /// Whether this problem exports the variable to the optimizer
    pub add_to_optimizer: bool,
}

impl DesignVariable {
    /// Build a design variable from a registration spec and the resolved value.
    pub fn from_spec(key: impl Into<String>, value: f64, spec: &DvSpec) -> Self {
        DesignVariable {
            key: key.into(),
            value,
            lower: spec.lower,
            upper: spec.upper,
            scale: spec.scale,
            offset: spec.offset,
            add_to_optimizer: spec.add_to_optimizer,
        }
    }

    /// Value written to the owning attribute (`value + offset`)
    pub fn attribute_value(&self) -> f64 {
        self.value + self.offset
    }
}

/// Options for registering a design variable.
///
/// Everything except the parameter key is optional. A missing `value` is
/// read from the owner's current attribute at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DvSpec {
    /// Initial value; defaults to the owner's current attribute
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Replaces the `{owner}_{key}` local name verbatim, used to make several
    /// owners share one variable
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub offset: f64,
    /// Axis suffix for vector-valued parameters
    #[serde(default)]
    pub axis: Option<String>,
    #[serde(default = "default_add_to_optimizer")]
    pub add_to_optimizer: bool,
}

fn default_scale() -> f64 {
    1.0
}

fn default_add_to_optimizer() -> bool {
    true
}

impl Default for DvSpec {
    fn default() -> Self {
        DvSpec {
            value: None,
            lower: None,
            upper: None,
            scale: default_scale(),
            name: None,
            offset: 0.0,
            axis: None,
            add_to_optimizer: default_add_to_optimizer(),
        }
    }
}

impl DvSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn lower(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn upper(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    /// Set both bounds at once
    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.lower(lower).upper(upper)
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn axis(mut self, axis: impl Into<String>) -> Self {
        self.axis = Some(axis.into());
        self
    }

    /// Track the variable without exporting it from this problem
    pub fn tracked_only(mut self) -> Self {
        self.add_to_optimizer = false;
        self
    }

    /// Resolve the local DV name for an owner.
    ///
    /// `{owner}_{key}` unless an override name was given, then `_{axis}` when
    /// an axis is present (the suffix applies to override names too).
    pub fn local_name(&self, owner: &str, key: &str) -> String {
        let mut name = match &self.name {
            Some(name) => name.clone(),
            None => format!("{}_{}", owner, key),
        };
        if let Some(axis) = &self.axis {
            name.push('_');
            name.push_str(axis);
        }
        name
    }
}

/// Cartesian axis for vector-valued parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index into an `[x, y, z]` triple
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl FromStr for Axis {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(CalcError::invalid_input("axis", other, "Axis must be one of x, y, z")),
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_default() {
        let spec = DvSpec::new();
        assert_eq!(spec.local_name("cruise", "fuelFraction"), "cruise_fuelFraction");
    }

    #[test]
    fn test_local_name_override_and_axis() {
        let spec = DvSpec::new().name("shared_cg");
        assert_eq!(spec.local_name("wing", "cg"), "shared_cg");

        let spec = DvSpec::new().axis("x");
        assert_eq!(spec.local_name("wing", "cg"), "wing_cg_x");

        let spec = DvSpec::new().name("shared_cg").axis("z");
        assert_eq!(spec.local_name("wing", "cg"), "shared_cg_z");
    }

    #[test]
    fn test_from_spec_copies_options() {
        let spec = DvSpec::new().bounds(0.0, 1.0).scale(0.1).offset(0.05).tracked_only();
        let dv = DesignVariable::from_spec("reserveFraction", 0.1, &spec);
        assert_eq!(dv.key, "reserveFraction");
        assert_eq!(dv.lower, Some(0.0));
        assert_eq!(dv.upper, Some(1.0));
        assert_eq!(dv.scale, 0.1);
        assert!(!dv.add_to_optimizer);
        assert!((dv.attribute_value() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_spec_deserialize_defaults() {
        let spec: DvSpec = serde_json::from_str("{}").unwrap();
        assert_eq!(spec, DvSpec::default());
        assert_eq!(spec.scale, 1.0);
        assert!(spec.add_to_optimizer);
    }

    #[test]
    fn test_axis_parse() {
        assert_eq!("Y".parse::<Axis>().unwrap(), Axis::Y);
        assert_eq!(Axis::Z.index(), 2);
        assert!("w".parse::<Axis>().is_err());
    }
}
