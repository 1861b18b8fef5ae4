//! # Optimizer Interface
//!
//! The outer optimization problem is a collaborator: weight problems only
//! push variables and linear constraints into it through
//! [`OptimizerProblem`]. [`OptProblem`] is an in-memory implementation that
//! records what it receives, for the CLI and for tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Optimizer variable type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VarKind {
    /// Continuous (`'c'`)
    #[default]
    Continuous,
}

impl VarKind {
    pub fn code(&self) -> &'static str {
        match self {
            VarKind::Continuous => "c",
        }
    }
}

/// A design variable as handed to the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptVariable {
    pub name: String,
    pub kind: VarKind,
    pub value: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub scale: f64,
}

/// Linear inequality `lower <= sum(jac[v] * v) <= upper` over `wrt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub scale: f64,
    /// Always true for constraints built here
    pub linear: bool,
    /// Variables the constraint references, in order
    pub wrt: Vec<String>,
    /// Coefficient row per referenced variable
    pub jac: BTreeMap<String, Vec<Vec<f64>>>,
}

impl LinearConstraint {
    /// Constraint with a unit coefficient on every variable in `wrt`
    pub fn unit_sum(name: impl Into<String>, lower: f64, upper: f64, wrt: Vec<String>) -> Self {
        let jac = wrt.iter().map(|var| (var.clone(), vec![vec![1.0]])).collect();
        LinearConstraint {
            name: name.into(),
            lower,
            upper,
            scale: 1.0,
            linear: true,
            wrt,
            jac,
        }
    }

    /// Coefficient on a variable, `None` when it is not referenced
    pub fn coefficient(&self, var: &str) -> Option<f64> {
        self.jac
            .get(var)
            .and_then(|rows| rows.first())
            .and_then(|row| row.first())
            .copied()
    }
}

/// Receiving end of variable and constraint export.
pub trait OptimizerProblem {
    fn add_var(&mut self, var: OptVariable);

    fn add_con(&mut self, con: LinearConstraint);
}

/// Recording optimizer problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptProblem {
    pub name: String,
    pub variables: Vec<OptVariable>,
    pub constraints: Vec<LinearConstraint>,
}

impl OptProblem {
    pub fn new(name: impl Into<String>) -> Self {
        OptProblem {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn variable(&self, name: &str) -> Option<&OptVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn constraint(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Current values of all recorded variables, keyed by name
    pub fn values(&self) -> BTreeMap<String, f64> {
        self.variables.iter().map(|v| (v.name.clone(), v.value)).collect()
    }
}

impl OptimizerProblem for OptProblem {
    fn add_var(&mut self, var: OptVariable) {
        self.variables.push(var);
    }

    fn add_con(&mut self, con: LinearConstraint) {
        self.constraints.push(con);
    }
}
