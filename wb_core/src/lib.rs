//! # wb_core - Weight and Balance Problem Assembly
//!
//! `wb_core` collects mass-contributing components and fuel-loading cases
//! into a single weight problem, names their design variables in one flat
//! namespace, and exposes those variables and the fuel-fraction constraints
//! to an outer optimization driver.
//!
//! ## Design Philosophy
//!
//! - **Opaque components**: the problem only sees names, types, design
//!   variables and mass/CG outputs
//! - **Deterministic**: variable and constraint order depends only on names
//!   and registration order
//! - **JSON-First**: definitions, errors and recorded optimizer problems are
//!   all serializable
//!
//! ## Quick Start
//!
//! ```rust
//! use wb_core::{DvSpec, FuelCase, OptProblem, UnitSystem, WeightProblem};
//!
//! let mut problem = WeightProblem::new("wb", UnitSystem::English);
//!
//! let mut case = FuelCase::new("full", 0.9, 0.1);
//! case.add_dv("fuelFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
//! case.add_dv("reserveFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
//! problem.add_fuel_case(case);
//!
//! let mut opt = OptProblem::new("mdo");
//! problem.add_variables(&mut opt);
//! problem.add_constraints(&mut opt);
//!
//! let json = serde_json::to_string_pretty(&opt).unwrap();
//! assert!(json.contains("wb_full_fuelcase"));
//! ```
//!
//! ## Modules
//!
//! - [`problem`] - The weight problem container and optimizer interface
//! - [`component`] - Component trait and the point-mass component
//! - [`fuel_case`] - Fuel-loading cases
//! - [`design_var`] - Design variable records and registration options
//! - [`namespace`] - Fully-qualified variable names and cached values
//! - [`constraints`] - Fuel-fraction linear constraints
//! - [`optimizer`] - Optimizer-facing trait and a recording implementation
//! - [`filter`] - Component selection by name and type
//! - [`definition`] - JSON problem definitions
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`reports`] - Tecplot and plain-text mass reports
//! - [`units`] - Unit systems
//! - [`errors`] - Structured error types

pub mod component;
pub mod constraints;
pub mod definition;
pub mod design_var;
pub mod errors;
pub mod file_io;
pub mod filter;
pub mod fuel_case;
pub mod namespace;
pub mod optimizer;
pub mod problem;
pub mod reports;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use component::{CgLocation, Component, DvOwner, MassComponent};
pub use definition::ProblemDefinition;
pub use design_var::{DesignVariable, DvSpec};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_definition, save_definition, DefinitionLock};
pub use filter::ComponentFilter;
pub use fuel_case::{FuelCase, FuelParam};
pub use optimizer::{LinearConstraint, OptProblem, OptVariable, OptimizerProblem};
pub use problem::WeightProblem;
pub use units::UnitSystem;
