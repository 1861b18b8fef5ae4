//! # Fuel-Fraction Constraints
//!
//! Mission and reserve fuel share one tank volume, so for every fuel case
//! `fuelFraction + reserveFraction <= 1`. When only one fraction is a design
//! variable the other enters as its current value and the constraint reduces
//! to a bound on a single variable:
//!
//! | DVs registered    | Constraint                                   |
//! |-------------------|----------------------------------------------|
//! | both              | `0 <= fuel + reserve <= 1`                   |
//! | reserve only      | `0 <= reserve <= 1 - fuelFraction`           |
//! | fuel only         | `0 <= fuel <= 1 - reserveFraction`           |
//! | neither           | none                                         |
//!
//! ## Example
//!
//! ```rust
//! use wb_core::constraints::fuel_case_constraint;
//! use wb_core::design_var::DvSpec;
//! use wb_core::fuel_case::FuelCase;
//!
//! let mut case = FuelCase::new("cruise", 0.75, 0.1);
//! case.add_dv("reserveFraction", DvSpec::new()).unwrap();
//!
//! let con = fuel_case_constraint(&case, "wb").unwrap();
//! assert_eq!(con.name, "wb_cruise_fuelcase");
//! assert_eq!(con.upper, 0.25);
//! assert_eq!(con.wrt, vec!["wb_cruise_reserveFraction".to_string()]);
//! ```

use crate::fuel_case::{FuelCase, FuelParam};
use crate::optimizer::LinearConstraint;

/// Suffix of every fuel-case constraint name
pub const FUEL_CASE_CONSTRAINT_SUFFIX: &str = "fuelcase";

/// Name of the constraint for a case: `{prefix}_{case}_fuelcase`
pub fn constraint_name(prefix: &str, case_name: &str) -> String {
    format!("{}_{}_{}", prefix, case_name, FUEL_CASE_CONSTRAINT_SUFFIX)
}

/// Build the fuel/reserve coupling constraint for one case.
///
/// Variables are referenced by their fully-qualified name `{prefix}_{local}`,
/// so an override name given at registration is honoured. Returns `None`
/// when neither fraction is a design variable.
pub fn fuel_case_constraint(case: &FuelCase, prefix: &str) -> Option<LinearConstraint> {
    let fq = |param: FuelParam| {
        case.dv_name(param)
            .map(|local| format!("{}_{}", prefix, local))
    };
    let name = constraint_name(prefix, &case.name);

    match (fq(FuelParam::FuelFraction), fq(FuelParam::ReserveFraction)) {
        (Some(fuel), Some(reserve)) => Some(LinearConstraint::unit_sum(name, 0.0, 1.0, vec![fuel, reserve])),
        (None, Some(reserve)) => Some(LinearConstraint::unit_sum(
            name,
            0.0,
            1.0 - case.fuel_fraction,
            vec![reserve],
        )),
        (Some(fuel), None) => Some(LinearConstraint::unit_sum(
            name,
            0.0,
            1.0 - case.reserve_fraction,
            vec![fuel],
        )),
        (None, None) => None,
    }
}

/// Constraints for a sequence of cases, skipping cases without fraction DVs
pub fn fuel_case_constraints<'a>(
    cases: impl IntoIterator<Item = &'a FuelCase>,
    prefix: &str,
) -> Vec<LinearConstraint> {
    cases
        .into_iter()
        .filter_map(|case| fuel_case_constraint(case, prefix))
        .collect()
}
