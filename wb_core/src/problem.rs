//! # Weight Problem
//!
//! The `WeightProblem` is the container an outer optimization driver talks
//! to. It owns the registered components and fuel cases, the namespace of
//! fully-qualified design-variable names, and the cached current values.
//!
//! ## Structure
//!
//! ```text
//! WeightProblem
//! ├── name, units, eval_funcs, solve_failed
//! ├── components: BTreeMap<name, Box<dyn Component>>   (upsert by name)
//! ├── fuel_cases: Vec<FuelCase>                        (append only)
//! └── namespace: VariableNamespace                     ({name}_{local} -> value)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use wb_core::component::MassComponent;
//! use wb_core::design_var::DvSpec;
//! use wb_core::fuel_case::FuelCase;
//! use wb_core::optimizer::OptProblem;
//! use wb_core::problem::WeightProblem;
//! use wb_core::units::UnitSystem;
//!
//! let mut problem = WeightProblem::new("wb", UnitSystem::English);
//!
//! let mut case = FuelCase::new("full", 0.9, 0.1);
//! case.add_dv("fuelFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
//! problem.add_fuel_case(case);
//! problem.add_component(Box::new(MassComponent::new("wing", "wing", 1200.0, [10.0, 0.0, 1.5])));
//!
//! let mut opt = OptProblem::new("mdo");
//! problem.add_variables(&mut opt);
//! problem.add_constraints(&mut opt);
//! assert!(opt.variable("wb_full_fuelFraction").is_some());
//! assert!(opt.constraint("wb_full_fuelcase").is_some());
//!
//! let x = HashMap::from([("wb_full_fuelFraction".to_string(), 0.6)]);
//! problem.set_design_vars(&x);
//! assert_eq!(problem.fuel_cases()[0].fuel_fraction, 0.6);
//! assert_eq!(problem.current_dv("wb_full_fuelFraction"), Some(0.6));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::component::{CgLocation, Component, DvOwner};
use crate::constraints::fuel_case_constraints;
use crate::design_var::DesignVariable;
use crate::filter::ComponentFilter;
use crate::fuel_case::FuelCase;
use crate::namespace::{DvOwnerRef, VariableNamespace};
use crate::optimizer::{LinearConstraint, OptVariable, OptimizerProblem, VarKind};
use crate::units::UnitSystem;

/// Weight-and-balance problem for one vehicle configuration.
#[derive(Debug)]
pub struct WeightProblem {
    /// Configuration name, also the prefix of every DV name
    pub name: String,

    /// Unit system pushed into every registered component
    pub units: UnitSystem,

    /// Functions the outer system should evaluate for this problem
    pub eval_funcs: BTreeSet<String>,

    /// Set by the driver when an analysis of this problem failed
    pub solve_failed: bool,

    components: BTreeMap<String, Box<dyn Component>>,
    fuel_cases: Vec<FuelCase>,
    namespace: VariableNamespace,
    /// Owners in registration order; a replaced component moves to the end
    registration_order: Vec<DvOwnerRef>,
}

impl WeightProblem {
    pub fn new(name: impl Into<String>, units: UnitSystem) -> Self {
        let name = name.into();
        WeightProblem {
            namespace: VariableNamespace::new(name.clone()),
            name,
            units,
            eval_funcs: BTreeSet::new(),
            solve_failed: false,
            components: BTreeMap::new(),
            fuel_cases: Vec::new(),
            registration_order: Vec::new(),
        }
    }

    pub fn with_eval_funcs<S: Into<String>>(mut self, funcs: impl IntoIterator<Item = S>) -> Self {
        self.eval_funcs = funcs.into_iter().map(Into::into).collect();
        self
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register one component.
    ///
    /// The problem's unit system is pushed into the component first. A
    /// component whose name is already registered replaces the earlier one.
    pub fn add_component(&mut self, mut component: Box<dyn Component>) {
        component.set_unit_system(self.units);
        let name = component.name().to_string();

        let owner = DvOwnerRef::Component(name.clone());
        let replaced = self.components.insert(name.clone(), component).is_some();
        self.registration_order.retain(|registered| *registered != owner);
        self.registration_order.push(owner.clone());
        if replaced {
            warn!(problem = %self.name, component = %name, "component already registered, replacing it");
            self.rebuild_namespace();
        } else if let Some(component) = self.components.get(&name) {
            register_dvs(&mut self.namespace, &self.name, owner, component.design_vars());
        }
        debug!(problem = %self.name, component = %name, "registered component");
    }

    /// Register a sequence of components in order
    pub fn add_components(&mut self, components: impl IntoIterator<Item = Box<dyn Component>>) {
        for component in components {
            self.add_component(component);
        }
    }

    /// Append one fuel case. Duplicate case names are kept side by side.
    pub fn add_fuel_case(&mut self, case: FuelCase) {
        let index = self.fuel_cases.len();
        register_dvs(
            &mut self.namespace,
            &self.name,
            DvOwnerRef::FuelCase(index),
            case.design_vars(),
        );
        self.registration_order.push(DvOwnerRef::FuelCase(index));
        debug!(problem = %self.name, case = %case.name, index, "registered fuel case");
        self.fuel_cases.push(case);
    }

    /// Append a sequence of fuel cases in order
    pub fn add_fuel_cases(&mut self, cases: impl IntoIterator<Item = FuelCase>) {
        for case in cases {
            self.add_fuel_case(case);
        }
    }

    // Recompute every namespace entry from the owners, replaying them in
    // registration order so the last registered owner of a shared name wins.
    fn rebuild_namespace(&mut self) {
        self.namespace.clear();
        for owner in &self.registration_order {
            let dvs = match owner {
                DvOwnerRef::Component(name) => match self.components.get(name) {
                    Some(component) => component.design_vars(),
                    None => continue,
                },
                DvOwnerRef::FuelCase(index) => match self.fuel_cases.get(*index) {
                    Some(case) => case.design_vars(),
                    None => continue,
                },
            };
            for (local_name, dv) in dvs {
                self.namespace.insert(owner.clone(), local_name, dv.value);
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn num_components(&self) -> usize {
        self.components.len()
    }

    pub fn component(&self, name: &str) -> Option<&dyn Component> {
        self.components.get(name).map(|c| &**c as &dyn Component)
    }

    /// Components in name order
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.values().map(|c| &**c as &dyn Component)
    }

    /// Fuel cases in registration order
    pub fn fuel_cases(&self) -> &[FuelCase] {
        &self.fuel_cases
    }

    pub fn namespace(&self) -> &VariableNamespace {
        &self.namespace
    }

    /// Cached current value of a fully-qualified DV
    pub fn current_dv(&self, fq_name: &str) -> Option<f64> {
        self.namespace.value(fq_name)
    }

    /// Snapshot of all current DV values keyed by fully-qualified name
    pub fn current_dvs(&self) -> BTreeMap<String, f64> {
        self.namespace.values()
    }

    // ------------------------------------------------------------------
    // Design variables
    // ------------------------------------------------------------------

    /// Push values from a global variable vector into the owning entities.
    ///
    /// `x` may hold variables of other problems; names this problem does not
    /// own are ignored. Each matched value is written to the owner (which
    /// applies its offset), to the owner's design variable, and to the cache.
    pub fn set_design_vars(&mut self, x: &HashMap<String, f64>) {
        let mut applied = 0;

        for component in self.components.values_mut() {
            let local = owner_slice(&self.namespace, component.design_vars(), x);
            if local.is_empty() {
                continue;
            }
            component.set_design_vars(&local);
            applied += local.len();
            write_back(&mut self.namespace, &local);
        }

        for case in &mut self.fuel_cases {
            let local = owner_slice(&self.namespace, case.design_vars(), x);
            if local.is_empty() {
                continue;
            }
            case.set_design_vars(&local);
            applied += local.len();
            write_back(&mut self.namespace, &local);
        }

        debug!(problem = %self.name, offered = x.len(), applied, "applied design variables");
    }

    /// Fully-qualified DV names: component DVs in component-name order, then
    /// fuel-case DVs in registration order.
    pub fn var_names(&self) -> Vec<String> {
        self.all_dvs().map(|(fq_name, _)| fq_name).collect()
    }

    /// Export every optimizer-visible DV once, keyed by fully-qualified name.
    ///
    /// Returns the number of variables added.
    pub fn add_variables<O: OptimizerProblem + ?Sized>(&self, opt: &mut O) -> usize {
        let mut seen = HashSet::new();
        let mut added = 0;
        for (fq_name, dv) in self.all_dvs() {
            if !dv.add_to_optimizer || !seen.insert(fq_name.clone()) {
                continue;
            }
            opt.add_var(OptVariable {
                name: fq_name,
                kind: VarKind::Continuous,
                value: dv.value,
                lower: dv.lower,
                upper: dv.upper,
                scale: dv.scale,
            });
            added += 1;
        }
        added
    }

    /// Fuel/reserve coupling constraints for every fuel case
    pub fn linear_constraints(&self) -> Vec<LinearConstraint> {
        fuel_case_constraints(&self.fuel_cases, &self.name)
    }

    /// Add the fuel-case constraints to the optimizer. Returns how many.
    pub fn add_constraints<O: OptimizerProblem + ?Sized>(&self, opt: &mut O) -> usize {
        let constraints = self.linear_constraints();
        let count = constraints.len();
        for con in constraints {
            opt.add_con(con);
        }
        count
    }

    fn all_dvs(&self) -> impl Iterator<Item = (String, &DesignVariable)> {
        let components = self.components.values().flat_map(|c| c.design_vars().iter());
        let cases = self.fuel_cases.iter().flat_map(|c| c.design_vars().iter());
        components
            .chain(cases)
            .map(move |(local_name, dv)| (self.namespace.qualify(local_name), dv))
    }

    // ------------------------------------------------------------------
    // Selection and aggregation
    // ------------------------------------------------------------------

    /// Names of the components passing `filter`
    pub fn select_component_keys(&self, filter: &ComponentFilter) -> BTreeSet<String> {
        filter.select(
            self.components
                .iter()
                .map(|(name, component)| (name.as_str(), component.comp_type())),
        )
    }

    fn selected(&self, filter: &ComponentFilter) -> impl Iterator<Item = &dyn Component> {
        self.select_component_keys(filter)
            .into_iter()
            .filter_map(|key| self.components.get(&key).map(|c| &**c as &dyn Component))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Sum of component masses passing `filter`
    pub fn total_mass(&self, filter: &ComponentFilter) -> f64 {
        self.selected(filter).map(|c| c.mass()).sum()
    }

    /// Sum of component weights passing `filter`
    pub fn total_weight(&self, filter: &ComponentFilter) -> f64 {
        self.selected(filter).map(|c| c.weight()).sum()
    }

    /// Mass-weighted CG of the components passing `filter`.
    ///
    /// `None` when the selected mass is zero.
    pub fn center_of_gravity(&self, filter: &ComponentFilter, location: CgLocation) -> Option<[f64; 3]> {
        let mut total = 0.0;
        let mut moment = [0.0; 3];
        for component in self.selected(filter) {
            let mass = component.mass();
            let cg = component.cg(location);
            total += mass;
            for (m, c) in moment.iter_mut().zip(cg) {
                *m += mass * c;
            }
        }
        if total == 0.0 {
            return None;
        }
        Some(moment.map(|m| m / total))
    }
}

impl std::fmt::Display for WeightProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Weight problem '{}' ({})", self.name, self.units)?;
        for (name, component) in &self.components {
            writeln!(f, "  {}", name)?;
            writeln!(f, "    {}", component.summary())?;
        }
        for case in &self.fuel_cases {
            writeln!(
                f,
                "  fuel case {}: fuel {:.4}, reserve {:.4}",
                case.name, case.fuel_fraction, case.reserve_fraction
            )?;
        }
        Ok(())
    }
}

// Insert an owner's DVs, warning when a name was held by someone else.
fn register_dvs(
    namespace: &mut VariableNamespace,
    problem: &str,
    owner: DvOwnerRef,
    dvs: &BTreeMap<String, DesignVariable>,
) {
    for (local_name, dv) in dvs {
        if let Some(previous) = namespace.insert(owner.clone(), local_name, dv.value) {
            if previous.owner != owner {
                warn!(
                    problem = %problem,
                    variable = %namespace.qualify(local_name),
                    previous = %previous.owner,
                    current = %owner,
                    "design variable name shared between owners"
                );
            }
        }
    }
}

// Values of `x` addressed to one owner, re-keyed by local name.
fn owner_slice(
    namespace: &VariableNamespace,
    dvs: &BTreeMap<String, DesignVariable>,
    x: &HashMap<String, f64>,
) -> HashMap<String, f64> {
    dvs.keys()
        .filter_map(|local_name| {
            x.get(&namespace.qualify(local_name))
                .map(|&value| (local_name.clone(), value))
        })
        .collect()
}

fn write_back(namespace: &mut VariableNamespace, local: &HashMap<String, f64>) {
    for (local_name, &value) in local {
        let fq_name = namespace.qualify(local_name);
        namespace.set_value(&fq_name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::MassComponent;
    use crate::design_var::DvSpec;
    use crate::optimizer::OptProblem;
    use approx::assert_relative_eq;

    fn component(name: &str, comp_type: &str, mass: f64, x: f64) -> Box<dyn Component> {
        Box::new(MassComponent::new(name, comp_type, mass, [x, 0.0, 0.0]))
    }

    fn wing_with_dvs() -> Box<dyn Component> {
        let mut wing = MassComponent::new("wing", "wing", 1200.0, [10.0, 0.0, 1.5]);
        wing.add_dv("mass", DvSpec::new().bounds(800.0, 1600.0).offset(25.0))
            .unwrap();
        wing.add_dv("cg", DvSpec::new().axis("x")).unwrap();
        Box::new(wing)
    }

    fn fuel_case(name: &str, fuel_dv: bool, reserve_dv: bool) -> FuelCase {
        let mut case = FuelCase::new(name, 0.9, 0.1);
        if fuel_dv {
            case.add_dv("fuelFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
        }
        if reserve_dv {
            case.add_dv("reserveFraction", DvSpec::new().bounds(0.0, 1.0)).unwrap();
        }
        case
    }

    fn x(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_registration_populates_cache() {
        let mut problem = WeightProblem::new("wb", UnitSystem::Metric);
        problem.add_component(wing_with_dvs());
        problem.add_fuel_case(fuel_case("full", true, false));

        let cache = problem.current_dvs();
        assert_eq!(cache.len(), 3);
        assert_eq!(cache["wb_wing_mass"], 1200.0);
        assert_eq!(cache["wb_wing_cg_x"], 10.0);
        assert_eq!(cache["wb_full_fuelFraction"], 0.9);
    }

    #[test]
    fn test_units_propagate_to_components() {
        let mut problem = WeightProblem::new("wb", UnitSystem::Metric);
        problem.add_component(component("wing", "wing", 100.0, 0.0));
        let wing = problem.component("wing").unwrap();
        assert_relative_eq!(wing.weight(), 980.665, epsilon = 1e-9);
    }

    #[test]
    fn test_set_design_vars_round_trip() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_component(wing_with_dvs());
        problem.add_fuel_case(fuel_case("full", false, true));

        problem.set_design_vars(&x(&[("wb_wing_mass", 1000.0), ("wb_full_reserveFraction", 0.05)]));

        assert_eq!(problem.component("wing").unwrap().mass(), 1025.0);
        assert_eq!(problem.current_dv("wb_wing_mass"), Some(1000.0));
        assert_eq!(problem.fuel_cases()[0].reserve_fraction, 0.05);
        assert_eq!(problem.current_dv("wb_full_reserveFraction"), Some(0.05));
        // untouched DV keeps its value
        assert_eq!(problem.current_dv("wb_wing_cg_x"), Some(10.0));
    }

    #[test]
    fn test_unrelated_names_leave_values_unchanged() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_component(wing_with_dvs());
        problem.add_fuel_case(fuel_case("full", true, true));
        let before = problem.current_dvs();

        problem.set_design_vars(&x(&[
            ("other_wing_mass", 1.0),
            ("wing_mass", 2.0),
            ("other_full_fuelFraction", 0.3),
        ]));

        assert_eq!(problem.current_dvs(), before);
        assert_eq!(problem.component("wing").unwrap().mass(), 1200.0);
        assert_eq!(problem.fuel_cases()[0].fuel_fraction, 0.9);
    }

    #[test]
    fn test_shared_vector_across_problems() {
        let mut cruise = WeightProblem::new("cruise", UnitSystem::English);
        cruise.add_fuel_case(fuel_case("full", true, false));
        let mut landing = WeightProblem::new("landing", UnitSystem::English);
        landing.add_fuel_case(fuel_case("full", true, false));

        let vector = x(&[("cruise_full_fuelFraction", 0.7), ("landing_full_fuelFraction", 0.2)]);
        cruise.set_design_vars(&vector);
        landing.set_design_vars(&vector);

        assert_eq!(cruise.fuel_cases()[0].fuel_fraction, 0.7);
        assert_eq!(landing.fuel_cases()[0].fuel_fraction, 0.2);
    }

    #[test]
    fn test_reregistering_component_keeps_one_entry() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_component(wing_with_dvs());
        let mut tail = MassComponent::new("tail", "tail", 200.0, [20.0, 0.0, 2.0]);
        tail.add_dv("mass", DvSpec::new()).unwrap();
        problem.add_component(Box::new(tail));
        problem.add_component(wing_with_dvs());

        assert_eq!(problem.num_components(), 2);
        assert_eq!(problem.current_dvs().len(), 3);
        assert_eq!(problem.current_dv("wb_tail_mass"), Some(200.0));
        assert_eq!(problem.var_names().len(), 3);
    }

    #[test]
    fn test_replacing_component_drops_its_stale_names() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_component(wing_with_dvs());
        problem.add_component(component("wing", "wing", 900.0, 9.0));

        assert!(problem.current_dvs().is_empty());
        assert_eq!(problem.component("wing").unwrap().mass(), 900.0);
    }

    #[test]
    fn test_replacing_component_keeps_last_owner_of_shared_name() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        let mut case = FuelCase::new("full", 0.9, 0.1);
        case.add_dv("fuelFraction", DvSpec::new().name("shared")).unwrap();
        problem.add_fuel_case(case);
        let mut wing = MassComponent::new("wing", "wing", 1200.0, [10.0, 0.0, 1.5]);
        wing.add_dv("mass", DvSpec::new().name("shared")).unwrap();
        problem.add_component(Box::new(wing));
        assert_eq!(problem.current_dv("wb_shared"), Some(1200.0));

        problem.add_component(component("tail", "tail", 200.0, 20.0));
        problem.add_component(component("tail", "tail", 250.0, 20.0));

        assert_eq!(problem.current_dv("wb_shared"), Some(1200.0));
        assert_eq!(
            problem.namespace().get("wb_shared").unwrap().owner,
            DvOwnerRef::Component("wing".to_string())
        );
    }

    #[test]
    fn test_set_design_vars_applies_fuel_case_offset() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        let mut case = FuelCase::new("full", 0.9, 0.1);
        case.add_dv("reserveFraction", DvSpec::new().bounds(0.0, 1.0).offset(0.02))
            .unwrap();
        problem.add_fuel_case(case);

        problem.set_design_vars(&x(&[("wb_full_reserveFraction", 0.05)]));

        assert_relative_eq!(problem.fuel_cases()[0].reserve_fraction, 0.07, epsilon = 1e-12);
        assert_eq!(problem.current_dv("wb_full_reserveFraction"), Some(0.05));
    }

    #[test]
    fn test_constraint_variables_are_exported_after_reregistration() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        let mut case = FuelCase::new("c", 0.9, 0.1);
        case.add_dv("fuelFraction", DvSpec::new().name("x")).unwrap();
        case.add_dv("reserveFraction", DvSpec::new().name("x")).unwrap();
        case.add_dv("fuelFraction", DvSpec::new()).unwrap();
        problem.add_fuel_case(case);

        let mut opt = OptProblem::new("mdo");
        problem.add_variables(&mut opt);
        problem.add_constraints(&mut opt);

        let con = opt.constraint("wb_c_fuelcase").unwrap();
        assert_eq!(con.wrt, vec!["wb_c_fuelFraction", "wb_x"]);
        for var in &con.wrt {
            assert!(opt.variable(var).is_some(), "{var} not exported");
        }
    }

    #[test]
    fn test_duplicate_fuel_cases_are_kept() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_fuel_cases(vec![fuel_case("full", false, false), fuel_case("full", false, false)]);
        assert_eq!(problem.fuel_cases().len(), 2);
    }

    #[test]
    fn test_var_names_order() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_fuel_case(fuel_case("b_case", true, false));
        problem.add_fuel_case(fuel_case("a_case", true, true));
        problem.add_component(wing_with_dvs());

        assert_eq!(
            problem.var_names(),
            vec![
                "wb_wing_cg_x",
                "wb_wing_mass",
                "wb_b_case_fuelFraction",
                "wb_a_case_fuelFraction",
                "wb_a_case_reserveFraction",
            ]
        );
    }

    #[test]
    fn test_add_variables_respects_flag_and_dedups() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        let mut a = FuelCase::new("a", 0.9, 0.1);
        a.add_dv("fuelFraction", DvSpec::new().name("shared_fuel").bounds(0.0, 1.0).scale(0.1))
            .unwrap();
        a.add_dv("reserveFraction", DvSpec::new().tracked_only()).unwrap();
        let mut b = FuelCase::new("b", 0.9, 0.1);
        b.add_dv("fuelFraction", DvSpec::new().name("shared_fuel")).unwrap();
        problem.add_fuel_cases([a, b]);

        let mut opt = OptProblem::new("mdo");
        assert_eq!(problem.add_variables(&mut opt), 1);
        let var = opt.variable("wb_shared_fuel").unwrap();
        assert_eq!(var.value, 0.9);
        assert_eq!(var.lower, Some(0.0));
        assert_eq!(var.upper, Some(1.0));
        assert_eq!(var.scale, 0.1);
        assert!(opt.variable("wb_a_reserveFraction").is_none());
    }

    #[test]
    fn test_add_constraints() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_fuel_cases([
            fuel_case("both", true, true),
            fuel_case("reserve", false, true),
            fuel_case("none", false, false),
        ]);

        let mut opt = OptProblem::new("mdo");
        assert_eq!(problem.add_constraints(&mut opt), 2);

        let both = opt.constraint("wb_both_fuelcase").unwrap();
        assert_eq!((both.lower, both.upper), (0.0, 1.0));
        assert_eq!(both.wrt.len(), 2);

        let reserve = opt.constraint("wb_reserve_fuelcase").unwrap();
        assert_relative_eq!(reserve.upper, 0.1, epsilon = 1e-12);
        assert_eq!(reserve.wrt, vec!["wb_reserve_reserveFraction"]);
    }

    #[test]
    fn test_select_component_keys() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_components(vec![
            component("A", "wing", 1.0, 0.0),
            component("B", "wing", 1.0, 0.0),
            component("C", "fuel", 1.0, 0.0),
        ]);

        let keys = problem.select_component_keys(&ComponentFilter::new().include_type("wing").exclude("A"));
        assert_eq!(keys, BTreeSet::from(["B".to_string()]));
    }

    #[test]
    fn test_filtered_aggregation() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_components(vec![
            component("wing", "wing", 300.0, 10.0),
            component("fuselage", "body", 100.0, 2.0),
            component("fuel", "fuel", 600.0, 8.0),
        ]);

        let dry = ComponentFilter::new().exclude_type("fuel");
        assert_eq!(problem.total_mass(&dry), 400.0);
        assert_eq!(problem.total_weight(&ComponentFilter::new()), 1000.0);

        let cg = problem.center_of_gravity(&dry, CgLocation::Current).unwrap();
        assert_relative_eq!(cg[0], 8.0, epsilon = 1e-12);

        let nothing = ComponentFilter::new().include("missing");
        assert!(problem.center_of_gravity(&nothing, CgLocation::Current).is_none());
    }

    #[test]
    fn test_display_lists_components() {
        let mut problem = WeightProblem::new("wb", UnitSystem::English);
        problem.add_component(component("wing", "wing", 300.0, 10.0));
        problem.add_fuel_case(fuel_case("full", false, false));
        let text = problem.to_string();
        assert!(text.contains("wing (wing)"));
        assert!(text.contains("fuel case full"));
    }
}
