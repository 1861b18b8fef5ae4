//! # Variable Namespace
//!
//! Per-problem mapping from fully-qualified DV name to the owning entity and
//! the last value seen for it. Fully-qualified names are
//! `{problem}_{local}`, where the local name is `{owner}_{key}[_{axis}]` or a
//! caller-supplied override.
//!
//! The stored values are a cache of the owning [`DesignVariable`]s. The
//! problem writes through it on registration and on every applied value
//! vector; the design variables on the owners stay authoritative.
//!
//! [`DesignVariable`]: crate::design_var::DesignVariable

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which registered entity owns a namespace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum DvOwnerRef {
    /// Component, keyed by its name
    Component(String),
    /// Fuel case, by registration index
    FuelCase(usize),
}

impl std::fmt::Display for DvOwnerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DvOwnerRef::Component(name) => write!(f, "component '{}'", name),
            DvOwnerRef::FuelCase(index) => write!(f, "fuel case #{}", index),
        }
    }
}

/// One entry of the namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    pub owner: DvOwnerRef,
    /// Name of the DV in the owner's own map
    pub local_name: String,
    pub value: f64,
}

/// Fully-qualified name registry for one weight problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariableNamespace {
    prefix: String,
    entries: BTreeMap<String, NamespaceEntry>,
}

impl VariableNamespace {
    /// Create an empty namespace whose names start with `{prefix}_`
    pub fn new(prefix: impl Into<String>) -> Self {
        VariableNamespace {
            prefix: prefix.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Fully-qualified name for a local DV name
    ///
    /// ```rust
    /// use wb_core::namespace::VariableNamespace;
    ///
    /// let ns = VariableNamespace::new("cruise");
    /// assert_eq!(ns.qualify("full_fuelFraction"), "cruise_full_fuelFraction");
    /// ```
    pub fn qualify(&self, local_name: &str) -> String {
        format!("{}_{}", self.prefix, local_name)
    }

    /// Insert or overwrite the entry for a local name.
    ///
    /// Returns the previous entry when the fully-qualified name was already
    /// taken. Overwriting is permitted so that several owners can share one
    /// variable.
    pub fn insert(&mut self, owner: DvOwnerRef, local_name: &str, value: f64) -> Option<NamespaceEntry> {
        let fq_name = self.qualify(local_name);
        self.entries.insert(
            fq_name,
            NamespaceEntry {
                owner,
                local_name: local_name.to_string(),
                value,
            },
        )
    }

    /// Update the cached value of an existing entry. Unknown names are ignored.
    pub fn set_value(&mut self, fq_name: &str, value: f64) {
        if let Some(entry) = self.entries.get_mut(fq_name) {
            entry.value = value;
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, fq_name: &str) -> Option<&NamespaceEntry> {
        self.entries.get(fq_name)
    }

    /// Cached value for a fully-qualified name
    pub fn value(&self, fq_name: &str) -> Option<f64> {
        self.entries.get(fq_name).map(|entry| entry.value)
    }

    pub fn contains(&self, fq_name: &str) -> bool {
        self.entries.contains_key(fq_name)
    }

    /// Fully-qualified names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Snapshot of fully-qualified name to value
    pub fn values(&self) -> BTreeMap<String, f64> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut ns = VariableNamespace::new("wb");
        assert!(ns
            .insert(DvOwnerRef::FuelCase(0), "full_fuelFraction", 0.9)
            .is_none());
        assert_eq!(ns.value("wb_full_fuelFraction"), Some(0.9));
        assert_eq!(ns.get("wb_full_fuelFraction").unwrap().local_name, "full_fuelFraction");
        assert_eq!(ns.value("full_fuelFraction"), None);
    }

    #[test]
    fn test_collision_overwrites() {
        let mut ns = VariableNamespace::new("wb");
        ns.insert(DvOwnerRef::Component("wing".into()), "shared", 1.0);
        let previous = ns.insert(DvOwnerRef::Component("tail".into()), "shared", 2.0);
        assert_eq!(previous.unwrap().owner, DvOwnerRef::Component("wing".into()));
        assert_eq!(ns.len(), 1);
        assert_eq!(ns.value("wb_shared"), Some(2.0));
    }

    #[test]
    fn test_set_value_ignores_unknown() {
        let mut ns = VariableNamespace::new("wb");
        ns.insert(DvOwnerRef::FuelCase(0), "a", 1.0);
        ns.set_value("wb_a", 3.0);
        ns.set_value("wb_missing", 4.0);
        assert_eq!(ns.value("wb_a"), Some(3.0));
        assert_eq!(ns.len(), 1);
    }

    #[test]
    fn test_clear_keeps_prefix() {
        let mut ns = VariableNamespace::new("wb");
        ns.insert(DvOwnerRef::Component("wing".into()), "wing_mass", 10.0);
        ns.clear();
        assert!(ns.is_empty());
        assert_eq!(ns.qualify("wing_mass"), "wb_wing_mass");
    }
}
