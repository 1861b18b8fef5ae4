//! # Component Selection
//!
//! Filters for picking a subset of a problem's components by name and by type
//! tag. Each filter is optional and takes either one name or a collection of
//! names. Filters are applied in a fixed order:
//!
//! 1. `include_type` keeps components whose type is listed
//! 2. `include` keeps listed names
//! 3. `exclude` drops listed names
//! 4. `exclude_type` drops components whose type is listed
//!
//! Names and types that match nothing are ignored.
//!
//! ## Example
//!
//! ```rust
//! use wb_core::filter::ComponentFilter;
//!
//! let components = [("A", "wing"), ("B", "wing"), ("C", "fuel")];
//! let keys = ComponentFilter::new()
//!     .include_type("wing")
//!     .exclude("A")
//!     .select(components);
//!
//! assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["B".to_string()]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One name or a collection of names.
///
/// A bare string converts to a one-element set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameSet(pub BTreeSet<String>);

impl NameSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

impl From<&str> for NameSet {
    fn from(name: &str) -> Self {
        NameSet(BTreeSet::from([name.to_string()]))
    }
}

impl From<String> for NameSet {
    fn from(name: String) -> Self {
        NameSet(BTreeSet::from([name]))
    }
}

impl From<&[&str]> for NameSet {
    fn from(names: &[&str]) -> Self {
        NameSet(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameSet {
    fn from(names: [&str; N]) -> Self {
        NameSet(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Vec<String>> for NameSet {
    fn from(names: Vec<String>) -> Self {
        NameSet(names.into_iter().collect())
    }
}

impl From<BTreeSet<String>> for NameSet {
    fn from(names: BTreeSet<String>) -> Self {
        NameSet(names)
    }
}

/// Name/type filter over registered components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentFilter {
    #[serde(default)]
    pub include: Option<NameSet>,
    #[serde(default)]
    pub exclude: Option<NameSet>,
    #[serde(default)]
    pub include_type: Option<NameSet>,
    #[serde(default)]
    pub exclude_type: Option<NameSet>,
}

impl ComponentFilter {
    /// Filter that selects every component
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, names: impl Into<NameSet>) -> Self {
        self.include = Some(names.into());
        self
    }

    pub fn exclude(mut self, names: impl Into<NameSet>) -> Self {
        self.exclude = Some(names.into());
        self
    }

    pub fn include_type(mut self, types: impl Into<NameSet>) -> Self {
        self.include_type = Some(types.into());
        self
    }

    pub fn exclude_type(mut self, types: impl Into<NameSet>) -> Self {
        self.exclude_type = Some(types.into());
        self
    }

    /// Apply the filter to `(name, type)` pairs and return the selected names.
    pub fn select<'a>(&self, components: impl IntoIterator<Item = (&'a str, &'a str)>) -> BTreeSet<String> {
        let types_by_name: BTreeMap<&str, &str> = components.into_iter().collect();
        let type_of = |name: &str| types_by_name.get(name).copied();

        let mut keys: BTreeSet<String> = types_by_name.keys().map(|n| n.to_string()).collect();

        if let Some(types) = &self.include_type {
            keys.retain(|key| type_of(key.as_str()).is_some_and(|t| types.contains(t)));
        }

        if let Some(include) = &self.include {
            keys.retain(|key| include.contains(key));
        }

        if let Some(exclude) = &self.exclude {
            keys.retain(|key| !exclude.contains(key));
        }

        if let Some(types) = &self.exclude_type {
            keys.retain(|key| !type_of(key.as_str()).is_some_and(|t| types.contains(t)));
        }

        keys
    }
}
