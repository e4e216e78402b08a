//! The immutable table of extractable targets.

use std::collections::BTreeMap;

use crate::target::TargetConfig;
use crate::{Error, Result};

/// Lookup table from target name to its configuration.
///
/// Built once at startup and handed to the pipeline; there are no
/// mutation operations after construction.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<String, TargetConfig>,
}

impl TargetRegistry {
    /// Build a registry, validating every target and rejecting duplicate names.
    pub fn new(targets: impl IntoIterator<Item = TargetConfig>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for target in targets {
            target.validate()?;
            if map.contains_key(&target.name) {
                return Err(Error::Configuration(format!(
                    "target '{}' is defined more than once",
                    target.name
                )));
            }
            map.insert(target.name.clone(), target);
        }
        Ok(Self { targets: map })
    }

    pub fn lookup(&self, name: &str) -> Result<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.targets.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetConfig> {
        self.targets.values()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
