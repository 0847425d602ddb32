//! Capability catalog: which platform APIs require which capability.

mod builtin;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analysis::capability::extract_capability;

/// Lookup from callee name to the capability it requires.
pub trait CapabilityCatalog {
    fn required_capability(&self, name: &str) -> Option<&str>;
}

/// Catalog settings from the `[catalog]` section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Extra or overriding API → capability entries.
    #[serde(default)]
    pub apis: BTreeMap<String, String>,
    /// API names removed from the catalog entirely.
    #[serde(default)]
    pub ignore: BTreeSet<String>,
}

/// A static name → capability table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    apis: BTreeMap<String, String>,
}

/// One catalog row, used for `list-apis` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub api: String,
    pub capability: String,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table of platform APIs.
    pub fn builtin() -> Self {
        builtin::BUILTIN_APIS
            .iter()
            .map(|(api, cap)| (api.to_string(), cap.to_string()))
            .collect()
    }

    /// Built-ins merged with config entries, minus ignored names.
    pub fn with_settings(settings: &CatalogSettings) -> Self {
        let mut catalog = Self::builtin();
        for (api, capability) in &settings.apis {
            if extract_capability(capability) != Some(capability.as_str()) {
                tracing::warn!(
                    api = %api,
                    capability = %capability,
                    "catalog entry does not look like a capability identifier"
                );
            }
            catalog.insert(api.clone(), capability.clone());
        }
        for api in &settings.ignore {
            catalog.apis.remove(api);
        }
        catalog
    }

    pub fn insert(&mut self, api: impl Into<String>, capability: impl Into<String>) {
        self.apis.insert(api.into(), capability.into());
    }

    pub fn len(&self) -> usize {
        self.apis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// All entries, sorted by API name.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.apis
            .iter()
            .map(|(api, capability)| CatalogEntry {
                api: api.clone(),
                capability: capability.clone(),
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            apis: iter.into_iter().collect(),
        }
    }
}

impl CapabilityCatalog for Catalog {
    fn required_capability(&self, name: &str) -> Option<&str> {
        self.apis.get(name).map(String::as_str)
    }
}

impl<S: std::hash::BuildHasher> CapabilityCatalog for std::collections::HashMap<String, String, S> {
    fn required_capability(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_location() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.required_capability("getCurrentLocation"),
            Some("SystemCapability.Location.Location.Core")
        );
        assert_eq!(catalog.required_capability("log"), None);
    }

    #[test]
    fn builtin_capabilities_are_well_formed() {
        for entry in Catalog::builtin().entries() {
            assert_eq!(
                extract_capability(&entry.capability),
                Some(entry.capability.as_str()),
                "{}",
                entry.api
            );
        }
    }

    #[test]
    fn settings_add_override_and_ignore() {
        let mut settings = CatalogSettings::default();
        settings.apis.insert(
            "getBatteryInfo".into(),
            "SystemCapability.PowerManager.BatteryManager.Core".into(),
        );
        settings.apis.insert(
            "getLastLocation".into(),
            "SystemCapability.Location.Location.Lite".into(),
        );
        settings.ignore.insert("getCurrentLocation".into());

        let catalog = Catalog::with_settings(&settings);
        assert_eq!(
            catalog.required_capability("getBatteryInfo"),
            Some("SystemCapability.PowerManager.BatteryManager.Core")
        );
        assert_eq!(
            catalog.required_capability("getLastLocation"),
            Some("SystemCapability.Location.Location.Lite")
        );
        assert_eq!(catalog.required_capability("getCurrentLocation"), None);
    }
}
