use indexmap::IndexMap;
use tracing::{debug, trace};

use super::xcode_project::XcodeProject;
use crate::error::{Error, Result};
use crate::objects::PbxObject;
use crate::types::{unquote, PbxValue};

/// Linker flag marking configurations that link the C++ runtime, as it
/// appears in the project file.
pub const CPP_RUNTIME_FLAG: &str = "\"-lc++\"";

/// Seed for a missing `FRAMEWORK_SEARCH_PATHS`.
pub const INHERITED: &str = "$(inherited)";

/// Suffix marking a recursive search path.
pub const RECURSIVE_SUFFIX: &str = "/**";

pub type BuildSettings = IndexMap<String, PbxValue>;

/// Which target a lookup reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetSelector {
    /// First entry of the root project's `targets`.
    #[default]
    First,
    Uuid(String),
}

/// Which configuration of the target's list a lookup reads from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigurationSelector {
    /// The list's `defaultConfigurationName`, first match in list order.
    #[default]
    Default,
    /// The list's `defaultConfigurationName`, last match in list order.
    LastDefault,
    Named(String),
}

/// Explicit target + configuration choice for build setting lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSelector {
    pub target: TargetSelector,
    pub configuration: ConfigurationSelector,
}

impl ConfigSelector {
    pub fn for_target(uuid: impl Into<String>) -> Self {
        ConfigSelector {
            target: TargetSelector::Uuid(uuid.into()),
            configuration: ConfigurationSelector::Default,
        }
    }

    /// First target, default configuration resolved to the last
    /// configuration carrying the default name. Used by [`crate::link`].
    pub fn convention() -> Self {
        ConfigSelector {
            target: TargetSelector::First,
            configuration: ConfigurationSelector::LastDefault,
        }
    }

    pub fn configuration(mut self, name: impl Into<String>) -> Self {
        self.configuration = ConfigurationSelector::Named(name.into());
        self
    }
}

/// True iff `OTHER_LDFLAGS` is a list containing the quoted `"-lc++"` token.
pub fn has_linked_cpp_runtime(build_settings: &BuildSettings) -> bool {
    build_settings
        .get("OTHER_LDFLAGS")
        .is_some_and(|flags| flags.contains_str(CPP_RUNTIME_FLAG))
}

impl XcodeProject {
    /// Configurations of a list whose unquoted `name` equals `name`, in
    /// list order.
    fn configurations_named(&self, list_uuid: &str, name: &str) -> Vec<&PbxObject> {
        let Some(list) = self.get_object(list_uuid) else {
            return Vec::new();
        };
        list.get_str_array("buildConfigurations")
            .into_iter()
            .filter_map(|uuid| self.get_object(uuid))
            .filter(|config| config.get_unquoted("name") == Some(unquote(name)))
            .collect()
    }

    fn default_configuration_name(&self, list_uuid: &str) -> &str {
        self.get_object(list_uuid)
            .and_then(|list| list.get_str("defaultConfigurationName"))
            .unwrap_or_default()
    }

    /// Find the configuration named `name` in a configuration list.
    /// The first match in list order wins.
    pub fn find_configuration(&self, list_uuid: &str, name: &str) -> Result<&PbxObject> {
        self.configurations_named(list_uuid, name)
            .first()
            .copied()
            .ok_or_else(|| configuration_not_found(list_uuid, name))
    }

    /// Like [`find_configuration`](Self::find_configuration), but the last
    /// match in list order wins.
    pub fn find_last_configuration(&self, list_uuid: &str, name: &str) -> Result<&PbxObject> {
        self.configurations_named(list_uuid, name)
            .last()
            .copied()
            .ok_or_else(|| configuration_not_found(list_uuid, name))
    }

    /// The configuration a list names as its default.
    pub fn default_configuration(&self, list_uuid: &str) -> Result<&PbxObject> {
        self.find_configuration(list_uuid, self.default_configuration_name(list_uuid))
    }

    /// UUID of the target a selector points at.
    pub fn select_target(&self, target: &TargetSelector) -> Result<String> {
        match target {
            TargetSelector::First => self.first_target_uuid(),
            TargetSelector::Uuid(uuid) => self.get_target(uuid).map(|t| t.uuid.clone()),
        }
    }

    /// Resolve a selector to a build configuration object.
    pub fn select_configuration(&self, selector: &ConfigSelector) -> Result<&PbxObject> {
        let target_uuid = self.select_target(&selector.target)?;
        let list_uuid = self
            .get_target(&target_uuid)?
            .get_str("buildConfigurationList")
            .ok_or_else(|| Error::MissingConfigurationList(target_uuid.clone()))?;

        match &selector.configuration {
            ConfigurationSelector::Default => self.default_configuration(list_uuid),
            ConfigurationSelector::LastDefault => {
                self.find_last_configuration(list_uuid, self.default_configuration_name(list_uuid))
            }
            ConfigurationSelector::Named(name) => self.find_configuration(list_uuid, name),
        }
    }

    /// Read one build setting from the selected configuration.
    pub fn build_property(&self, selector: &ConfigSelector, key: &str) -> Result<Option<&PbxValue>> {
        let config = self.select_configuration(selector)?;
        trace!(configuration = %config.uuid, key, "build property lookup");
        Ok(config.build_settings().and_then(|settings| settings.get(key)))
    }

    /// Call `callback` with the settings of every build configuration whose
    /// settings satisfy `predicate`, in table order.
    pub fn each_build_configuration<P, F>(&mut self, mut predicate: P, mut callback: F)
    where
        P: FnMut(&BuildSettings) -> bool,
        F: FnMut(&str, &mut BuildSettings),
    {
        for (uuid, object) in self.objects_mut() {
            if uuid.ends_with("_comment") || object.isa != "XCBuildConfiguration" {
                continue;
            }
            let Some(settings) = object.build_settings_mut() else {
                continue;
            };
            if predicate(settings) {
                callback(uuid, settings);
            }
        }
    }

    /// Append `path` (or `path/**`) to `FRAMEWORK_SEARCH_PATHS` of every
    /// configuration that links the C++ runtime. Entries are compared
    /// without their quotes. Returns how many configurations changed.
    pub fn add_to_framework_search_paths(&mut self, path: &str, recursive: bool) -> usize {
        let entry = if recursive {
            recursive_form(path)
        } else {
            path.to_string()
        };

        let mut changed = 0;
        self.each_build_configuration(has_linked_cpp_runtime, |uuid, settings| {
            let paths = search_paths_entry(settings);
            if paths.iter().any(|p| p.unquoted() == Some(unquote(&entry))) {
                return;
            }
            paths.push(PbxValue::string(entry.as_str()));
            debug!(configuration = uuid, path = %entry, "added framework search path");
            changed += 1;
        });
        changed
    }

    /// Drop `path` and `path/**` from `FRAMEWORK_SEARCH_PATHS` of every
    /// configuration that links the C++ runtime. Returns how many changed.
    pub fn remove_from_framework_search_paths(&mut self, path: &str) -> usize {
        let plain = unquote(path);
        let recursive = recursive_form(plain);
        let is_entry = |value: &PbxValue| value.unquoted().is_some_and(|s| s == plain || s == recursive);

        let mut changed = 0;
        self.each_build_configuration(has_linked_cpp_runtime, |uuid, settings| {
            let scalar_entry = settings.get("FRAMEWORK_SEARCH_PATHS").is_some_and(is_entry);
            let removed = if scalar_entry {
                settings.shift_remove("FRAMEWORK_SEARCH_PATHS");
                true
            } else if let Some(PbxValue::Array(paths)) = settings.get_mut("FRAMEWORK_SEARCH_PATHS") {
                let before = paths.len();
                paths.retain(|p| !is_entry(p));
                before != paths.len()
            } else {
                false
            };
            if removed {
                debug!(configuration = uuid, path, "removed framework search path");
                changed += 1;
            }
        });
        changed
    }
}

/// `path/**`, keeping the suffix inside the quotes of a quoted path.
fn recursive_form(path: &str) -> String {
    let inner = unquote(path);
    if inner.len() == path.len() {
        format!("{}{}", path, RECURSIVE_SUFFIX)
    } else {
        format!("\"{}{}\"", inner, RECURSIVE_SUFFIX)
    }
}

fn configuration_not_found(list_uuid: &str, name: &str) -> Error {
    Error::ConfigurationNotFound {
        list: list_uuid.to_string(),
        name: name.to_string(),
    }
}

/// `FRAMEWORK_SEARCH_PATHS` as a list, seeded with `$(inherited)` when
/// missing and promoted from a single scalar when needed.
fn search_paths_entry(settings: &mut BuildSettings) -> &mut Vec<PbxValue> {
    let slot = settings
        .entry("FRAMEWORK_SEARCH_PATHS".to_string())
        .or_insert_with(|| PbxValue::string_array([INHERITED]));
    into_list(slot)
}

/// Borrow `value` as a list, wrapping a non-list value into a one-element list.
fn into_list(value: &mut PbxValue) -> &mut Vec<PbxValue> {
    match value {
        PbxValue::Array(items) => items,
        other => {
            let single = std::mem::replace(other, PbxValue::Array(Vec::new()));
            let items = into_list(other);
            items.push(single);
            items
        }
    }
}
