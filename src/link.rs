//! Convention-based helpers used when linking a native module into an app.
//!
//! Every function here reads the project's first target and the default
//! configuration of that target's configuration list. When several
//! configurations carry the default name, the last one in list order is
//! used. Callers that need a
//! different target or configuration should use [`ConfigSelector`] with the
//! methods on [`XcodeProject`] and the functions in [`crate::info_plist`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use plist::Dictionary;

use crate::error::Result;
use crate::info_plist;
use crate::project::build_settings::BuildSettings;
use crate::project::{ConfigSelector, XcodeProject};
use crate::types::PbxValue;

pub use crate::project::has_linked_cpp_runtime;

/// Build setting `name` of the first target's default configuration.
pub fn get_build_property(project: &XcodeProject, name: &str) -> Result<Option<PbxValue>> {
    Ok(project.build_property(&ConfigSelector::convention(), name)?.cloned())
}

/// Absolute location of the app's Info.plist, if `INFOPLIST_FILE` is set.
pub fn get_plist_path(source_dir: impl AsRef<Path>, project: &XcodeProject) -> Result<Option<PathBuf>> {
    info_plist::plist_path(source_dir.as_ref(), project, &ConfigSelector::convention())
}

/// The app's Info.plist, or `None` if it is not configured or missing.
pub fn read_plist(source_dir: impl AsRef<Path>, project: &XcodeProject) -> Result<Option<Dictionary>> {
    info_plist::read_info_plist(source_dir.as_ref(), project, &ConfigSelector::convention())
}

/// Overwrite the app's Info.plist.
pub fn write_plist(source_dir: impl AsRef<Path>, project: &XcodeProject, plist: &Dictionary) -> Result<()> {
    info_plist::write_info_plist(source_dir.as_ref(), project, &ConfigSelector::convention(), plist)
}

/// Run `callback` on every build configuration whose settings pass `predicate`.
pub fn each_build_configuration<P, F>(project: &mut XcodeProject, predicate: P, callback: F)
where
    P: FnMut(&BuildSettings) -> bool,
    F: FnMut(&str, &mut BuildSettings),
{
    project.each_build_configuration(predicate, callback)
}

/// Add `path` to the search paths of every C++ linking configuration.
pub fn add_to_framework_search_paths(project: &mut XcodeProject, path: &str, recursive: bool) -> usize {
    project.add_to_framework_search_paths(path, recursive)
}

/// Remove `path` and `path/**` from every C++ linking configuration.
pub fn remove_from_framework_search_paths(project: &mut XcodeProject, path: &str) -> usize {
    project.remove_from_framework_search_paths(path)
}

/// Attribute dictionary of `target` (the first target when `None`),
/// created on demand. Edits through the returned borrow land in the project.
pub fn get_target_attributes<'p>(
    project: &'p mut XcodeProject,
    target: Option<&str>,
) -> Result<&'p mut IndexMap<String, PbxValue>> {
    let target_uuid = match target {
        Some(uuid) => uuid.to_string(),
        None => project.first_target_uuid()?,
    };
    project.target_attributes_mut(&target_uuid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn project() -> XcodeProject {
        XcodeProject::from_pbxproj(include_str!("../tests/fixtures/project.pbxproj")).unwrap()
    }

    #[test]
    fn test_get_build_property_reads_default_configuration() {
        let project = project();
        assert_eq!(
            get_build_property(&project, "PRODUCT_NAME").unwrap(),
            Some(PbxValue::string("HelloWorld"))
        );
        // Only the Debug configuration sets it.
        assert_eq!(get_build_property(&project, "ENABLE_TESTABILITY").unwrap(), None);
    }

    #[test]
    fn test_get_build_property_last_duplicate_wins() {
        let mut project = project();
        for (uuid, value) in [("13B07F941A680F5B00A75B9A", "from_first"), ("13B07F951A680F5B00A75B9A", "from_last")] {
            let config = project.get_object_mut(uuid).unwrap();
            config.set("name", PbxValue::string("Release"));
            config
                .build_settings_mut()
                .unwrap()
                .insert("SHARED_KEY".to_string(), PbxValue::string(value));
        }
        assert_eq!(
            get_build_property(&project, "SHARED_KEY").unwrap(),
            Some(PbxValue::string("from_last"))
        );
    }

    #[test]
    fn test_get_build_property_without_targets() {
        let mut project = project();
        project.root_object_mut().unwrap().set("targets", PbxValue::Array(Vec::new()));
        assert!(matches!(get_build_property(&project, "PRODUCT_NAME"), Err(Error::NoTargets)));
    }

    #[test]
    fn test_get_plist_path() {
        let path = get_plist_path("/proj", &project()).unwrap();
        assert_eq!(path, Some(PathBuf::from("/proj/HelloWorld/Info.plist")));
    }

    #[test]
    fn test_get_target_attributes_defaults_to_first_target() {
        let mut project = project();
        get_target_attributes(&mut project, None)
            .unwrap()
            .insert("SystemCapabilities".to_string(), PbxValue::Object(IndexMap::new()));
        assert!(project
            .target_attributes("13B07F861A680F5B00A75B9A")
            .unwrap()
            .contains_key("SystemCapabilities"));
    }
}
