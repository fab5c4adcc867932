use indexmap::IndexMap;
use tracing::debug;

use super::xcode_project::XcodeProject;
use crate::error::{Error, Result};
use crate::types::{object_entry, PbxValue};

impl XcodeProject {
    /// `attributes.TargetAttributes.<uuid>` of the root project, if present.
    pub fn target_attributes(&self, target_uuid: &str) -> Option<&IndexMap<String, PbxValue>> {
        self.root_object()?
            .get_object("attributes")?
            .get("TargetAttributes")?
            .get(target_uuid)?
            .as_object()
    }

    /// Mutable attribute dictionary of a target, creating `attributes`,
    /// `TargetAttributes` and the target's entry as needed.
    pub fn target_attributes_mut(&mut self, target_uuid: &str) -> Result<&mut IndexMap<String, PbxValue>> {
        self.get_target(target_uuid)?;
        let root_uuid = self.root_object_uuid.clone();
        let root = self
            .root_object_mut()
            .ok_or_else(|| Error::InvalidProject(format!("root object \"{}\" not found in objects", root_uuid)))?;

        let attributes = root.object_entry("attributes");
        let per_target = object_entry(attributes, "TargetAttributes");
        Ok(object_entry(per_target, target_uuid))
    }

    /// Insert or replace one attribute of a target.
    pub fn set_target_attribute(&mut self, target_uuid: &str, key: &str, value: PbxValue) -> Result<()> {
        debug!(target = target_uuid, key, "setting target attribute");
        self.target_attributes_mut(target_uuid)?
            .insert(key.to_string(), value);
        Ok(())
    }
}
