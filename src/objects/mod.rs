use indexmap::IndexMap;

use crate::types::{object_entry, unquote, PbxValue};

/// One entry of a project's `objects` table, stored as its raw properties.
///
/// References between objects stay UUID strings; lookups go through
/// `XcodeProject`.
#[derive(Debug, Clone, PartialEq)]
pub struct PbxObject {
    pub uuid: String,
    pub isa: String,
    pub props: IndexMap<String, PbxValue>,
}

impl PbxObject {
    /// Create a new PbxObject from raw plist data.
    pub fn from_plist(uuid: String, props: IndexMap<String, PbxValue>) -> Self {
        let isa = props
            .get("isa")
            .and_then(|v| v.unquoted())
            .unwrap_or("Unknown")
            .to_string();
        PbxObject { uuid, isa, props }
    }

    /// Convert back to plist representation.
    pub fn to_plist(&self) -> PbxValue {
        PbxValue::Object(self.props.clone())
    }

    /// Raw token of a string property.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }

    /// String property with surrounding quotes removed.
    pub fn get_unquoted(&self, key: &str) -> Option<&str> {
        self.get_str(key).map(unquote)
    }

    pub fn get_array(&self, key: &str) -> Option<&Vec<PbxValue>> {
        self.props.get(key).and_then(|v| v.as_array())
    }

    pub fn get_object(&self, key: &str) -> Option<&IndexMap<String, PbxValue>> {
        self.props.get(key).and_then(|v| v.as_object())
    }

    pub fn get_object_mut(&mut self, key: &str) -> Option<&mut IndexMap<String, PbxValue>> {
        self.props.get_mut(key).and_then(|v| v.as_object_mut())
    }

    /// Get a dictionary property, inserting an empty one if it is missing.
    /// A non-dictionary value under `key` is replaced.
    pub fn object_entry(&mut self, key: &str) -> &mut IndexMap<String, PbxValue> {
        object_entry(&mut self.props, key)
    }

    /// String array property as raw tokens; non-string items are skipped.
    pub fn get_str_array(&self, key: &str) -> Vec<&str> {
        self.get_array(key)
            .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Set a property.
    pub fn set(&mut self, key: &str, value: PbxValue) {
        self.props.insert(key.to_string(), value);
    }

    /// Remove a property.
    pub fn remove(&mut self, key: &str) -> Option<PbxValue> {
        self.props.shift_remove(key)
    }

    /// The `buildSettings` dictionary of an XCBuildConfiguration.
    pub fn build_settings(&self) -> Option<&IndexMap<String, PbxValue>> {
        self.get_object("buildSettings")
    }

    pub fn build_settings_mut(&mut self) -> Option<&mut IndexMap<String, PbxValue>> {
        self.get_object_mut("buildSettings")
    }

    /// A human-readable name: `name`, then `productName`, then `path`.
    pub fn display_name(&self) -> Option<&str> {
        self.get_unquoted("name")
            .or_else(|| self.get_unquoted("productName"))
            .or_else(|| self.get_unquoted("path"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(isa: &str) -> PbxObject {
        let mut props = IndexMap::new();
        props.insert("isa".to_string(), PbxValue::string(isa));
        PbxObject::from_plist("13B07F961A680F5B00A75B9A".to_string(), props)
    }

    #[test]
    fn test_pbx_object_basics() {
        let mut obj = object("PBXNativeTarget");
        obj.set("name", PbxValue::string("\"My App\""));
        obj.set("buildPhases", PbxValue::string_array(["AAA", "BBB"]));

        assert_eq!(obj.isa, "PBXNativeTarget");
        assert_eq!(obj.get_str("name"), Some("\"My App\""));
        assert_eq!(obj.get_unquoted("name"), Some("My App"));
        assert_eq!(obj.display_name(), Some("My App"));
        assert_eq!(obj.get_str_array("buildPhases"), vec!["AAA", "BBB"]);
        assert!(obj.remove("name").is_some());
        assert_eq!(obj.display_name(), None);
    }

    #[test]
    fn test_object_entry_creates_and_reuses() {
        let mut obj = object("PBXProject");
        obj.object_entry("attributes")
            .insert("LastUpgradeCheck".to_string(), PbxValue::string("1130"));
        assert_eq!(obj.object_entry("attributes").len(), 1);

        obj.set("attributes", PbxValue::string("broken"));
        assert!(obj.object_entry("attributes").is_empty());
    }

    #[test]
    fn test_build_settings() {
        let mut obj = object("XCBuildConfiguration");
        assert!(obj.build_settings().is_none());
        obj.object_entry("buildSettings")
            .insert("PRODUCT_NAME".to_string(), PbxValue::string("App"));
        assert!(obj.build_settings().unwrap().contains_key("PRODUCT_NAME"));
        assert!(obj.build_settings_mut().is_some());
    }
}
