use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::objects::PbxObject;
use crate::parser;
use crate::types::PbxValue;
use crate::writer::serializer;

/// The main container for an Xcode project.
///
/// Stores all objects as a flat map of UUID → PbxObject, plus project metadata.
/// References between objects are UUID strings; lookups go through this map.
/// Top-level scalars keep their raw token like everything else in the model.
#[derive(Debug, Clone)]
pub struct XcodeProject {
    pub archive_version: String,
    pub object_version: String,
    pub classes: IndexMap<String, PbxValue>,
    pub root_object_uuid: String,
    objects: IndexMap<String, PbxObject>,
    file_path: Option<PathBuf>,
}

impl XcodeProject {
    /// Open and parse a .pbxproj file from disk.
    pub fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let file_path = file_path.as_ref();
        debug!(path = %file_path.display(), "opening project");
        let contents = std::fs::read_to_string(file_path)?;
        let mut project = Self::from_pbxproj(&contents)?;
        project.file_path = Some(file_path.to_path_buf());
        Ok(project)
    }

    /// Parse a .pbxproj string into an XcodeProject.
    pub fn from_pbxproj(text: &str) -> Result<Self> {
        let plist = parser::parse(text).map_err(Error::Parse)?;
        Self::from_plist_value(plist)
    }

    /// Create from an already-parsed PbxValue.
    pub fn from_plist_value(plist: PbxValue) -> Result<Self> {
        let PbxValue::Object(mut root) = plist else {
            return Err(Error::InvalidProject("root must be an object".to_string()));
        };

        let archive_version = root
            .get("archiveVersion")
            .and_then(|v| v.as_str())
            .unwrap_or("1")
            .to_string();
        let object_version = root
            .get("objectVersion")
            .and_then(|v| v.as_str())
            .unwrap_or("46")
            .to_string();
        let classes = match root.shift_remove("classes") {
            Some(PbxValue::Object(classes)) => classes,
            _ => IndexMap::new(),
        };
        let root_object_uuid = root
            .get("rootObject")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidProject("rootObject is required".to_string()))?
            .to_string();
        let Some(PbxValue::Object(objects_map)) = root.shift_remove("objects") else {
            return Err(Error::InvalidProject("objects is required".to_string()));
        };

        let mut objects = IndexMap::with_capacity(objects_map.len());
        for (uuid, value) in objects_map {
            if let PbxValue::Object(props) = value {
                objects.insert(uuid.clone(), PbxObject::from_plist(uuid, props));
            }
        }

        match objects.get(&root_object_uuid) {
            Some(root_obj) if root_obj.isa == "PBXProject" => {}
            Some(root_obj) => {
                return Err(Error::InvalidProject(format!(
                    "root object \"{}\" is not a PBXProject (isa: {})",
                    root_object_uuid, root_obj.isa
                )))
            }
            None => {
                return Err(Error::InvalidProject(format!(
                    "root object \"{}\" not found in objects",
                    root_object_uuid
                )))
            }
        }

        Ok(XcodeProject {
            archive_version,
            object_version,
            classes,
            root_object_uuid,
            objects,
            file_path: None,
        })
    }

    /// Convert the project to a PbxValue for serialization.
    pub fn to_plist(&self) -> PbxValue {
        let mut root = IndexMap::new();
        root.insert("archiveVersion".to_string(), PbxValue::string(self.archive_version.as_str()));
        root.insert("classes".to_string(), PbxValue::Object(self.classes.clone()));
        root.insert("objectVersion".to_string(), PbxValue::string(self.object_version.as_str()));

        let objects = self
            .objects
            .iter()
            .map(|(uuid, obj)| (uuid.clone(), obj.to_plist()))
            .collect();
        root.insert("objects".to_string(), PbxValue::Object(objects));
        root.insert("rootObject".to_string(), PbxValue::string(self.root_object_uuid.as_str()));

        PbxValue::Object(root)
    }

    /// Serialize to .pbxproj format.
    pub fn to_pbxproj(&self) -> String {
        serializer::build(&self.to_plist())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.to_plist())?)
    }

    /// Write the project to the file it was opened from.
    pub fn save(&self) -> Result<()> {
        let path = self.file_path.as_ref().ok_or(Error::NoFilePath)?;
        debug!(path = %path.display(), "saving project");
        std::fs::write(path, self.to_pbxproj())?;
        Ok(())
    }

    /// Get the file path this project was loaded from.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    // ── Object access ──────────────────────────────────────────────────

    pub fn get_object(&self, uuid: &str) -> Option<&PbxObject> {
        self.objects.get(uuid)
    }

    pub fn get_object_mut(&mut self, uuid: &str) -> Option<&mut PbxObject> {
        self.objects.get_mut(uuid)
    }

    /// Add or replace an object in the table.
    pub fn insert_object(&mut self, object: PbxObject) -> Option<PbxObject> {
        self.objects.insert(object.uuid.clone(), object)
    }

    /// Get the root PBXProject object.
    pub fn root_object(&self) -> Option<&PbxObject> {
        self.objects.get(&self.root_object_uuid)
    }

    pub fn root_object_mut(&mut self) -> Option<&mut PbxObject> {
        self.objects.get_mut(&self.root_object_uuid)
    }

    /// Iterate over all objects in table order.
    pub fn objects(&self) -> impl Iterator<Item = (&String, &PbxObject)> {
        self.objects.iter()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = (&String, &mut PbxObject)> {
        self.objects.iter_mut()
    }

    /// Get all objects with a specific ISA type.
    pub fn objects_by_isa(&self, isa: &str) -> Vec<&PbxObject> {
        self.objects.values().filter(|obj| obj.isa == isa).collect()
    }

    // ── Targets ────────────────────────────────────────────────────────

    /// Target UUIDs in the order the root project lists them.
    pub fn target_uuids(&self) -> Vec<String> {
        self.root_object()
            .map(|root| root.get_str_array("targets").into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// UUID of the first target listed by the root project.
    pub fn first_target_uuid(&self) -> Result<String> {
        self.target_uuids().into_iter().next().ok_or(Error::NoTargets)
    }

    /// Look up a target by UUID.
    pub fn get_target(&self, uuid: &str) -> Result<&PbxObject> {
        self.objects
            .get(uuid)
            .filter(|obj| obj.isa.ends_with("Target"))
            .ok_or_else(|| Error::TargetNotFound(uuid.to_string()))
    }

    /// Find a target by its `name`.
    pub fn find_target_by_name(&self, name: &str) -> Option<&PbxObject> {
        self.target_uuids()
            .iter()
            .filter_map(|uuid| self.objects.get(uuid))
            .find(|target| target.get_unquoted("name") == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

    fn fixture() -> XcodeProject {
        XcodeProject::open(Path::new(FIXTURES_DIR).join("project.pbxproj")).unwrap()
    }

    #[test]
    fn test_open_project() {
        let project = fixture();
        assert_eq!(project.archive_version, "1");
        assert_eq!(project.object_version, "46");
        assert_eq!(project.root_object_uuid, "83CBB9F71A601CBA00E9B192");
        assert!(project.root_object().is_some());
        assert!(project.file_path().unwrap().ends_with("project.pbxproj"));
    }

    #[test]
    fn test_targets_in_model_order() {
        let project = fixture();
        assert_eq!(
            project.target_uuids(),
            vec![
                "13B07F861A680F5B00A75B9A",
                "00E356ED1AD99517003FC87E",
                "2D02E47A1E0B4A5D006451C7",
            ]
        );
        assert_eq!(project.first_target_uuid().unwrap(), "13B07F861A680F5B00A75B9A");
        assert_eq!(
            project.find_target_by_name("HelloWorld-tvOS").map(|t| t.uuid.as_str()),
            Some("2D02E47A1E0B4A5D006451C7")
        );
        assert!(matches!(
            project.get_target("83CBBA001A601CBA00E9B192"),
            Err(Error::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_objects_by_isa() {
        let project = fixture();
        assert_eq!(project.objects_by_isa("PBXNativeTarget").len(), 3);
        assert_eq!(project.objects_by_isa("XCBuildConfiguration").len(), 8);
    }

    #[test]
    fn test_roundtrip_via_xcode_project() {
        let original = fs::read_to_string(Path::new(FIXTURES_DIR).join("project.pbxproj")).unwrap();
        let project = XcodeProject::from_pbxproj(&original).unwrap();
        let reparsed = XcodeProject::from_pbxproj(&project.to_pbxproj()).unwrap();
        pretty_assertions::assert_eq!(project.to_plist(), reparsed.to_plist());
    }

    #[test]
    fn test_to_json() {
        let json = fixture().to_json().unwrap();
        assert_eq!(json["rootObject"], "83CBB9F71A601CBA00E9B192");
        assert_eq!(
            json["objects"]["13B07F941A680F5B00A75B9A"]["buildSettings"]["OTHER_LDFLAGS"][2],
            "\"-lc++\""
        );
    }

    #[test]
    fn test_invalid_projects() {
        assert!(matches!(XcodeProject::from_pbxproj("{ a = "), Err(Error::Parse(_))));
        assert!(matches!(
            XcodeProject::from_pbxproj("{ objects = {}; }"),
            Err(Error::InvalidProject(_))
        ));
        assert!(matches!(
            XcodeProject::from_pbxproj("{ objects = { A = { isa = PBXGroup; }; }; rootObject = A; }"),
            Err(Error::InvalidProject(_))
        ));
        assert!(matches!(
            XcodeProject::from_pbxproj("{ objects = {}; rootObject = A; }"),
            Err(Error::InvalidProject(_))
        ));
    }

    #[test]
    fn test_save_without_path() {
        let project = XcodeProject::from_pbxproj(&fixture().to_pbxproj()).unwrap();
        assert!(matches!(project.save(), Err(Error::NoFilePath)));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.pbxproj");
        fs::write(&path, fixture().to_pbxproj()).unwrap();

        let mut project = XcodeProject::open(&path).unwrap();
        project
            .get_object_mut("13B07F951A680F5B00A75B9A")
            .unwrap()
            .object_entry("buildSettings")
            .insert("PRODUCT_NAME".to_string(), PbxValue::string("Renamed"));
        project.save().unwrap();

        let reopened = XcodeProject::open(&path).unwrap();
        let settings = reopened.get_object("13B07F951A680F5B00A75B9A").unwrap().build_settings().unwrap();
        assert_eq!(settings["PRODUCT_NAME"], PbxValue::string("Renamed"));
    }
}
