use std::collections::HashMap;

use indexmap::IndexMap;

use crate::types::{unquote, PbxValue};

type Objects = IndexMap<String, PbxValue>;

fn str_prop<'a>(obj: &'a IndexMap<String, PbxValue>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(|v| v.as_str()).map(unquote)
}

/// Build a map of UUID → annotation written as `UUID /* annotation */`.
pub fn annotations(objects: &Objects) -> HashMap<String, String> {
    // build file uuid → owning phase name
    let mut phase_of_file: HashMap<&str, String> = HashMap::new();
    // configuration list uuid → owner (isa, name)
    let mut owner_of_list: HashMap<&str, (&str, Option<String>)> = HashMap::new();

    for obj in objects.values().filter_map(|v| v.as_object()) {
        let isa = str_prop(obj, "isa").unwrap_or("");
        if isa.ends_with("BuildPhase") {
            let name = build_phase_name(obj, isa);
            for file in obj.get("files").and_then(|f| f.as_array()).into_iter().flatten() {
                if let Some(uuid) = file.as_str() {
                    phase_of_file.insert(uuid, name.clone());
                }
            }
        }
        if let Some(list) = obj.get("buildConfigurationList").and_then(|v| v.as_str()) {
            owner_of_list.insert(list, (isa, owner_name(obj, objects)));
        }
    }

    let mut out = HashMap::with_capacity(objects.len());
    for (uuid, obj) in objects {
        let Some(obj) = obj.as_object() else { continue };
        let isa = str_prop(obj, "isa").unwrap_or("");

        let comment = match isa {
            "PBXProject" => Some("Project object".to_string()),
            "PBXBuildFile" => {
                let file = obj
                    .get("fileRef")
                    .or_else(|| obj.get("productRef"))
                    .and_then(|v| v.as_str())
                    .and_then(|r| objects.get(r))
                    .and_then(|v| v.as_object())
                    .and_then(default_name)
                    .unwrap_or_else(|| "(null)".to_string());
                let phase = phase_of_file
                    .get(uuid.as_str())
                    .cloned()
                    .unwrap_or_else(|| "[missing build phase]".to_string());
                Some(format!("{} in {}", file, phase))
            }
            "XCConfigurationList" => Some(match owner_of_list.get(uuid.as_str()) {
                Some((owner_isa, Some(name))) => format!("Build configuration list for {} \"{}\"", owner_isa, name),
                Some((owner_isa, None)) => format!("Build configuration list for {}", owner_isa),
                None => "Build configuration list for [unknown]".to_string(),
            }),
            _ if isa.ends_with("BuildPhase") => Some(build_phase_name(obj, isa)),
            _ => default_name(obj).or_else(|| (isa != "PBXGroup").then(|| isa.to_string())),
        };

        if let Some(comment) = comment {
            out.insert(uuid.clone(), comment);
        }
    }
    out
}

fn default_name(obj: &IndexMap<String, PbxValue>) -> Option<String> {
    str_prop(obj, "name")
        .or_else(|| str_prop(obj, "productName"))
        .or_else(|| str_prop(obj, "path"))
        .map(str::to_string)
}

/// Name used for the owner of a configuration list. The root project has no
/// name of its own, so its first target stands in.
fn owner_name(obj: &IndexMap<String, PbxValue>, objects: &Objects) -> Option<String> {
    default_name(obj).or_else(|| {
        let first = obj.get("targets")?.as_array()?.first()?.as_str()?;
        let target = objects.get(first)?.as_object()?;
        str_prop(target, "productName")
            .or_else(|| str_prop(target, "name"))
            .map(str::to_string)
    })
}

fn build_phase_name(obj: &IndexMap<String, PbxValue>, isa: &str) -> String {
    str_prop(obj, "name")
        .or_else(|| isa.strip_prefix("PBX").and_then(|s| s.strip_suffix("BuildPhase")))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_annotations() {
        let doc = parse(
            r#"{
                P1 = { isa = PBXProject; buildConfigurationList = L1; targets = (T1); };
                T1 = { isa = PBXNativeTarget; name = "My App"; buildConfigurationList = L2; buildPhases = (S1); };
                L1 = { isa = XCConfigurationList; };
                L2 = { isa = XCConfigurationList; };
                S1 = { isa = PBXSourcesBuildPhase; files = (B1); };
                B1 = { isa = PBXBuildFile; fileRef = F1; };
                F1 = { isa = PBXFileReference; path = main.m; };
                G1 = { isa = PBXGroup; children = (); };
            }"#,
        )
        .unwrap();
        let comments = annotations(doc.as_object().unwrap());

        assert_eq!(comments["P1"], "Project object");
        assert_eq!(comments["T1"], "My App");
        assert_eq!(comments["L1"], "Build configuration list for PBXProject \"My App\"");
        assert_eq!(comments["L2"], "Build configuration list for PBXNativeTarget \"My App\"");
        assert_eq!(comments["S1"], "Sources");
        assert_eq!(comments["B1"], "main.m in Sources");
        assert!(!comments.contains_key("G1"));
    }
}
