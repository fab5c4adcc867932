use indexmap::IndexMap;
use serde::Serialize;

/// Core in-memory representation for parsed .pbxproj data.
///
/// Scalars are kept as the exact token found in the source. A quoted value
/// keeps its quotes and escape sequences (`"-lc++"`, `"$(SRCROOT)/App/Info.plist"`),
/// an unquoted one is stored bare (`Debug`, `46`). Writing a parsed project back
/// therefore reproduces every scalar byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub enum PbxValue {
    /// A scalar token, quotes included when the source had them.
    String(String),
    /// Binary data represented as `<hex bytes>` in the source.
    Data(Vec<u8>),
    /// An ordered key-value map (`{ key = value; ... }`).
    Object(IndexMap<String, PbxValue>),
    /// An ordered list of values (`( item1, item2, ... )`).
    Array(Vec<PbxValue>),
}

impl PbxValue {
    /// Build a scalar from anything string-like.
    pub fn string(s: impl Into<String>) -> Self {
        PbxValue::String(s.into())
    }

    /// Build an array of scalars.
    pub fn string_array<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PbxValue::Array(items.into_iter().map(|s| PbxValue::String(s.into())).collect())
    }

    /// Returns the raw token if this is a String variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PbxValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the token with one pair of surrounding double quotes removed.
    pub fn unquoted(&self) -> Option<&str> {
        self.as_str().map(unquote)
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, PbxValue>> {
        match self {
            PbxValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, PbxValue>> {
        match self {
            PbxValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<PbxValue>> {
        match self {
            PbxValue::Array(vec) => Some(vec),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<PbxValue>> {
        match self {
            PbxValue::Array(vec) => Some(vec),
            _ => None,
        }
    }

    /// Get a value from an Object by key.
    pub fn get(&self, key: &str) -> Option<&PbxValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Returns true if this is an Array holding a scalar equal to `token`.
    pub fn contains_str(&self, token: &str) -> bool {
        self.as_array()
            .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(token)))
    }
}

impl From<&str> for PbxValue {
    fn from(s: &str) -> Self {
        PbxValue::String(s.to_string())
    }
}

impl From<String> for PbxValue {
    fn from(s: String) -> Self {
        PbxValue::String(s)
    }
}

/// Strip one pair of surrounding double quotes, if present.
pub fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(token)
}

/// Get the dictionary stored under `key`, inserting an empty one if it is
/// missing. A non-dictionary value under `key` is replaced.
pub fn object_entry<'m>(map: &'m mut IndexMap<String, PbxValue>, key: &str) -> &'m mut IndexMap<String, PbxValue> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| PbxValue::Object(IndexMap::new()));
    into_object(slot)
}

fn into_object(value: &mut PbxValue) -> &mut IndexMap<String, PbxValue> {
    match value {
        PbxValue::Object(inner) => inner,
        other => {
            *other = PbxValue::Object(IndexMap::new());
            into_object(other)
        }
    }
}

/// JSON view of a project tree. Scalars serialize as their raw token and
/// data literals as byte arrays.
impl Serialize for PbxValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PbxValue::String(s) => serializer.serialize_str(s),
            PbxValue::Data(bytes) => bytes.serialize(serializer),
            PbxValue::Object(map) => {
                use serde::ser::SerializeMap;
                let mut ser_map = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    ser_map.serialize_entry(k, v)?;
                }
                ser_map.end()
            }
            PbxValue::Array(vec) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(vec.len()))?;
                for item in vec {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"-lc++\""), "-lc++");
        assert_eq!(unquote("Debug"), "Debug");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("\"\""), "");
    }

    #[test]
    fn test_contains_str_matches_raw_token() {
        let flags = PbxValue::string_array(["\"$(inherited)\"", "\"-lc++\""]);
        assert!(flags.contains_str("\"-lc++\""));
        assert!(!flags.contains_str("-lc++"));
        assert!(!PbxValue::string("\"-lc++\"").contains_str("\"-lc++\""));
    }

    #[test]
    fn test_object_access() {
        let mut map = IndexMap::new();
        map.insert("name".to_string(), PbxValue::string("\"My App\""));
        let val = PbxValue::Object(map);
        assert_eq!(val.get("name").and_then(|v| v.as_str()), Some("\"My App\""));
        assert_eq!(val.get("name").and_then(|v| v.unquoted()), Some("My App"));
        assert!(val.get("missing").is_none());
    }

    #[test]
    fn test_object_entry_replaces_scalar() {
        let mut map = IndexMap::new();
        map.insert("first".to_string(), PbxValue::string("1"));
        map.insert("attributes".to_string(), PbxValue::string("oops"));

        object_entry(&mut map, "attributes").insert("k".to_string(), PbxValue::string("v"));
        object_entry(&mut map, "added").insert("k".to_string(), PbxValue::string("w"));

        assert_eq!(map.get_index_of("attributes"), Some(1));
        assert_eq!(map["attributes"].get("k"), Some(&PbxValue::string("v")));
        assert_eq!(map["added"].get("k"), Some(&PbxValue::string("w")));
        assert_eq!(object_entry(&mut map, "attributes").len(), 1);
    }

    #[test]
    fn test_serialize_to_json() {
        let mut map = IndexMap::new();
        map.insert("isa".to_string(), PbxValue::string("PBXGroup"));
        map.insert("children".to_string(), PbxValue::string_array(["A", "B"]));
        map.insert("data".to_string(), PbxValue::Data(vec![1, 2]));
        let json = serde_json::to_value(PbxValue::Object(map)).unwrap();
        assert_eq!(json, serde_json::json!({ "isa": "PBXGroup", "children": ["A", "B"], "data": [1, 2] }));
    }
}
