use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as FmtWrite;

use indexmap::IndexMap;

use super::comments::annotations;
use super::quotes::{format_data, format_scalar};
use crate::types::{unquote, PbxValue};

/// Options for the writer.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub tab: String,
    pub shebang: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            tab: "\t".to_string(),
            shebang: "!$*UTF8*$!".to_string(),
        }
    }
}

/// Serializes a PbxValue (representing a parsed .pbxproj) back to text format.
pub struct Writer {
    buf: String,
    indent: usize,
    comments: HashMap<String, String>,
    options: WriterOptions,
}

impl Writer {
    pub fn new(project: &PbxValue) -> Self {
        Self::with_options(project, WriterOptions::default())
    }

    pub fn with_options(project: &PbxValue, options: WriterOptions) -> Self {
        let comments = project
            .get("objects")
            .and_then(|o| o.as_object())
            .map(annotations)
            .unwrap_or_default();

        let mut writer = Writer {
            buf: String::new(),
            indent: 0,
            comments,
            options,
        };
        let _ = writeln!(writer.buf, "// {}", writer.options.shebang);
        writer.write_root(project);
        writer
    }

    pub fn get_results(self) -> String {
        self.buf
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str(&self.options.tab);
        }
    }

    /// A scalar, annotated when it names a known object.
    fn scalar(&self, token: &str) -> String {
        match self.comments.get(token) {
            Some(comment) if !comment.is_empty() => format!("{} /* {} */", token, comment),
            _ => format_scalar(token),
        }
    }

    fn write_root(&mut self, project: &PbxValue) {
        match project {
            PbxValue::Object(root) => {
                self.buf.push_str("{\n");
                self.indent += 1;
                for (key, value) in root {
                    if key == "objects" {
                        if let PbxValue::Object(objects) = value {
                            self.write_objects_table(objects);
                            continue;
                        }
                    }
                    self.write_entry(key, value);
                }
                self.indent -= 1;
                self.buf.push_str("}\n");
            }
            other => {
                self.write_value(other);
                self.buf.push('\n');
            }
        }
    }

    fn write_objects_table(&mut self, objects: &IndexMap<String, PbxValue>) {
        let mut by_isa: BTreeMap<&str, Vec<(&String, &PbxValue)>> = BTreeMap::new();
        for (uuid, obj) in objects {
            let isa = isa_of(obj).unwrap_or("Unknown");
            by_isa.entry(isa).or_default().push((uuid, obj));
        }

        self.write_indent();
        self.buf.push_str("objects = {\n");
        self.indent += 1;
        for (isa, mut entries) in by_isa {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            let _ = write!(self.buf, "\n/* Begin {} section */\n", isa);
            for (uuid, obj) in entries {
                if isa == "PBXBuildFile" || isa == "PBXFileReference" {
                    self.write_indent();
                    let key = self.scalar(uuid);
                    self.buf.push_str(&key);
                    self.buf.push_str(" = ");
                    self.write_inline(obj);
                    self.buf.push_str(";\n");
                } else {
                    self.write_entry(uuid, obj);
                }
            }
            let _ = writeln!(self.buf, "/* End {} section */", isa);
        }
        self.indent -= 1;
        self.write_indent();
        self.buf.push_str("};\n");
    }

    fn write_entry(&mut self, key: &str, value: &PbxValue) {
        self.write_indent();
        let key = self.scalar(key);
        self.buf.push_str(&key);
        self.buf.push_str(" = ");
        self.write_value(value);
        self.buf.push_str(";\n");
    }

    fn write_value(&mut self, value: &PbxValue) {
        match value {
            PbxValue::String(s) => {
                let s = self.scalar(s);
                self.buf.push_str(&s);
            }
            PbxValue::Data(data) => self.buf.push_str(&format_data(data)),
            PbxValue::Object(map) if map.is_empty() => self.buf.push_str("{}"),
            PbxValue::Object(map) => {
                self.buf.push_str("{\n");
                self.indent += 1;
                for (k, v) in map {
                    self.write_entry(k, v);
                }
                self.indent -= 1;
                self.write_indent();
                self.buf.push('}');
            }
            PbxValue::Array(items) => {
                self.buf.push_str("(\n");
                self.indent += 1;
                for item in items {
                    self.write_indent();
                    self.write_value(item);
                    self.buf.push_str(",\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.buf.push(')');
            }
        }
    }

    /// Single-line form used for PBXBuildFile and PBXFileReference.
    fn write_inline(&mut self, value: &PbxValue) {
        match value {
            PbxValue::String(s) => {
                let s = self.scalar(s);
                self.buf.push_str(&s);
            }
            PbxValue::Data(data) => self.buf.push_str(&format_data(data)),
            PbxValue::Object(map) => {
                self.buf.push('{');
                for (k, v) in map {
                    let k = self.scalar(k);
                    self.buf.push_str(&k);
                    self.buf.push_str(" = ");
                    self.write_inline(v);
                    self.buf.push_str("; ");
                }
                self.buf.push('}');
            }
            PbxValue::Array(items) => {
                self.buf.push('(');
                for item in items {
                    self.write_inline(item);
                    self.buf.push_str(", ");
                }
                self.buf.push(')');
            }
        }
    }
}

/// Build a .pbxproj string from a PbxValue.
pub fn build(project: &PbxValue) -> String {
    Writer::new(project).get_results()
}

/// Build with custom indentation or header.
pub fn build_with_options(project: &PbxValue, options: WriterOptions) -> String {
    Writer::with_options(project, options).get_results()
}

/// Name of the ISA an object table entry belongs to, unquoted.
pub(crate) fn isa_of(value: &PbxValue) -> Option<&str> {
    value.get("isa").and_then(|v| v.as_str()).map(unquote)
}
