use std::io::{Cursor, ErrorKind};
use std::path::{Component, Path, PathBuf};

use plist::Dictionary;
use tracing::debug;

use crate::error::{Error, Result};
use crate::project::{ConfigSelector, XcodeProject};

/// Build variable `INFOPLIST_FILE` values are usually relative to.
const SRCROOT: &str = "$(SRCROOT)";

/// Parse an Info.plist document. XML and binary encodings are both accepted;
/// the root must be a dictionary.
pub fn parse_plist(content: impl AsRef<[u8]>) -> Result<Dictionary> {
    let value = plist::Value::from_reader(Cursor::new(content.as_ref()))?;
    value
        .into_dictionary()
        .ok_or_else(|| Error::InvalidPlist("root is not a dictionary".to_string()))
}

/// Serialize a dictionary to an XML plist string.
pub fn build_plist(dict: &Dictionary) -> Result<String> {
    let mut buf = Vec::new();
    plist::to_writer_xml(&mut buf, dict)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidPlist(format!("output is not valid UTF-8: {}", e)))
}

/// Join `relative` onto `base`, resolving `.` and `..` in `relative`
/// lexically. `base` is kept as given. Leading separators on `relative` do
/// not reset the path to the root.
fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    let relative = Path::new(relative.trim_start_matches(['/', '\\']));
    let mut joined = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match joined.components().next_back() {
                Some(Component::Normal(_)) => {
                    joined.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => joined.push(".."),
            },
            other => joined.push(other),
        }
    }
    joined
}

/// Location of the Info.plist named by `INFOPLIST_FILE` in the selected
/// configuration, resolved against `source_dir`.
pub fn plist_path(source_dir: &Path, project: &XcodeProject, selector: &ConfigSelector) -> Result<Option<PathBuf>> {
    let Some(raw) = project
        .build_property(selector, "INFOPLIST_FILE")?
        .and_then(|value| value.as_str())
    else {
        return Ok(None);
    };

    let relative = raw.replace('"', "").replacen(SRCROOT, "", 1);
    Ok(Some(join_normalized(source_dir, &relative)))
}

/// Read the selected configuration's Info.plist. `Ok(None)` when no path
/// is configured or the file does not exist.
pub fn read_info_plist(
    source_dir: &Path,
    project: &XcodeProject,
    selector: &ConfigSelector,
) -> Result<Option<Dictionary>> {
    let Some(path) = plist_path(source_dir, project, selector)? else {
        return Ok(None);
    };

    let content = match std::fs::read(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Info.plist does not exist");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), "read Info.plist");
    parse_plist(content).map(Some)
}

/// Overwrite the selected configuration's Info.plist with `dict` as XML.
pub fn write_info_plist(
    source_dir: &Path,
    project: &XcodeProject,
    selector: &ConfigSelector,
    dict: &Dictionary,
) -> Result<()> {
    let path = plist_path(source_dir, project, selector)?.ok_or(Error::MissingInfoPlistPath)?;
    let xml = build_plist(dict)?;
    std::fs::write(&path, xml)?;
    debug!(path = %path.display(), keys = dict.len(), "wrote Info.plist");
    Ok(())
}
