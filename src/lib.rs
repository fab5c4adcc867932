//! Read and edit Xcode `.pbxproj` files and the Info.plist they point at.
//!
//! ```no_run
//! use xcode_link::{link, XcodeProject};
//!
//! # fn main() -> xcode_link::Result<()> {
//! let mut project = XcodeProject::open("ios/HelloWorld.xcodeproj/project.pbxproj")?;
//! link::add_to_framework_search_paths(&mut project, "\"$(SRCROOT)/../node_modules/lib/ios\"", false);
//! project.save()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod info_plist;
pub mod link;
pub mod objects;
pub mod parser;
pub mod project;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
pub use objects::PbxObject;
pub use project::{ConfigSelector, ConfigurationSelector, TargetSelector, XcodeProject};
pub use types::PbxValue;
