mod attributes;
pub mod build_settings;
mod xcode_project;

pub use build_settings::{has_linked_cpp_runtime, ConfigSelector, ConfigurationSelector, TargetSelector};
pub use xcode_project::XcodeProject;
