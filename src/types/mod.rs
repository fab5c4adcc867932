pub mod value;

pub use value::{object_entry, unquote, PbxValue};
