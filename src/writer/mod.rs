pub mod comments;
pub mod quotes;
pub mod serializer;

pub use serializer::{build, build_with_options, WriterOptions};
