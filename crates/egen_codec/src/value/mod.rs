//! Runtime values the generated operations act on.

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod object_codec;
mod value;

// -----------------------------------------------------------------------------
// Exports

pub use dynamic::{DynamicCollection, DynamicMap, DynamicObject};
pub use object_codec::{MAX_DEPTH, read_object, tag, write_object};
pub use value::Value;
