//! External metadata consulted during resolution and execution.

// -----------------------------------------------------------------------------
// Modules

mod ordinal;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use ordinal::{CodeTable, OrdinalLookup};
pub use type_registry::{
    BUILTIN_COLLECTIONS, BUILTIN_MAPS, BUILTIN_SUPERTYPES, Conversion, Supertype, TypeRegistry,
};
