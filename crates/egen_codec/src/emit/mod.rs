//! The codec engine: paired write and read operations per field.
//!
//! The operations are a small IR over the byte-stream primitives of
//! [`egen_io`], field access, conditionals and bounded loops. A code
//! generation backend renders them into a class's write-state and
//! read-state procedures; [`runtime`](crate::runtime) executes them
//! directly.

// -----------------------------------------------------------------------------
// Modules

mod emitter;
mod ops;
mod scope;

// -----------------------------------------------------------------------------
// Exports

pub use emitter::{INLINE_PRESENT, NULL_SENTINEL, compile_field, emit};
pub use ops::{FieldOps, Operand, Place, PrimitiveCodec, ReadExpr, ReadOp, Symbol, WriteOp};
pub use scope::NameScope;
