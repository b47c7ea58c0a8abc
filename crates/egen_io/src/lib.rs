#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod input;
mod output;

pub mod compact;

// -----------------------------------------------------------------------------
// Top-level exports

pub use error::IoError;
pub use input::DataInput;
pub use output::DataOutput;
