#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod config;
mod error;

pub mod emit;
pub mod field;
pub mod registry;
pub mod runtime;
pub mod strategy;
pub mod types;
pub mod value;

// -----------------------------------------------------------------------------
// Top-level exports

pub use config::{AnnotationTypeDecl, CodecConfig, Manifest};
pub use error::{CodecError, ConfigError};
