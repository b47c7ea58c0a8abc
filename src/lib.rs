#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use egen_codec as codec;
pub use egen_io as io;
pub use egen_utils as utils;
