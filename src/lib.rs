#![forbid(unsafe_code)]
//! # GIF metadata editing library
//!
//! Decodes a GIF file into a [`Container`], edits its metadata, and writes it
//! back. The editable fields are the interlace flag and the transparent color
//! index. The color table and a summary can be queried too.
//!
//! The LZW-compressed pixel data is never decompressed. It is carried through
//! as raw sub-blocks, so a file that is decoded and encoded without edits comes
//! out byte for byte identical.
//!
//! ## no_std support
//!
//! The library supports `no_std` environments with an allocator. Disable the
//! default features (which also drops the command line tool):
//!
//! ```toml
//! [dependencies]
//! webgif = { version = "0.1", default-features = false }
//! ```
//!
//! ## Editing a file
//!
#![cfg_attr(feature = "std", doc = "```rust")]
#![cfg_attr(not(feature = "std"), doc = "```rust,ignore")]
//! // A 1x1 image with a black and white palette.
//! let bytes: &[u8] = &[
//!     b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0x80, 0, 0,
//!     0xFF, 0xFF, 0xFF, 0, 0, 0,
//!     0x21, 0xF9, 4, 1, 0, 0, 0, 0,
//!     0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0, 2, 2, 0x44, 1, 0, 0x3B,
//! ];
//! let mut gif = webgif::decode(bytes).unwrap();
//! assert_eq!(gif.describe().transparent_index, Some(0));
//! assert_eq!(webgif::encode(&gif).unwrap(), bytes);
//!
//! gif.set_interlace(true);
//! gif.set_transparent(None);
//! let edited = webgif::decode(&webgif::encode(&gif).unwrap()).unwrap();
//! let summary = edited.describe();
//! assert!(summary.interlaced);
//! assert_eq!(summary.transparent_index, None);
//! assert_eq!(summary.color_count, 2);
//! ```
#![deny(missing_docs)]
#![allow(unknown_lints)] // Certain lints only apply to later versions of Rust
#![allow(clippy::manual_range_contains)]
#![allow(clippy::new_without_default)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::std_instead_of_alloc)]
#![deny(clippy::std_instead_of_core)]
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod common;
mod edit;
mod encoder;
/// I/O traits and types for no_std support.
pub mod io;
mod reader;
mod traits;

pub use crate::common::{
    AnyExtension, Block, ColorTable, Container, Extension, GraphicControl, ImageBlock,
    RawExtension, Section, SubBlocks, Version,
};

pub use crate::edit::{Description, PaletteEntry};

pub use crate::reader::{decode, DecodeOptions, DecodingError, DecodingFormatError};

pub use crate::encoder::{encode, Encoder, EncodingError, EncodingFormatError};
