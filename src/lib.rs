//! Streaming base64 packing of typed binary arrays into text documents.
//!
//! A [`Base64Writer`] takes native records described by a compact type
//! descriptor (`"3f2i"`), packs them into a canonical little-endian layout
//! and streams the result as base64 text into a [`DocumentSink`], either as
//! one quoted inline string or as indented 64-character lines.

/// Use mimalloc as the global allocator, same as the rest of the toolset.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod base64;
pub mod common;
pub mod descriptor;
pub mod emitter;
pub mod error;
pub mod packer;
pub mod sink;
pub mod writer;

pub use crate::descriptor::{Layout, Primitive};
pub use crate::emitter::Base64Emitter;
pub use crate::error::{PackError, Result};
pub use crate::packer::{BinaryConvertor, RawDataPacker};
pub use crate::sink::{DocumentSink, Framing, StreamSink, TextSink};
pub use crate::writer::{Base64Writer, HEADER_SIZE, make_header};
