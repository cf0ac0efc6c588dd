//! # typed-cbor
//!
//! Strict, type-directed CBOR encoding and decoding over the deterministic
//! subset of **RFC 8949**, with buffer-backed and stream-backed endpoints.
//!
//! ## Design principles
//!
//! - **The shape drives the codec.**
//!   Values are encoded and decoded by their compile-time shape through the
//!   [`Encode`] / [`Decode`] traits; there is no dynamic value tree and the
//!   hot path carries no runtime reflection.
//! - **One codec, two substrates.**
//!   The same encoder writes into a fixed buffer, a growable vector, or an
//!   arbitrary writer; the same decoder reads from a borrowed slice or a
//!   buffered reader. Slice decoding is zero-copy for strings and byte
//!   spans.
//! - **Limits are explicit.**
//!   String lengths, collection sizes, and nesting depth are bounded by a
//!   [`Config`] consumed at instance construction; violations fail
//!   deterministically.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: stream substrates over `std::io` and
//!   `std::error::Error` for [`Error`].
//! - `alloc` *(default)*: owned decoding targets (`Vec`, `String`) and the
//!   growable output sink.
//! - `derive` *(default)*: `#[derive(Encode, Decode)]` for named-field
//!   structs, encoded as maps with text keys.
//! - `simdutf8` *(default)*: accelerated UTF-8 validation.
//!
//! ## Wire format
//!
//! Tags (major type 6) are never emitted and never decoded into values; the
//! structural walker skips over them. Map keys are UTF-8 text. Indefinite
//! lengths are supported on both ends and can be disabled per instance.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible. Slice-based encoding and decoding work
//! without `alloc`; owned targets require `alloc`; stream substrates require
//! `std`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::cast_possible_truncation)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod alloc_util;
mod config;
mod decode;
mod encode;
mod error;
mod head;
mod sink;
mod source;
mod utf8;
mod walk;

pub use crate::config::{
    Config, DEFAULT_MAX_COLLECTION_SIZE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STRING_LENGTH,
    DEFAULT_STREAM_BUFFER_SIZE,
};
pub use crate::decode::{from_slice, Decode, Decoder};
pub use crate::encode::{to_slice, ArrayEncoder, Encode, Encoder, MapEncoder, SequenceElem};
pub use crate::error::{Error, ErrorCode};
pub use crate::sink::{Sink, SliceSink};
pub use crate::source::{SliceSource, Source, Span};
pub use crate::walk::extract_field;

#[cfg(feature = "alloc")]
pub use crate::encode::to_vec;
#[cfg(feature = "alloc")]
pub use crate::sink::VecSink;

#[cfg(feature = "std")]
pub use crate::decode::from_reader;
#[cfg(feature = "std")]
pub use crate::encode::to_writer;
#[cfg(feature = "std")]
pub use crate::sink::WriterSink;
#[cfg(feature = "std")]
pub use crate::source::ReaderSource;

/// Derive [`Encode`] for a named-field struct, encoded as a map with text
/// keys in declared field order.
#[cfg(feature = "derive")]
pub use typed_cbor_derive::Encode;

/// Derive [`Decode`] for a named-field struct.
#[cfg(feature = "derive")]
pub use typed_cbor_derive::Decode;

// Re-exported for downstream float widths; the codec encodes `f16` with its
// own additional-info class.
pub use half::f16;
