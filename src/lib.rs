//! EtfR — A pure-Rust codec for the Erlang External Term Format.
//!
//! This crate packs in-memory values into ETF byte strings and unpacks
//! them back, covering the tagged term grammar exchanged by Erlang-speaking
//! peers: integers across their three wire representations, floats, atoms,
//! strings, binaries, tuples, lists, maps, and the zlib-compressed term
//! envelope.
//!
//! # Architecture
//!
//! - **`term`** — The `Term` value enum and conversions from host types
//! - **`tag`** — Wire tag byte constants and the `0x83` version prefix
//! - **`encode`** — `pack`: recursive term emission with boundary-driven tag selection
//! - **`decode`** — `unpack`: tag-dispatched recursive descent with a depth guard
//! - **`reader`** — Bounded cursor over borrowed input bytes
//! - **`error`** — `EncodeError` / `DecodeError` taxonomies

pub mod decode;
pub mod encode;
pub mod error;
pub mod reader;
pub mod tag;
pub mod term;

pub use decode::{unpack, unpack_partial, unpack_with, UnpackOptions, DEFAULT_MAX_DEPTH};
pub use encode::{
    pack, pack_with, PackOptions, TextMode, ENCODE_AS_ATOM, ENCODE_AS_BYTES, ENCODE_AS_STR,
};
pub use error::{DecodeError, EncodeError};
pub use term::Term;
