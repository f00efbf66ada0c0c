//! ETF encoding: `Term` → bytes.

use bytes::{BufMut, Bytes, BytesMut};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;

use crate::error::EncodeError;
use crate::tag;
use crate::term::Term;

/// Initial output reservation, sized for typical payloads.
const INITIAL_CAPACITY: usize = 1024 * 1024;

/// Which ETF container receives the bytes of a text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// `STRING_EXT` — a list of small integers on the wire, 65535 bytes max.
    String,
    /// `BINARY_EXT` — an opaque byte sequence.
    #[default]
    Binary,
    /// `SMALL_ATOM_EXT` / `ATOM_EXT` — an interned symbolic name.
    Atom,
}

/// Text values become `STRING_EXT` records.
pub const ENCODE_AS_STR: TextMode = TextMode::String;
/// Text values become `BINARY_EXT` records (the default).
pub const ENCODE_AS_BYTES: TextMode = TextMode::Binary;
/// Text values become atoms.
pub const ENCODE_AS_ATOM: TextMode = TextMode::Atom;

/// Knobs for [`pack_with`].
#[derive(Debug, Clone, Copy)]
pub struct PackOptions {
    /// Codec used to turn text into bytes before emission.
    pub string_encoding: &'static Encoding,
    /// Container tag receiving those bytes.
    pub text_mode: TextMode,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            string_encoding: UTF_8,
            text_mode: TextMode::Binary,
        }
    }
}

/// Packs a term with default options: UTF-8 text emitted as `BINARY_EXT`.
pub fn pack(term: &Term) -> Result<Bytes, EncodeError> {
    pack_with(term, &PackOptions::default())
}

/// Packs one term: the version prefix followed by its encoding.
pub fn pack_with(term: &Term, opts: &PackOptions) -> Result<Bytes, EncodeError> {
    let mut buf = BytesMut::with_capacity(INITIAL_CAPACITY);
    buf.put_u8(tag::VERSION);
    encode_term(&mut buf, term, opts)?;
    Ok(buf.freeze())
}

/// Encodes a single term into the buffer, without the version prefix.
pub fn encode_term(
    buf: &mut BytesMut,
    term: &Term,
    opts: &PackOptions,
) -> Result<(), EncodeError> {
    match term {
        Term::Null => encode_atom(buf, "nil"),
        Term::Bool(true) => encode_atom(buf, "true"),
        Term::Bool(false) => encode_atom(buf, "false"),
        Term::Int(i) => encode_integer(buf, i128::from(*i)),
        Term::BigInt(i) => encode_integer(buf, *i),
        Term::Float(f) => {
            buf.put_u8(tag::FLOAT_IEEE_EXT);
            buf.put_f64(*f);
            Ok(())
        }
        Term::Str(s) => encode_text(buf, s, opts),
        Term::Bytes(b) => encode_binary(buf, b),
        Term::Tuple(items) => encode_tuple(buf, items, opts),
        Term::List(items) => encode_list(buf, items, opts),
        Term::Map(pairs) => encode_map(buf, pairs, opts),
    }
}

/// Encodes an integer using the smallest ETF representation.
fn encode_integer(buf: &mut BytesMut, value: i128) -> Result<(), EncodeError> {
    if (0..=255).contains(&value) {
        buf.put_u8(tag::SMALL_INTEGER_EXT);
        buf.put_u8(value as u8);
    } else if i128::from(i32::MIN) <= value && value <= i128::from(i32::MAX) {
        buf.put_u8(tag::INTEGER_EXT);
        buf.put_i32(value as i32);
    } else {
        // SMALL_BIG_EXT: length, sign, then the magnitude little-endian.
        let magnitude = value.unsigned_abs();
        let n = (128 - magnitude.leading_zeros() as usize).div_ceil(8);
        if n > 8 {
            return Err(EncodeError::IntegerOutOfRange { magnitude_bytes: n });
        }
        buf.put_u8(tag::SMALL_BIG_EXT);
        buf.put_u8(n as u8);
        buf.put_u8(u8::from(value < 0));
        buf.put_slice(&magnitude.to_le_bytes()[..n]);
    }
    Ok(())
}

fn encode_atom(buf: &mut BytesMut, name: &str) -> Result<(), EncodeError> {
    let bytes = name.as_bytes();
    if bytes.len() <= 254 {
        buf.put_u8(tag::SMALL_ATOM_EXT);
        buf.put_u8(bytes.len() as u8);
    } else if bytes.len() <= 65535 {
        buf.put_u8(tag::ATOM_EXT);
        buf.put_u16(bytes.len() as u16);
    } else {
        return Err(EncodeError::AtomTooLarge { len: bytes.len() });
    }
    buf.put_slice(bytes);
    Ok(())
}

/// Routes text into one of the three container tags per the pack options.
fn encode_text(buf: &mut BytesMut, s: &str, opts: &PackOptions) -> Result<(), EncodeError> {
    match opts.text_mode {
        // Atoms are UTF-8 regardless of the configured string encoding.
        TextMode::Atom => encode_atom(buf, s),
        TextMode::String => {
            let bytes = encode_with(opts.string_encoding, s)?;
            if bytes.len() > 65535 {
                return Err(EncodeError::StringTooLarge { len: bytes.len() });
            }
            buf.put_u8(tag::STRING_EXT);
            buf.put_u16(bytes.len() as u16);
            buf.put_slice(&bytes);
            Ok(())
        }
        TextMode::Binary => {
            let bytes = encode_with(opts.string_encoding, s)?;
            encode_binary(buf, &bytes)
        }
    }
}

fn encode_with<'a>(
    encoding: &'static Encoding,
    s: &'a str,
) -> Result<Cow<'a, [u8]>, EncodeError> {
    let (bytes, _, had_errors) = encoding.encode(s);
    if had_errors {
        return Err(EncodeError::TextEncodeFailed {
            encoding: encoding.name(),
        });
    }
    Ok(bytes)
}

fn encode_binary(buf: &mut BytesMut, bytes: &[u8]) -> Result<(), EncodeError> {
    if bytes.len() > i32::MAX as usize {
        return Err(EncodeError::BinaryTooLarge { len: bytes.len() });
    }
    buf.put_u8(tag::BINARY_EXT);
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
    Ok(())
}

fn encode_tuple(
    buf: &mut BytesMut,
    items: &[Term],
    opts: &PackOptions,
) -> Result<(), EncodeError> {
    if items.len() <= 255 {
        buf.put_u8(tag::SMALL_TUPLE_EXT);
        buf.put_u8(items.len() as u8);
    } else if items.len() <= u32::MAX as usize {
        buf.put_u8(tag::LARGE_TUPLE_EXT);
        buf.put_u32(items.len() as u32);
    } else {
        return Err(EncodeError::TooManyElements { len: items.len() });
    }
    for item in items {
        encode_term(buf, item, opts)?;
    }
    Ok(())
}

fn encode_list(buf: &mut BytesMut, items: &[Term], opts: &PackOptions) -> Result<(), EncodeError> {
    // The empty list is the bare nil tag, no list header.
    if items.is_empty() {
        buf.put_u8(tag::NIL_EXT);
        return Ok(());
    }
    if items.len() > u32::MAX as usize {
        return Err(EncodeError::TooManyElements { len: items.len() });
    }
    buf.put_u8(tag::LIST_EXT);
    buf.put_u32(items.len() as u32);
    for item in items {
        encode_term(buf, item, opts)?;
    }
    buf.put_u8(tag::NIL_EXT);
    Ok(())
}

fn encode_map(
    buf: &mut BytesMut,
    pairs: &[(Term, Term)],
    opts: &PackOptions,
) -> Result<(), EncodeError> {
    if pairs.len() > u32::MAX as usize {
        return Err(EncodeError::TooManyElements { len: pairs.len() });
    }
    buf.put_u8(tag::MAP_EXT);
    buf.put_u32(pairs.len() as u32);
    for (key, value) in pairs {
        encode_term(buf, key, opts)?;
        encode_term(buf, value, opts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(term: &Term) -> Vec<u8> {
        pack(term).expect("pack failed").to_vec()
    }

    #[test]
    fn version_prefix_leads() {
        assert_eq!(packed(&Term::Int(0))[0], 0x83);
    }

    #[test]
    fn small_integer_boundaries() {
        assert_eq!(packed(&Term::Int(0)), [0x83, 0x61, 0x00]);
        assert_eq!(packed(&Term::Int(255)), [0x83, 0x61, 0xFF]);
    }

    #[test]
    fn integer_ext_boundaries() {
        assert_eq!(packed(&Term::Int(256)), [0x83, 0x62, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(packed(&Term::Int(-1)), [0x83, 0x62, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(
            packed(&Term::Int(i64::from(i32::MAX))),
            [0x83, 0x62, 0x7F, 0xFF, 0xFF, 0xFF],
        );
    }

    #[test]
    fn big_integer_magnitude_is_little_endian() {
        // 2^31 is one past INTEGER_EXT range.
        assert_eq!(
            packed(&Term::Int(1 << 31)),
            [0x83, 0x6E, 0x04, 0x00, 0x00, 0x00, 0x00, 0x80],
        );
    }

    #[test]
    fn big_integer_sign_byte() {
        let negative = packed(&Term::Int(-(1 << 31) - 1));
        assert_eq!(negative[..4], [0x83, 0x6E, 0x04, 0x01]);
        assert_eq!(
            packed(&Term::BigInt(i128::from(u64::MAX))),
            [0x83, 0x6E, 0x08, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
        );
    }

    #[test]
    fn big_integer_over_eight_bytes_rejected() {
        let err = pack(&Term::BigInt(i128::from(u64::MAX) + 1)).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::IntegerOutOfRange { magnitude_bytes: 9 },
        ));
    }

    #[test]
    fn float_is_ieee_big_endian() {
        assert_eq!(
            packed(&Term::Float(1.0)),
            [0x83, 0x46, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        );
    }

    #[test]
    fn null_and_bools_are_small_atoms() {
        assert_eq!(packed(&Term::Null), [0x83, 0x73, 0x03, 0x6E, 0x69, 0x6C]);
        assert_eq!(
            packed(&Term::Bool(true)),
            [0x83, 0x73, 0x04, b't', b'r', b'u', b'e'],
        );
        assert_eq!(
            packed(&Term::Bool(false)),
            [0x83, 0x73, 0x05, b'f', b'a', b'l', b's', b'e'],
        );
    }

    #[test]
    fn text_defaults_to_binary_ext() {
        assert_eq!(
            packed(&Term::Str("a".into())),
            [0x83, 0x6D, 0x00, 0x00, 0x00, 0x01, b'a'],
        );
    }

    #[test]
    fn text_as_string_ext() {
        let opts = PackOptions {
            text_mode: ENCODE_AS_STR,
            ..PackOptions::default()
        };
        let bytes = pack_with(&Term::Str("hi".into()), &opts).unwrap();
        assert_eq!(&bytes[..], [0x83, 0x6B, 0x00, 0x02, b'h', b'i']);
    }

    #[test]
    fn text_as_atom() {
        let opts = PackOptions {
            text_mode: ENCODE_AS_ATOM,
            ..PackOptions::default()
        };
        let bytes = pack_with(&Term::Str("ok".into()), &opts).unwrap();
        assert_eq!(&bytes[..], [0x83, 0x73, 0x02, b'o', b'k']);
    }

    #[test]
    fn long_atom_uses_two_byte_length() {
        let opts = PackOptions {
            text_mode: ENCODE_AS_ATOM,
            ..PackOptions::default()
        };
        let name = "a".repeat(255);
        let bytes = pack_with(&Term::Str(name), &opts).unwrap();
        assert_eq!(&bytes[..4], [0x83, 0x64, 0x00, 0xFF]);
    }

    #[test]
    fn oversized_atom_rejected() {
        let opts = PackOptions {
            text_mode: ENCODE_AS_ATOM,
            ..PackOptions::default()
        };
        let err = pack_with(&Term::Str("a".repeat(65536)), &opts).unwrap_err();
        assert!(matches!(err, EncodeError::AtomTooLarge { len: 65536 }));
    }

    #[test]
    fn oversized_string_rejected() {
        let opts = PackOptions {
            text_mode: ENCODE_AS_STR,
            ..PackOptions::default()
        };
        let err = pack_with(&Term::Str("a".repeat(65536)), &opts).unwrap_err();
        assert!(matches!(err, EncodeError::StringTooLarge { len: 65536 }));
    }

    #[test]
    fn unmappable_text_rejected() {
        let opts = PackOptions {
            string_encoding: encoding_rs::WINDOWS_1252,
            ..PackOptions::default()
        };
        let err = pack_with(&Term::Str("Ω".into()), &opts).unwrap_err();
        assert!(matches!(err, EncodeError::TextEncodeFailed { .. }));
    }

    #[test]
    fn bytes_pass_through_unencoded() {
        assert_eq!(
            packed(&Term::Bytes(vec![0xDE, 0xAD])),
            [0x83, 0x6D, 0x00, 0x00, 0x00, 0x02, 0xDE, 0xAD],
        );
    }

    #[test]
    fn tuple_arity_boundary() {
        let small = packed(&Term::Tuple(vec![Term::Int(1); 255]));
        assert_eq!(small[1..3], [0x68, 0xFF]);

        let large = packed(&Term::Tuple(vec![Term::Int(1); 256]));
        assert_eq!(large[1..6], [0x69, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn empty_list_is_bare_nil() {
        assert_eq!(packed(&Term::List(vec![])), [0x83, 0x6A]);
    }

    #[test]
    fn list_carries_nil_tail() {
        assert_eq!(
            packed(&Term::List(vec![Term::Int(1), Term::Int(2), Term::Int(3)])),
            [0x83, 0x6C, 0x00, 0x00, 0x00, 0x03, 0x61, 0x01, 0x61, 0x02, 0x61, 0x03, 0x6A],
        );
    }

    #[test]
    fn map_alternates_keys_and_values() {
        assert_eq!(
            packed(&Term::Map(vec![(Term::Int(1), Term::Int(2))])),
            [0x83, 0x74, 0x00, 0x00, 0x00, 0x01, 0x61, 0x01, 0x61, 0x02],
        );
    }

    #[test]
    fn nested_tuple_scenario() {
        assert_eq!(
            packed(&Term::Tuple(vec![Term::Int(1), Term::Str("a".into())])),
            [0x83, 0x68, 0x02, 0x61, 0x01, 0x6D, 0x00, 0x00, 0x00, 0x01, b'a'],
        );
    }
}
