//! ETF decoding: bytes → `Term`.

use std::io::Read;

use encoding_rs::Encoding;
use flate2::read::ZlibDecoder;

use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::tag;
use crate::term::Term;

/// Default cap on term nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for [`unpack_with`].
#[derive(Debug, Clone, Copy)]
pub struct UnpackOptions {
    /// If set, `STRING_EXT` payloads decode to text with this codec;
    /// otherwise they stay raw bytes.
    pub string_encoding: Option<&'static Encoding>,
    /// Also decode `BINARY_EXT` payloads as text. Requires
    /// `string_encoding` to be set.
    pub binary_as_text: bool,
    /// Nesting limit guarding against adversarial input.
    pub max_depth: usize,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            string_encoding: None,
            binary_as_text: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Unpacks one term with default options: strings and binaries stay bytes.
pub fn unpack(input: &[u8]) -> Result<Term, DecodeError> {
    unpack_with(input, &UnpackOptions::default())
}

/// Unpacks one term. Trailing bytes after the term are permitted.
pub fn unpack_with(input: &[u8], opts: &UnpackOptions) -> Result<Term, DecodeError> {
    let (term, consumed) = unpack_partial(input, opts)?;
    if consumed < input.len() {
        tracing::debug!(
            trailing = input.len() - consumed,
            "trailing bytes after decoded term"
        );
    }
    Ok(term)
}

/// Unpacks one term and reports how many input bytes it consumed.
pub fn unpack_partial(
    input: &[u8],
    opts: &UnpackOptions,
) -> Result<(Term, usize), DecodeError> {
    let mut reader = ByteReader::new(input);
    let version = reader.read_u8()?;
    if version != tag::VERSION {
        return Err(DecodeError::BadVersion { byte: version });
    }
    let term = decode_term(&mut reader, opts, 0)?;
    Ok((term, reader.offset()))
}

/// Decodes a single term from the reader.
fn decode_term(
    reader: &mut ByteReader<'_>,
    opts: &UnpackOptions,
    depth: usize,
) -> Result<Term, DecodeError> {
    if depth >= opts.max_depth {
        return Err(DecodeError::DepthExceeded {
            limit: opts.max_depth,
        });
    }

    let tag_offset = reader.offset();
    let t = reader.read_u8()?;
    match t {
        tag::SMALL_INTEGER_EXT => Ok(Term::Int(i64::from(reader.read_u8()?))),
        tag::INTEGER_EXT => Ok(Term::Int(i64::from(reader.read_i32_be()?))),

        tag::SMALL_BIG_EXT => {
            let len_offset = reader.offset();
            let n = reader.read_u8()? as usize;
            decode_big(reader, n, len_offset)
        }
        tag::LARGE_BIG_EXT => {
            let len_offset = reader.offset();
            let n = reader.read_u32_be()? as usize;
            decode_big(reader, n, len_offset)
        }

        tag::FLOAT_IEEE_EXT => Ok(Term::Float(reader.read_f64_be()?)),
        tag::FLOAT_EXT => decode_float_literal(reader),

        tag::ATOM_EXT | tag::ATOM_UTF8_EXT => {
            let len = reader.read_u16_be()? as usize;
            decode_atom(reader, len)
        }
        tag::SMALL_ATOM_EXT | tag::SMALL_ATOM_UTF8_EXT => {
            let len = reader.read_u8()? as usize;
            decode_atom(reader, len)
        }

        tag::STRING_EXT => {
            let len = reader.read_u16_be()? as usize;
            let offset = reader.offset();
            let bytes = reader.take(len)?;
            match opts.string_encoding {
                Some(enc) => decode_text(enc, bytes, offset),
                None => Ok(Term::Bytes(bytes.to_vec())),
            }
        }
        tag::BINARY_EXT => {
            let len = reader.read_u32_be()? as usize;
            let offset = reader.offset();
            let bytes = reader.take(len)?;
            match opts.string_encoding {
                Some(enc) if opts.binary_as_text => decode_text(enc, bytes, offset),
                _ => Ok(Term::Bytes(bytes.to_vec())),
            }
        }

        tag::SMALL_TUPLE_EXT => {
            let arity = reader.read_u8()? as usize;
            decode_tuple(reader, arity, opts, depth)
        }
        tag::LARGE_TUPLE_EXT => {
            let arity = reader.read_u32_be()? as usize;
            decode_tuple(reader, arity, opts, depth)
        }

        tag::NIL_EXT => Ok(Term::List(Vec::new())),
        tag::LIST_EXT => decode_list(reader, opts, depth),
        tag::MAP_EXT => decode_map(reader, opts, depth),

        tag::COMPRESSED_TERM => decode_compressed(reader, opts, depth),

        other => Err(DecodeError::UnknownTag {
            tag: other,
            offset: tag_offset,
        }),
    }
}

fn decode_big(
    reader: &mut ByteReader<'_>,
    n: usize,
    offset: usize,
) -> Result<Term, DecodeError> {
    if n > 8 {
        return Err(DecodeError::BigIntegerTooLarge { len: n, offset });
    }
    let sign_offset = reader.offset();
    let sign = reader.read_u8()?;
    if sign > 1 {
        return Err(DecodeError::MalformedBigInt {
            sign,
            offset: sign_offset,
        });
    }

    // Magnitude bytes are little-endian, unlike every other multi-byte
    // field in the format.
    let bytes = reader.take(n)?;
    let mut magnitude = 0u64;
    for (i, &b) in bytes.iter().enumerate() {
        magnitude |= u64::from(b) << (8 * i);
    }

    let value = i128::from(magnitude);
    Ok(Term::integer(if sign == 1 { -value } else { value }))
}

/// Parses the legacy 31-byte ASCII float record. Accepted on read only.
fn decode_float_literal(reader: &mut ByteReader<'_>) -> Result<Term, DecodeError> {
    let offset = reader.offset();
    let bytes = reader.take(31)?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..end])
        .ok()
        .and_then(|text| text.trim().parse::<f64>().ok())
        .map(Term::Float)
        .ok_or(DecodeError::MalformedFloat { offset })
}

fn decode_atom(reader: &mut ByteReader<'_>, len: usize) -> Result<Term, DecodeError> {
    let offset = reader.offset();
    let bytes = reader.take(len)?;
    let name = std::str::from_utf8(bytes).map_err(|_| DecodeError::TextDecodeFailed {
        encoding: "UTF-8",
        offset,
    })?;
    Ok(match name {
        "nil" => Term::Null,
        "true" => Term::Bool(true),
        "false" => Term::Bool(false),
        _ => Term::Str(name.to_string()),
    })
}

fn decode_text(
    encoding: &'static Encoding,
    bytes: &[u8],
    offset: usize,
) -> Result<Term, DecodeError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(DecodeError::TextDecodeFailed {
            encoding: encoding.name(),
            offset,
        });
    }
    Ok(Term::Str(text.into_owned()))
}

fn decode_tuple(
    reader: &mut ByteReader<'_>,
    arity: usize,
    opts: &UnpackOptions,
    depth: usize,
) -> Result<Term, DecodeError> {
    // Every element costs at least one byte, so the remaining input bounds
    // a declared arity the stream cannot honor.
    let mut items = Vec::with_capacity(arity.min(reader.remaining()));
    for _ in 0..arity {
        items.push(decode_term(reader, opts, depth + 1)?);
    }
    Ok(Term::Tuple(items))
}

fn decode_list(
    reader: &mut ByteReader<'_>,
    opts: &UnpackOptions,
    depth: usize,
) -> Result<Term, DecodeError> {
    let count = reader.read_u32_be()? as usize;
    let mut items = Vec::with_capacity(count.min(reader.remaining()));
    for _ in 0..count {
        items.push(decode_term(reader, opts, depth + 1)?);
    }

    // Proper lists end with a nil tail; anything else is malformed here.
    let tail_offset = reader.offset();
    match reader.peek() {
        Ok(tag::NIL_EXT) => {
            reader.read_u8()?;
            Ok(Term::List(items))
        }
        _ => Err(DecodeError::MissingListTail {
            offset: tail_offset,
        }),
    }
}

fn decode_map(
    reader: &mut ByteReader<'_>,
    opts: &UnpackOptions,
    depth: usize,
) -> Result<Term, DecodeError> {
    let count = reader.read_u32_be()? as usize;
    let mut pairs: Vec<(Term, Term)> = Vec::with_capacity(count.min(reader.remaining() / 2));
    for _ in 0..count {
        let key = decode_term(reader, opts, depth + 1)?;
        let value = decode_term(reader, opts, depth + 1)?;
        // A repeated key overwrites the earlier value, keeping its slot.
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => pairs.push((key, value)),
        }
    }
    Ok(Term::Map(pairs))
}

/// Inflates a compressed envelope and decodes the payload it carried.
///
/// The zlib stream runs to the end of the current input, and the inflated
/// bytes become the active input: one term, no second version prefix.
fn decode_compressed(
    reader: &mut ByteReader<'_>,
    opts: &UnpackOptions,
    depth: usize,
) -> Result<Term, DecodeError> {
    let expected = reader.read_u32_be()? as usize;
    let deflated = reader.take_rest();

    let mut inflated = Vec::new();
    let mut z = ZlibDecoder::new(deflated);
    z.read_to_end(&mut inflated)
        .map_err(|e| DecodeError::BadCompressedPayload {
            reason: e.to_string(),
        })?;
    if inflated.len() != expected {
        return Err(DecodeError::BadCompressedPayload {
            reason: format!(
                "inflated to {} bytes, header declared {expected}",
                inflated.len()
            ),
        });
    }
    tracing::trace!(
        deflated = deflated.len(),
        inflated = inflated.len(),
        "inflated compressed term"
    );

    let mut inner = ByteReader::new(&inflated);
    decode_term(&mut inner, opts, depth)
}
