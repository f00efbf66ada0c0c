//! External Term Format tag byte constants.

/// Version prefix beginning every top-level encoded term.
pub const VERSION: u8 = 0x83;

// Integers
pub const SMALL_INTEGER_EXT: u8 = 0x61; // 'a', 1-byte unsigned
pub const INTEGER_EXT: u8 = 0x62; // 'b', 4-byte BE two's complement
pub const SMALL_BIG_EXT: u8 = 0x6E; // 'n', 1-byte length + sign + LE magnitude
pub const LARGE_BIG_EXT: u8 = 0x6F; // 'o', 4-byte BE length + sign + LE magnitude

// Floats
pub const FLOAT_EXT: u8 = 0x63; // 'c', 31-byte ASCII literal (decode only)
pub const FLOAT_IEEE_EXT: u8 = 0x46; // 'F', 8-byte BE binary64

// Atoms
pub const ATOM_EXT: u8 = 0x64; // 'd', 2-byte BE length
pub const SMALL_ATOM_EXT: u8 = 0x73; // 's', 1-byte length
pub const ATOM_UTF8_EXT: u8 = 0x76; // 'v', 2-byte BE length
pub const SMALL_ATOM_UTF8_EXT: u8 = 0x77; // 'w', 1-byte length

// Strings and binaries
pub const STRING_EXT: u8 = 0x6B; // 'k', 2-byte BE length + raw bytes
pub const BINARY_EXT: u8 = 0x6D; // 'm', 4-byte BE length + raw bytes
pub const BIT_BINARY_EXT: u8 = 0x4D; // 'M', reserved; never produced or consumed

// Containers
pub const SMALL_TUPLE_EXT: u8 = 0x68; // 'h', 1-byte arity
pub const LARGE_TUPLE_EXT: u8 = 0x69; // 'i', 4-byte BE arity
pub const NIL_EXT: u8 = 0x6A; // 'j', the empty list / list tail
pub const LIST_EXT: u8 = 0x6C; // 'l', 4-byte BE count + elements + tail
pub const MAP_EXT: u8 = 0x74; // 't', 4-byte BE arity + alternating k,v

// Envelope
pub const COMPRESSED_TERM: u8 = 0x50; // 'P', 4-byte BE inflated length + zlib stream
