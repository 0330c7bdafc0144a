/*! Bit-granular I/O over byte streams.

Every compressed stream starts with a single header byte:

```text
   +-------+-------+
   | WIDTH |  PAD  |
   +-------+-------+
    7     4 3     0
```

WIDTH is the symbol width in bytes (1, 2 or 4) and PAD is the number of zero
bits appended to complete the final byte of the stream. Everything after the
header is a single bitstream, packed most-significant-bit first.
*/

pub mod reader;
pub mod writer;

pub use reader::BitSource;
pub use writer::BitSink;

use crate::error::FramingError;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;

use std::convert::TryFrom;
use std::fmt;

/// The width of a single symbol of the input alphabet.
#[derive(
  Debug, Eq, PartialEq, Ord, PartialOrd, Hash, TryFromPrimitive, IntoPrimitive, Copy, Clone, Serialize,
)]
#[repr(u8)]
pub enum SymbolWidth {
  One = 1,
  Two = 2,
  Four = 4,
}

impl SymbolWidth {
  pub fn bytes(self) -> usize {
    u8::from(self) as usize
  }

  pub fn bits(self) -> u32 {
    u32::from(u8::from(self)) * 8
  }

  /// The name used on the command line for this width
  pub fn type_name(self) -> &'static str {
    match self {
      SymbolWidth::One => "char",
      SymbolWidth::Two => "char16",
      SymbolWidth::Four => "char32",
    }
  }

  pub fn from_type_name(name: &str) -> Option<Self> {
    match name {
      "char" => Some(SymbolWidth::One),
      "char16" => Some(SymbolWidth::Two),
      "char32" => Some(SymbolWidth::Four),
      _ => None,
    }
  }
}

impl fmt::Display for SymbolWidth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({} bytes)", self.type_name(), self.bytes())
  }
}

/// Pack the width and pad count into a header byte
pub fn pack_header(width: SymbolWidth, pad_bits: u8) -> u8 {
  debug_assert!(pad_bits < 8);
  (u8::from(width) << 4) | (pad_bits & 0x0F)
}

/// Split a header byte into its width and pad count, validating both
pub fn unpack_header(byte: u8) -> Result<(SymbolWidth, u8), FramingError> {
  let width_nibble = byte >> 4;
  let pad_bits = byte & 0x0F;
  let width =
    SymbolWidth::try_from(width_nibble).map_err(|_| FramingError::InvalidWidth(width_nibble))?;
  if pad_bits > 7 {
    return Err(FramingError::InvalidPadding(pad_bits));
  }
  Ok((width, pad_bits))
}
