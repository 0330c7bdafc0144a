/*! The compressed file format, end to end.

```text
   +--------+======================+==============+=================+=====+
   | HEADER | tree (pre-order)     | stream info  | payload codes   | pad |
   +--------+======================+==============+=================+=====+
```

The header byte is described in `bitchannel`. Everything after it is one
bitstream. The stream info records how many symbols were encoded (LEB128, in
8-bit groups) followed by two bits giving how many zero bytes were added to
complete the final symbol. The symbol count is what lets a decoder stop on a
single-leaf tree, and what makes a truncated payload detectable.
*/

pub mod decoder;
pub mod encoder;

pub use decoder::{decode, inspect};
pub use encoder::encode;

use crate::bitchannel::{BitSink, BitSource, SymbolWidth};
use crate::error::{FramingError, Result};

use serde::Serialize;

use std::fmt;
use std::io::{self, Read, Seek, Write};

/// The most groups a 64-bit LEB128 count can occupy
const MAX_COUNT_GROUPS: u32 = 10;

pub(crate) fn write_stream_info<W: Write + Seek>(
  sink: &mut BitSink<W>,
  symbol_count: u64,
  tail_padding: u8,
) -> io::Result<()> {
  let mut n = symbol_count;
  loop {
    let group = (n & 0x7F) as u32;
    n >>= 7;
    if n == 0 {
      sink.append_symbol(group, 8)?;
      break;
    }
    sink.append_symbol(group | 0x80, 8)?;
  }
  sink.append_symbol(u32::from(tail_padding), 2)
}

pub(crate) fn read_stream_info<R: Read>(source: &mut BitSource<R>) -> Result<(u64, u8)> {
  let mut count = 0u64;
  let mut ngroups = 0u32;
  loop {
    let group = source.read_symbol(8)?;
    let shift = 7 * ngroups;
    let value = u64::from(group & 0x7F);
    ngroups += 1;
    if ngroups > MAX_COUNT_GROUPS || (shift > 57 && value >> (64 - shift) != 0) {
      return Err(FramingError::CountOverflow.into());
    }
    count |= value << shift;
    if group & 0x80 == 0 {
      break;
    }
  }

  let width = source.width();
  // The decoded length must be representable too
  if count.checked_mul(width.bytes() as u64).is_none() {
    return Err(FramingError::CountOverflow.into());
  }
  let tail_padding = source.read_symbol(2)? as u8;
  if usize::from(tail_padding) >= width.bytes() {
    return Err(FramingError::InvalidTailPadding(tail_padding, u8::from(width)).into());
  }
  Ok((count, tail_padding))
}

/// Statistics gathered while encoding a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeSummary {
  pub width: SymbolWidth,
  pub symbols: u64,
  pub distinct_symbols: usize,
  pub tree_bits: u64,
  pub payload_bits: u64,
  pub pad_bits: u8,
}

impl EncodeSummary {
  /// Size of the compressed stream in bytes, header included
  pub fn compressed_bytes(&self) -> u64 {
    let data_bits = self.tree_bits + stream_info_bits(self.symbols) + self.payload_bits;
    1 + (data_bits + u64::from(self.pad_bits)) / 8
  }
}

/// Number of bits `write_stream_info` spends on a given count
pub(crate) fn stream_info_bits(symbol_count: u64) -> u64 {
  let mut groups = 1u64;
  let mut n = symbol_count >> 7;
  while n != 0 {
    groups += 1;
    n >>= 7;
  }
  groups * 8 + 2
}

/// Statistics gathered while decoding a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
  pub width: SymbolWidth,
  pub symbols: u64,
  pub bytes_written: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeEntry {
  pub symbol: u32,
  pub code: String,
}

/// Everything that can be learned about a compressed stream without decoding
/// its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamInfo {
  pub width: SymbolWidth,
  pub pad_bits: u8,
  pub symbol_count: u64,
  pub tail_padding: u8,
  pub tree_bits: u64,
  pub payload_bits: u64,
  pub codes: Vec<CodeEntry>,
}

impl StreamInfo {
  /// Length of the data the stream decodes to
  pub fn decoded_bytes(&self) -> u64 {
    if self.symbol_count == 0 {
      return 0;
    }
    self
      .symbol_count
      .saturating_mul(self.width.bytes() as u64)
      .saturating_sub(u64::from(self.tail_padding))
  }
}

impl fmt::Display for StreamInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Symbol width: {}", self.width)?;
    writeln!(f, "Padding bits: {}", self.pad_bits)?;
    writeln!(
      f,
      "Symbols: {} ({} decoded bytes)",
      self.symbol_count,
      self.decoded_bytes()
    )?;
    writeln!(f, "Tree: {} bits, {} leaves", self.tree_bits, self.codes.len())?;
    writeln!(f, "Payload: {} bits", self.payload_bits)?;
    let digits = self.width.bytes() * 2;
    for entry in self.codes.iter() {
      writeln!(f, "  {:0digits$x} -> {}", entry.symbol, entry.code, digits = digits)?;
    }
    Ok(())
  }
}
