/*! Symbol counting over a fixed-width alphabet.

Sources are consumed as a sequence of 1, 2 or 4-byte big-endian symbols. A
source whose length is not a multiple of the symbol width ends in a partial
symbol: it is completed with zero bytes, and the number of bytes added is
remembered so that the decoder can strip them again.
*/

use crate::bitchannel::SymbolWidth;
use crate::error::{HuffError, Result};

use std::collections::BTreeMap;
use std::io::{self, BufReader, Read, Seek, SeekFrom};

/// Assemble a big-endian symbol out of (at most four) bytes
pub fn symbol_from_bytes(bytes: &[u8]) -> u32 {
  bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Write the low `width` bytes of `sym` into `out`, big-endian
pub fn symbol_to_bytes(sym: u32, width: SymbolWidth, out: &mut Vec<u8>) {
  let be = sym.to_be_bytes();
  out.extend_from_slice(&be[4 - width.bytes()..]);
}

/// Pulls fixed-width symbols out of a byte source.
pub struct SymbolReader<R: Read> {
  inner: R,
  width: SymbolWidth,
  tail_padding: u8,
  done: bool,
}

impl<R: Read> SymbolReader<R> {
  pub fn new(inner: R, width: SymbolWidth) -> Self {
    Self {
      inner,
      width,
      tail_padding: 0,
      done: false,
    }
  }

  pub fn next_symbol(&mut self) -> io::Result<Option<u32>> {
    if self.done {
      return Ok(None);
    }
    let n = self.width.bytes();
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < n {
      match self.inner.read(&mut buf[filled..n]) {
        Ok(0) => break,
        Ok(k) => filled += k,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
        Err(e) => return Err(e),
      }
    }

    if filled == 0 {
      self.done = true;
      return Ok(None);
    }
    if filled < n {
      self.done = true;
      self.tail_padding = (n - filled) as u8;
    }
    Ok(Some(symbol_from_bytes(&buf[..n])))
  }

  /// Zero bytes appended to the final symbol. Only meaningful once the
  /// reader has returned `None`.
  pub fn tail_padding(&self) -> u8 {
    self.tail_padding
  }
}

/// Occurrence counts of every distinct symbol in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
  counts: BTreeMap<u32, u64>,
  width: SymbolWidth,
  total: u64,
  tail_padding: u8,
}

impl FrequencyTable {
  /// Count every symbol in `source`, then rewind it to where it started.
  pub fn build<R: Read + Seek>(source: &mut R, width: SymbolWidth) -> Result<Self> {
    let start = source.seek(SeekFrom::Current(0))?;

    let mut counts = BTreeMap::new();
    let mut total = 0u64;
    let tail_padding = {
      let mut syms = SymbolReader::new(BufReader::new(&mut *source), width);
      while let Some(sym) = syms.next_symbol()? {
        *counts.entry(sym).or_insert(0) += 1;
        total += 1;
      }
      syms.tail_padding()
    };

    source.seek(SeekFrom::Start(start))?;

    if total == 0 {
      return Err(HuffError::EmptyInput);
    }
    log::debug!(
      "Counted {} symbols ({} distinct) of width {}",
      total,
      counts.len(),
      width
    );
    Ok(Self {
      counts,
      width,
      total,
      tail_padding,
    })
  }

  /// Build a table directly from symbol values, e.g. for a known alphabet.
  pub fn from_symbols(symbols: &[u32], width: SymbolWidth) -> Result<Self> {
    if symbols.is_empty() {
      return Err(HuffError::EmptyInput);
    }
    let mut counts = BTreeMap::new();
    for sym in symbols {
      *counts.entry(*sym).or_insert(0) += 1;
    }
    Ok(Self {
      counts,
      width,
      total: symbols.len() as u64,
      tail_padding: 0,
    })
  }

  pub fn counts(&self) -> &BTreeMap<u32, u64> {
    &self.counts
  }

  pub fn get(&self, sym: u32) -> Option<u64> {
    self.counts.get(&sym).copied()
  }

  /// Number of distinct symbols
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  pub fn total_symbols(&self) -> u64 {
    self.total
  }

  pub fn tail_padding(&self) -> u8 {
    self.tail_padding
  }

  pub fn width(&self) -> SymbolWidth {
    self.width
  }
}
