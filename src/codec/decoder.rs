use super::{read_stream_info, CodeEntry, DecodeSummary, StreamInfo};
use crate::bitchannel::BitSource;
use crate::error::{FramingError, Result};
use crate::freq_table::symbol_to_bytes;
use crate::huff_tree::{code_to_string, HuffNode, HuffmanTree};

use std::io::{BufReader, BufWriter, Read, Write};

/// Walk from the root to a leaf, one bit per branch.
fn read_symbol<R: Read>(tree: &HuffmanTree, bits: &mut BitSource<R>) -> Result<u32> {
  let mut node = tree.root();
  if let HuffNode::Leaf(sym) = node {
    // A lone leaf still spends one bit per symbol, and that bit is always 0.
    if bits.read_bit()? {
      return Err(FramingError::InvalidSingletonCode.into());
    }
    return Ok(*sym);
  }
  loop {
    match node {
      HuffNode::Leaf(sym) => return Ok(*sym),
      HuffNode::Internal(left, right) => {
        node = if bits.read_bit()? { right } else { left };
      }
    }
  }
}

/** Decompress `source` into `sink`.

Decoding stops after the symbol count recorded in the stream. The stream must
then be exhausted: leftover data bits mean the file is corrupt. Output already
written when an error is detected is left in the sink.
*/
pub fn decode<R: Read, W: Write>(source: R, sink: W) -> Result<DecodeSummary> {
  let mut bits = BitSource::new(BufReader::new(source))?;
  let width = bits.width();
  let tree = HuffmanTree::deserialize(&mut bits)?;
  log::trace!("Huffman tree:\n{}", tree);
  let (nsyms, tail_padding) = read_stream_info(&mut bits)?;
  log::debug!(
    "Decoding {} symbols of width {} ({} leaves, tail padding {})",
    nsyms,
    width,
    tree.leaf_count(),
    tail_padding
  );

  let mut out = BufWriter::new(sink);
  let mut buf = Vec::with_capacity(4);
  let mut bytes_written = 0u64;
  for i in 0..nsyms {
    let sym = read_symbol(&tree, &mut bits)?;
    buf.clear();
    symbol_to_bytes(sym, width, &mut buf);
    if i + 1 == nsyms {
      buf.truncate(width.bytes() - usize::from(tail_padding));
    }
    out.write_all(&buf)?;
    bytes_written += buf.len() as u64;
  }
  out.flush()?;

  if !bits.is_exhausted()? {
    let extra = bits.skip_to_end()?;
    return Err(FramingError::TrailingData(extra).into());
  }

  Ok(DecodeSummary {
    width,
    symbols: nsyms,
    bytes_written,
  })
}

/// Convenience wrapper for decompressing an in-memory buffer
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
  let mut out = Vec::new();
  decode(data, &mut out)?;
  Ok(out)
}

/// Parse the header, tree and stream info of a compressed stream and measure
/// its payload, without decoding any symbols.
pub fn inspect<R: Read>(source: R) -> Result<StreamInfo> {
  let mut bits = BitSource::new(BufReader::new(source))?;
  let tree = HuffmanTree::deserialize(&mut bits)?;
  let tree_bits = bits.bits_read();
  let (symbol_count, tail_padding) = read_stream_info(&mut bits)?;
  let payload_bits = bits.skip_to_end()?;

  let mut codes: Vec<CodeEntry> = tree
    .code_table()
    .iter()
    .map(|(sym, code)| CodeEntry {
      symbol: *sym,
      code: code_to_string(code),
    })
    .collect();
  codes.sort_by_key(|entry| entry.symbol);

  Ok(StreamInfo {
    width: bits.width(),
    pad_bits: bits.pad_bits(),
    symbol_count,
    tail_padding,
    tree_bits,
    payload_bits,
    codes,
  })
}
